#![forbid(unsafe_code)]

//! Ready-made idempotent transforms.

use unicode_segmentation::UnicodeSegmentation;

use super::Transform;

/// Strip leading and trailing whitespace.
#[must_use]
pub fn trim() -> Transform {
    Transform::named("trim", |s: &str| s.trim().to_owned())
}

/// Keep at most `limit` user-perceived characters.
///
/// Counts extended grapheme clusters, so a combining accent or a ZWJ emoji
/// sequence is kept or dropped as a whole.
#[must_use]
pub fn max_graphemes(limit: usize) -> Transform {
    Transform::named("max_graphemes", move |s: &str| {
        match s.grapheme_indices(true).nth(limit) {
            Some((cut, _)) => s[..cut].to_owned(),
            None => s.to_owned(),
        }
    })
}

/// Keep only ASCII digits.
#[must_use]
pub fn digits_only() -> Transform {
    retain_named("digits_only", |c| c.is_ascii_digit())
}

/// Uppercase every character.
#[must_use]
pub fn uppercase() -> Transform {
    Transform::named("uppercase", |s: &str| s.to_uppercase())
}

/// Lowercase every character.
#[must_use]
pub fn lowercase() -> Transform {
    Transform::named("lowercase", |s: &str| s.to_lowercase())
}

/// Trim, and replace every internal whitespace run with one space.
#[must_use]
pub fn collapse_whitespace() -> Transform {
    Transform::named("collapse_whitespace", |s: &str| {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    })
}

/// Keep only the characters for which `keep` returns true.
#[must_use]
pub fn retain(keep: impl Fn(char) -> bool + 'static) -> Transform {
    retain_named("retain", keep)
}

fn retain_named(name: &'static str, keep: impl Fn(char) -> bool + 'static) -> Transform {
    Transform::named(name, move |s: &str| s.chars().filter(|&c| keep(c)).collect())
}
