#![forbid(unsafe_code)]

//! Normalization functions applied to every raw input.
//!
//! A [`Transform`] maps raw text to its canonical form. The reconciler relies
//! on two properties it cannot check for you:
//!
//! 1. **Total**: never panics. A transform with a failure path must fall back
//!    to some deterministic value instead.
//! 2. **Idempotent**: `t(t(s)) == t(s)` for every `s`. Without this a write
//!    can trigger a change notification that produces yet another value, and
//!    reconciliation may never settle.
//!
//! Every transform in [`stock`] satisfies both. Composition via
//! [`Transform::then`] does not preserve idempotence in general: check the
//! composite, not just its parts.

pub mod stock;

use std::fmt;
use std::rc::Rc;

/// A shared, immutable `&str -> String` normalization function.
///
/// Cloning is cheap (reference-counted).
#[derive(Clone)]
pub struct Transform {
    name: Rc<str>,
    apply: Rc<dyn Fn(&str) -> String>,
}

impl Transform {
    /// Wrap an arbitrary function.
    pub fn new(f: impl Fn(&str) -> String + 'static) -> Self {
        Self::named("custom", f)
    }

    /// Wrap a function under a name shown by `Debug` and in logs.
    pub fn named(name: impl Into<Rc<str>>, f: impl Fn(&str) -> String + 'static) -> Self {
        Self {
            name: name.into(),
            apply: Rc::new(f),
        }
    }

    /// The transform that returns its input unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::named("identity", str::to_owned)
    }

    /// Apply the transform to `raw`.
    #[must_use]
    pub fn apply(&self, raw: &str) -> String {
        (self.apply)(raw)
    }

    /// Whether `s` is already canonical under this transform.
    #[must_use]
    pub fn is_fixed_point(&self, s: &str) -> bool {
        self.apply(s) == s
    }

    /// Run `self`, then `next` on its output.
    #[must_use]
    pub fn then(&self, next: &Transform) -> Transform {
        let first = Rc::clone(&self.apply);
        let second = Rc::clone(&next.apply);
        Transform {
            name: format!("{}+{}", self.name, next.name).into(),
            apply: Rc::new(move |raw: &str| second(&first(raw))),
        }
    }

    /// The name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F> From<F> for Transform
where
    F: Fn(&str) -> String + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}
