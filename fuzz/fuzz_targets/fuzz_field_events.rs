#![no_main]

//! Drive a formatted field with arbitrary edit / external-write sequences and
//! check it lands on a fixed point after every event.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use synctext_field::{FormattedField, Transform, stock};
use synctext_reactive::Observable;

#[derive(Arbitrary, Debug)]
enum Event {
    Edit(String),
    External(String),
    Reconcile(String),
}

#[derive(Arbitrary, Debug)]
struct Input {
    transform: u8,
    limit: u8,
    initial: String,
    events: Vec<Event>,
}

fn pick(selector: u8, limit: u8) -> Transform {
    match selector % 4 {
        0 => stock::trim(),
        1 => stock::max_graphemes(usize::from(limit % 32)),
        2 => stock::digits_only(),
        _ => stock::collapse_whitespace(),
    }
}

fuzz_target!(|input: Input| {
    let transform = pick(input.transform, input.limit);
    let text = Observable::new(input.initial);
    let field = FormattedField::new("fuzz", &text, transform.clone());
    assert!(field.is_settled());

    for event in input.events.iter().take(64) {
        let raw = match event {
            Event::Edit(raw) => {
                field.edit(raw.clone());
                raw
            }
            Event::External(raw) => {
                text.set(raw.clone());
                raw
            }
            Event::Reconcile(raw) => {
                field.reconciler().reconcile(raw);
                raw
            }
        };
        let expected = transform.apply(raw);
        assert_eq!(field.displayed(), expected);
        assert_eq!(text.get(), expected);
        assert!(field.stats().max_depth <= 3);
    }
});
