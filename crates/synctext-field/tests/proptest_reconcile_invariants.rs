//! Property-based invariant tests for reconciliation.
//!
//! 1. After any edit, external write or direct reconcile, displayed text and
//!    the bound value both equal `transform(input)`.
//! 2. Reconciling a value already at the fixed point performs zero writes.
//! 3. Hosts and external observers only ever receive fixed points.
//! 4. Stock transforms are idempotent.
//! 5. A reconcile never nests deeper than edit + display write + external
//!    write.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use synctext_field::{FormattedField, HostField, Reconciler, Transform, stock};
use synctext_reactive::Observable;

// ── Helpers ─────────────────────────────────────────────────────────────

const TEXT: &str = "[ a-zA-Z0-9\t.,ßéü\u{301}-]{0,16}";

fn stock_transform(index: usize) -> Transform {
    match index {
        0 => stock::trim(),
        1 => stock::max_graphemes(4),
        2 => stock::digits_only(),
        3 => stock::uppercase(),
        4 => stock::lowercase(),
        _ => stock::collapse_whitespace(),
    }
}

fn transform_strategy() -> impl Strategy<Value = Transform> {
    (0usize..6).prop_map(stock_transform)
}

#[derive(Clone, Debug)]
enum Op {
    Edit(String),
    External(String),
    Reconcile(String),
}

impl Op {
    fn input(&self) -> &str {
        match self {
            Op::Edit(s) | Op::External(s) | Op::Reconcile(s) => s,
        }
    }
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        TEXT.prop_map(Op::Edit),
        TEXT.prop_map(Op::External),
        TEXT.prop_map(Op::Reconcile),
    ]
}

#[derive(Default)]
struct LogHost {
    shown: Vec<String>,
}

impl HostField for LogHost {
    fn display(&mut self, text: &str) {
        self.shown.push(text.to_owned());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Fixed-point invariant after every event
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn every_event_lands_on_fixed_point(
        transform in transform_strategy(),
        initial in TEXT,
        ops in proptest::collection::vec(op_strategy(), 1..24),
    ) {
        let text = Observable::new(initial.clone());
        let field = FormattedField::new("t", &text, transform.clone());
        prop_assert_eq!(field.displayed(), transform.apply(&initial));

        for op in &ops {
            match op {
                Op::Edit(raw) => field.edit(raw.clone()),
                Op::External(raw) => text.set(raw.clone()),
                Op::Reconcile(raw) => field.reconciler().reconcile(raw),
            }
            let expected = transform.apply(op.input());
            prop_assert_eq!(field.displayed(), expected.clone(), "displayed after {:?}", op);
            prop_assert_eq!(text.get(), expected, "external after {:?}", op);
            prop_assert!(field.is_settled());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. No redundant writes at the fixed point
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn fixed_point_reconcile_writes_nothing(
        transform in transform_strategy(),
        raw in TEXT,
        repeats in 1usize..16,
    ) {
        let text = Observable::new(String::new());
        let reconciler = Reconciler::new(&text, transform.clone());
        reconciler.reconcile(&raw);
        reconciler.reset_stats();
        let version = text.version();
        let settled = reconciler.displayed();

        for _ in 0..repeats {
            reconciler.reconcile(&settled);
        }

        prop_assert_eq!(reconciler.stats().writes(), 0);
        prop_assert_eq!(reconciler.stats().reconciliations, repeats as u64);
        prop_assert_eq!(text.version(), version);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Observers never see unreconciled text
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn observers_only_receive_fixed_points(
        transform in transform_strategy(),
        ops in proptest::collection::vec(op_strategy(), 1..24),
    ) {
        let text = Observable::new(String::new());
        let mut field = FormattedField::new("t", &text, transform.clone());

        let host = Rc::new(RefCell::new(LogHost::default()));
        field.attach(&host);

        let observed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&observed);
        let _sub = text.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

        for op in &ops {
            match op {
                Op::Edit(raw) => field.edit(raw.clone()),
                // Writing the bound value is the caller's own act; what the
                // caller wrote is not "observed" raw text.
                Op::External(raw) => text.set(raw.clone()),
                Op::Reconcile(raw) => field.reconciler().reconcile(raw),
            }
        }

        for shown in &host.borrow().shown {
            prop_assert!(transform.is_fixed_point(shown), "host showed {:?}", shown);
        }
        for value in observed.borrow().iter() {
            prop_assert!(transform.is_fixed_point(value), "observer saw {:?}", value);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Stock transforms are idempotent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stock_transforms_idempotent(index in 0usize..6, raw in TEXT) {
        let transform = stock_transform(index);
        let once = transform.apply(&raw);
        prop_assert_eq!(transform.apply(&once), once);
    }

    #[test]
    fn max_graphemes_is_a_prefix(limit in 0usize..8, raw in TEXT) {
        let cut = stock::max_graphemes(limit).apply(&raw);
        prop_assert!(raw.starts_with(&cut));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Bounded nesting with idempotent transforms
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn nesting_stays_shallow(
        transform in transform_strategy(),
        ops in proptest::collection::vec(op_strategy(), 1..24),
    ) {
        let text = Observable::new(String::new());
        let field = FormattedField::new("t", &text, transform);

        for op in &ops {
            match op {
                Op::Edit(raw) => field.edit(raw.clone()),
                Op::External(raw) => text.set(raw.clone()),
                Op::Reconcile(raw) => field.reconciler().reconcile(raw),
            }
        }

        let stats = field.stats();
        prop_assert!(stats.max_depth <= 3, "max_depth {}", stats.max_depth);
        prop_assert_eq!(stats.reentry_warnings, 0);
    }
}
