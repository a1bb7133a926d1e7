//! Property-based invariant tests for `Observable`.
//!
//! 1. Version counts exactly the writes that changed the value.
//! 2. A subscriber receives exactly the sequence of distinct changes.
//! 3. Dropped subscriptions never fire again.
//! 4. A normalizing subscriber that writes back during notification leaves
//!    later subscribers with only normalized values, in order.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use synctext_reactive::{BindingScope, Observable, bind_observable};

proptest! {
    #[test]
    fn version_counts_changes(writes in proptest::collection::vec(0u8..4, 0..64)) {
        let obs = Observable::new(0u8);
        let mut expected_version = 0u64;
        let mut current = 0u8;
        for w in writes {
            if w != current {
                expected_version += 1;
                current = w;
            }
            obs.set(w);
        }
        prop_assert_eq!(obs.version(), expected_version);
        prop_assert_eq!(obs.get(), current);
    }

    #[test]
    fn subscriber_sees_each_distinct_change(writes in proptest::collection::vec("[ab]{0,2}", 0..48)) {
        let obs = Observable::new(String::new());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _sub = obs.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

        let mut expected = Vec::new();
        let mut current = String::new();
        for w in writes {
            if w != current {
                expected.push(w.clone());
                current = w.clone();
            }
            obs.set(w);
        }
        prop_assert_eq!(&*log.borrow(), &expected);
        prop_assert_eq!(bind_observable(&obs).get(), current);
    }

    #[test]
    fn dropped_scope_never_fires(before in 0u32..20, after in 1u32..20) {
        let obs = Observable::new(0u32);
        let hits = Rc::new(RefCell::new(0u32));
        let mut scope = BindingScope::new();
        let h = Rc::clone(&hits);
        scope.subscribe(&obs, move |_| *h.borrow_mut() += 1);

        for i in 1..=before {
            obs.set(i);
        }
        drop(scope);
        for i in 1..=after {
            obs.set(before + i);
        }
        prop_assert_eq!(*hits.borrow(), before);
        prop_assert_eq!(obs.subscriber_count(), 0);
    }

    #[test]
    fn writeback_hides_raw_values(writes in proptest::collection::vec("[ x]{0,4}", 1..32)) {
        let obs = Observable::new(String::new());
        let normalizer = obs.clone();
        let _norm = obs.subscribe(move |v: &String| {
            let trimmed = v.trim().to_string();
            if trimmed != *v {
                normalizer.set(trimmed);
            }
        });
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let _late = obs.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

        for w in writes {
            obs.set(w);
        }

        let log = log.borrow();
        for v in log.iter() {
            prop_assert_eq!(v.trim(), v.as_str(), "late subscriber saw {:?}", v);
        }
        let last = obs.get();
        prop_assert_eq!(last.trim(), last.as_str());
    }
}
