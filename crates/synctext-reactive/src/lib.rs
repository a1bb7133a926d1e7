#![forbid(unsafe_code)]

//! Observable values and bindings for synctext.
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Binding`]: a lazily evaluated read view of reactive state.
//! - [`BindingScope`]: owns a component's subscriptions and releases them
//!   together.
//!
//! # Architecture
//!
//! `Observable<T>` uses `Rc<RefCell<..>>` for single-threaded shared
//! ownership, which also keeps every type here `!Send`: writes from another
//! thread must be marshaled onto the UI thread before they reach a cell.
//! Subscribers are stored as `Weak` function pointers and pruned lazily
//! during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version bump,
//!    no notifications).
//! 4. A write made from inside a notification supersedes the pass that
//!    triggered it; subscribers never see a value older than one already
//!    delivered.
//! 5. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.

pub mod binding;
pub mod observable;

pub use binding::{Binding, BindingScope, bind_mapped, bind_observable};
pub use observable::{Observable, Subscription};
