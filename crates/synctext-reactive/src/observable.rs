#![forbid(unsafe_code)]

//! Shared, version-tracked values with synchronous change notification.
//!
//! # Design
//!
//! [`Observable<T>`] is a cheap handle (`Rc<RefCell<..>>`) to a value plus a
//! list of subscriber callbacks. Cloning the handle shares the value. The
//! observable only holds `Weak` references to its callbacks; the strong
//! reference lives in the [`Subscription`] returned by
//! [`subscribe()`](Observable::subscribe), so dropping the guard is all it
//! takes to disconnect.
//!
//! # Invariants
//!
//! 1. `set(v)` with `v == current` is a no-op: no version bump, no callbacks.
//! 2. Version increments exactly once per mutation that changes the value.
//! 3. Subscribers are called in registration order, synchronously, before
//!    `set()` returns.
//! 4. A subscriber may write the observable it is being notified about. The
//!    nested write notifies every subscriber with the newer value, and the
//!    outer pass stops as soon as it sees the version moved. No subscriber
//!    is handed a value older than one it has already received.
//! 5. No `RefCell` borrow is held while a callback runs.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the value and version are already updated; the
//!   remaining subscribers of that pass are skipped.
//! - **Writing from inside [`with()`](Observable::with)**: panics with a
//!   `BorrowMutError`, since the closure runs under a shared borrow.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = dyn Fn(&T);

struct ObservableInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared value that notifies subscribers when it changes.
///
/// Cloning an `Observable` creates a new handle to the **same** value.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a new observable holding `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value without cloning it.
    ///
    /// The closure must not write to this observable.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        let version = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
            inner.version
        };
        self.notify(version);
    }

    /// Mutate a copy of the value in place and store it back via [`set()`].
    ///
    /// [`set()`]: Observable::set
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Number of value-changing mutations since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Register a callback invoked with the new value after every change.
    ///
    /// The callback stays registered until the returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription {
            _callback: Box::new(strong),
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Whether both handles point at the same shared value.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn notify(&self, version: u64) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), callbacks)
        };

        for callback in callbacks {
            // A callback wrote a newer value; that write already notified
            // everyone, so the rest of this pass would deliver stale data.
            if self.inner.borrow().version != version {
                break;
            }
            callback(&snapshot);
        }
    }
}

/// RAII guard for an [`Observable`] subscription.
///
/// Dropping it unregisters the callback. The guard is type-erased so guards
/// from observables of different value types can be stored together.
#[must_use = "dropping a Subscription immediately unsubscribes"]
pub struct Subscription {
    _callback: Box<dyn Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
