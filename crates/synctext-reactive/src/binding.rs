#![forbid(unsafe_code)]

//! Read bindings and subscription scopes on top of [`Observable`].
//!
//! A [`Binding<T>`] is a lazily evaluated view of reactive state. Hosts that
//! render from state every frame (immediate-mode UIs) hold a binding and call
//! [`get()`](Binding::get) at draw time instead of subscribing.
//!
//! ```ignore
//! use synctext_reactive::{Observable, bind, bind_map};
//!
//! let text = Observable::new(String::from("hell"));
//! let shown = bind!(text);
//! let width = bind_map!(text, |s| s.chars().count());
//!
//! text.set("hello".into());
//! assert_eq!(shown.get(), "hello");
//! assert_eq!(width.get(), 5);
//! ```
//!
//! A [`BindingScope`] owns every [`Subscription`] a component registers, so
//! dropping the component disconnects it from all the cells it watched.
//!
//! # Invariants
//!
//! 1. `Binding::get()` always reflects the current source value.
//! 2. The map function runs on every `get()` (no caching).
//! 3. Dropping a `BindingScope` releases its subscriptions in reverse
//!    registration order; no callback from the scope fires afterwards.
//!
//! # Failure Modes
//!
//! - Map panic: propagates to the caller of `get()`.
//! - Source handle dropped while a binding is alive: the binding keeps the
//!   shared value alive and still works.

use std::rc::Rc;

use super::observable::{Observable, Subscription};

/// A read-only view of reactive state, evaluated at read time.
///
/// Immediate-mode hosts keep one per field and read it while drawing; there
/// is nothing to invalidate because nothing is cached.
pub struct Binding<T> {
    read: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            read: Rc::clone(&self.read),
        }
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Wrap a read function; it runs on every [`get()`](Self::get).
    pub fn new(read: impl Fn() -> T + 'static) -> Self {
        Self { read: Rc::new(read) }
    }

    /// Read the current value.
    #[must_use]
    pub fn get(&self) -> T {
        (self.read)()
    }

    /// Derive a view, e.g. a masked or truncated rendering of field text.
    pub fn then<U: 'static>(self, map: impl Fn(T) -> U + 'static) -> Binding<U> {
        let read = self.read;
        Binding::new(move || map(read()))
    }
}

/// View an observable's value as-is (one clone per read).
pub fn bind_observable<T: Clone + PartialEq + 'static>(source: &Observable<T>) -> Binding<T> {
    let cell = source.clone();
    Binding::new(move || cell.get())
}

/// View `map(&value)`; the value is borrowed, so only the mapped result is
/// allocated per read.
pub fn bind_mapped<S: Clone + PartialEq + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let cell = source.clone();
    Binding::new(move || cell.with(&map))
}

/// Create a direct [`Binding`] to an observable.
#[macro_export]
macro_rules! bind {
    ($obs:expr) => {
        $crate::binding::bind_observable(&$obs)
    };
}

/// Create a mapped [`Binding`] from an observable and a map function.
#[macro_export]
macro_rules! bind_map {
    ($obs:expr, $f:expr) => {
        $crate::binding::bind_mapped(&$obs, $f)
    };
}

/// Owns the subscriptions of one component.
///
/// Everything registered through the scope is released when the scope is
/// dropped or [`clear()`](BindingScope::clear)ed.
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Keep an existing subscription alive for the scope's lifetime.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to future changes of `source`.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    /// Call `callback` with the current value now, then on every change.
    ///
    /// This is the shape a display sink wants: it must paint the current
    /// state before the first change arrives. The first call runs on a
    /// snapshot, so the callback may write back to `source`.
    pub fn watch<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let current = source.get();
        callback(&current);
        self.subscribe(source, callback)
    }

    /// Number of subscriptions held.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Whether the scope holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription now; the scope can be reused.
    pub fn clear(&mut self) {
        while self.subscriptions.pop().is_some() {}
    }
}

impl Default for BindingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BindingScope {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}
