#![forbid(unsafe_code)]

//! A text field component whose bound value is always normalized.
//!
//! [`FormattedField`] wires a [`Reconciler`] to its two event sources:
//!
//! - **host edits**: the host text field writes the displayed cell (via
//!   [`edit()`](FormattedField::edit) or a [`HostEdits`] handle);
//! - **external changes**: the caller writes the bound `text` cell.
//!
//! Both subscriptions call the same `reconcile`. Construction activates the
//! field (reconciles against the current bound value) before returning, so
//! no caller or host ever sees an unreconciled component.
//!
//! ```
//! # use synctext_field::{FormattedField, stock};
//! # use synctext_reactive::Observable;
//! let text = Observable::new(String::from("  hi  "));
//! let field = FormattedField::new("Name", &text, stock::trim());
//! assert_eq!(field.displayed(), "hi");
//! assert_eq!(text.get(), "hi");
//!
//! field.edit(" hello ");
//! assert_eq!(text.get(), "hello");
//!
//! text.set("  bye".into());
//! assert_eq!(field.displayed(), "bye");
//! ```
//!
//! # Host contract
//!
//! A [`HostField`] attached with [`attach()`](FormattedField::attach) is told
//! the title, then the current text, then every later change to the
//! displayed text. Its subscription is registered after the reconciler's,
//! so it only ever receives reconciled text. `display()` must not deliver an
//! edit synchronously (the host is mutably borrowed while it runs); queue
//! the edit and send it through [`HostEdits`] afterwards.
//!
//! # Lifecycle
//!
//! Dropping the field releases every subscription it holds. The bound
//! `text` cell belongs to the caller and keeps its last value.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use synctext_reactive::{Binding, BindingScope, Observable, bind_observable};

use crate::config::ReconcilerConfig;
use crate::reconciler::{ReconcileStats, Reconciler};
use crate::transform::Transform;

/// Label for a field, passed through to the host unmodified.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Title {
    /// Text to show as-is.
    Literal(String),
    /// A localization key for the host to resolve.
    Key(String),
}

impl Title {
    /// A literal label.
    #[must_use]
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// A localization key.
    #[must_use]
    pub fn key(key: impl Into<String>) -> Self {
        Self::Key(key.into())
    }

    /// The literal text or the key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Literal(s) | Self::Key(s) => s,
        }
    }

    /// Whether this is a localization key.
    #[must_use]
    pub fn is_key(&self) -> bool {
        matches!(self, Self::Key(_))
    }
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self::literal(text)
    }
}

impl From<String> for Title {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The host text-field widget a [`FormattedField`] drives.
pub trait HostField {
    /// Render `text` as the field's content.
    fn display(&mut self, text: &str);

    /// Receive the field's title (label or placeholder).
    fn set_title(&mut self, _title: &Title) {}
}

/// Cloneable handle a host uses to deliver user edits.
///
/// Edits sent after the field is dropped land in a disconnected cell and
/// reach nobody.
#[derive(Clone, Debug)]
pub struct HostEdits {
    displayed: Observable<String>,
}

impl HostEdits {
    /// Report that the user changed the field's text to `raw`.
    pub fn edit(&self, raw: impl Into<String>) {
        self.displayed.set(raw.into());
    }
}

/// A text field whose displayed text and bound value are always the same
/// fixed point of its transform.
pub struct FormattedField {
    title: Title,
    reconciler: Rc<Reconciler>,
    hosts: BindingScope,
    triggers: BindingScope,
}

impl fmt::Debug for FormattedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormattedField")
            .field("title", &self.title)
            .field("reconciler", &self.reconciler)
            .field("hosts", &self.hosts.binding_count())
            .finish()
    }
}

impl FormattedField {
    /// Create and activate a field bound to `text`.
    pub fn new(
        title: impl Into<Title>,
        text: &Observable<String>,
        transform: impl Into<Transform>,
    ) -> Self {
        Self::with_config(title, text, transform, ReconcilerConfig::default())
    }

    /// Create and activate a field with explicit reconciler configuration.
    pub fn with_config(
        title: impl Into<Title>,
        text: &Observable<String>,
        transform: impl Into<Transform>,
        config: ReconcilerConfig,
    ) -> Self {
        let reconciler = Rc::new(Reconciler::with_config(text, transform.into(), config));
        let mut triggers = BindingScope::new();

        let on_edit = Rc::downgrade(&reconciler);
        triggers.subscribe(reconciler.displayed_cell(), move |edited: &String| {
            if let Some(reconciler) = on_edit.upgrade() {
                reconciler.reconcile(edited);
            }
        });

        let on_external = Rc::downgrade(&reconciler);
        triggers.subscribe(text, move |changed: &String| {
            if let Some(reconciler) = on_external.upgrade() {
                reconciler.reconcile(changed);
            }
        });

        reconciler.activate();

        Self {
            title: title.into(),
            reconciler,
            hosts: BindingScope::new(),
            triggers,
        }
    }

    /// Deliver a host edit: the user changed the text to `raw`.
    pub fn edit(&self, raw: impl Into<String>) {
        self.reconciler.displayed_cell().set(raw.into());
    }

    /// A handle for delivering edits without borrowing the field.
    #[must_use]
    pub fn edits(&self) -> HostEdits {
        HostEdits {
            displayed: self.reconciler.displayed_cell().clone(),
        }
    }

    /// Connect a host widget; it is sent the title and current text now and
    /// every displayed-text change afterwards.
    pub fn attach<H: HostField + 'static>(&mut self, host: &Rc<RefCell<H>>) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "field.attach",
            title = self.title.as_str(),
            hosts = self.hosts.binding_count() + 1,
        )
        .entered();

        host.borrow_mut().set_title(&self.title);
        let sink = Rc::clone(host);
        self.hosts
            .watch(self.reconciler.displayed_cell(), move |text: &String| {
                sink.borrow_mut().display(text);
            });
    }

    /// Disconnect every attached host.
    pub fn detach_hosts(&mut self) {
        self.hosts.clear();
    }

    /// Number of attached hosts.
    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.binding_count()
    }

    /// Current displayed text.
    #[must_use]
    pub fn displayed(&self) -> String {
        self.reconciler.displayed()
    }

    /// A read binding on the displayed text, for hosts that render from
    /// state each frame instead of subscribing.
    #[must_use]
    pub fn displayed_binding(&self) -> Binding<String> {
        bind_observable(self.reconciler.displayed_cell())
    }

    /// Handle to the bound external value.
    #[must_use]
    pub fn text(&self) -> &Observable<String> {
        self.reconciler.external_cell()
    }

    /// The field's title.
    #[must_use]
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// The field's transform.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        self.reconciler.transform()
    }

    /// Whether displayed text and bound value agree on a fixed point.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.reconciler.is_settled()
    }

    /// Reconciliation counters.
    #[must_use]
    pub fn stats(&self) -> ReconcileStats {
        self.reconciler.stats()
    }

    /// The underlying reconciler.
    #[must_use]
    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    /// Number of event-source subscriptions (always two while alive).
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.triggers.binding_count()
    }
}
