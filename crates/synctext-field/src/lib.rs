#![forbid(unsafe_code)]

//! Formatted text fields for synctext.
//!
//! A [`FormattedField`] keeps the text a host widget displays and a
//! caller-owned [`Observable<String>`](synctext_reactive::Observable) at the
//! same fixed point of a [`Transform`]. Raw input from either side is
//! normalized before the other side can see it, redundant writes are
//! skipped, and the equality guard on every write is what stops the two
//! sides from notifying each other forever.
//!
//! # Modules
//!
//! - [`transform`]: the [`Transform`] type and idempotent [`stock`] transforms.
//! - [`reconciler`]: the [`Reconciler`] and its [`ReconcileStats`].
//! - [`field`]: the [`FormattedField`] component and [`HostField`] trait.
//! - [`config`]: [`ReconcilerConfig`].
//!
//! # Feature Flags
//!
//! - `tracing`: emit `field.reconcile` events, a `field.attach` span and
//!   `field.reentry_depth` warnings.
//! - `serde`: derive `Serialize`/`Deserialize` for [`ReconcilerConfig`].

pub mod config;
pub mod field;
pub mod reconciler;
pub mod transform;

pub use config::{DEFAULT_REENTRY_WARN_DEPTH, ReconcilerConfig};
pub use field::{FormattedField, HostEdits, HostField, Title};
pub use reconciler::{ReconcileStats, Reconciler};
pub use transform::{Transform, stock};
