#![forbid(unsafe_code)]

//! The reconciliation routine that keeps two text cells at a fixed point.
//!
//! # Design
//!
//! A [`Reconciler`] owns the displayed text cell and holds a handle to the
//! caller's external cell. [`reconcile(raw)`](Reconciler::reconcile) computes
//! `processed = transform(raw)` and writes `processed` to each cell **only if
//! that cell differs from it**. Both cells are [`Observable`]s, so a write
//! fires a change notification which (once wired up by
//! [`FormattedField`](crate::FormattedField)) calls `reconcile` again. With an
//! idempotent transform that nested call finds both cells equal and writes
//! nothing, which is what terminates the feedback between the two sides.
//!
//! # Invariants
//!
//! 1. After `reconcile(raw)` returns:
//!    `displayed == external == transform(raw)`, unless a nested write
//!    superseded it (see 4).
//! 2. A reconciliation whose result already equals both cells performs zero
//!    writes and fires zero notifications.
//! 3. The displayed cell is written before the external cell, so external
//!    observers only ever receive transformed text.
//! 4. If a nested reconcile overwrites the displayed cell while this one is
//!    writing it, this one stops: the newer value wins on both sides.
//!
//! # Failure Modes
//!
//! - **Non-idempotent transform**: reconciliation recurses until values
//!   happen to stabilize or the stack is exhausted. Crossing
//!   [`ReconcilerConfig::reentry_warn_depth`] is counted in
//!   [`ReconcileStats::reentry_warnings`] and logged under the `tracing`
//!   feature; nothing is cut short.
//! - **Transform panics**: propagates to whoever triggered the reconcile.
//!   The depth counter is restored during unwinding.

use std::cell::Cell;

use synctext_reactive::Observable;

use crate::config::ReconcilerConfig;
use crate::transform::Transform;

/// Counters describing what a [`Reconciler`] has done.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Calls to [`Reconciler::reconcile`], nested ones included.
    pub reconciliations: u64,
    /// Writes to the displayed cell.
    pub display_writes: u64,
    /// Writes to the external cell.
    pub external_writes: u64,
    /// Deepest re-entrant nesting observed.
    pub max_depth: u32,
    /// Times nesting crossed the configured warning depth.
    pub reentry_warnings: u64,
}

impl ReconcileStats {
    /// Total writes to either cell.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.display_writes + self.external_writes
    }
}

/// Keeps displayed text and an external value at a fixed point of a
/// [`Transform`].
pub struct Reconciler {
    displayed: Observable<String>,
    external: Observable<String>,
    transform: Transform,
    config: ReconcilerConfig,
    depth: Cell<u32>,
    warned: Cell<bool>,
    stats: Cell<ReconcileStats>,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("displayed", &self.displayed.get())
            .field("external", &self.external.get())
            .field("transform", &self.transform)
            .field("stats", &self.stats.get())
            .finish()
    }
}

impl Reconciler {
    /// Create a reconciler bound to `external` with empty displayed text.
    ///
    /// Nothing is reconciled yet; call [`activate()`](Self::activate).
    #[must_use]
    pub fn new(external: &Observable<String>, transform: Transform) -> Self {
        Self::with_config(external, transform, ReconcilerConfig::default())
    }

    /// Create a reconciler with explicit configuration.
    #[must_use]
    pub fn with_config(
        external: &Observable<String>,
        transform: Transform,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            displayed: Observable::new(String::new()),
            external: external.clone(),
            transform,
            config,
            depth: Cell::new(0),
            warned: Cell::new(false),
            stats: Cell::new(ReconcileStats::default()),
        }
    }

    /// Establish the fixed point from the external value (mount).
    pub fn activate(&self) {
        let current = self.external.get();
        self.reconcile(&current);
    }

    /// Normalize `raw` and write it to whichever cells differ from it.
    pub fn reconcile(&self, raw: &str) {
        let depth = DepthGuard::enter(self);
        let processed = self.transform.apply(raw);
        self.record(|stats| stats.reconciliations += 1);

        let display_stale = self.displayed.with(|current| *current != processed);
        if display_stale {
            self.record(|stats| stats.display_writes += 1);
            let expected = self.displayed.version() + 1;
            self.displayed.set(processed.clone());
            if self.displayed.version() != expected {
                // Superseded: a nested reconcile wrote newer text and has
                // already settled both cells.
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    message = "field.reconcile.superseded",
                    transform = self.transform.name(),
                    depth = depth.level,
                );
                return;
            }
        }

        // The display write may already have pushed `processed` outward
        // through a nested reconcile.
        let external_stale = self.external.with(|current| *current != processed);
        if external_stale {
            self.record(|stats| stats.external_writes += 1);
            self.external.set(processed);
        }

        #[cfg(feature = "tracing")]
        {
            if display_stale || external_stale {
                tracing::debug!(
                    message = "field.reconcile",
                    transform = self.transform.name(),
                    display_write = display_stale,
                    external_write = external_stale,
                    depth = depth.level,
                );
            } else {
                tracing::trace!(
                    message = "field.reconcile.noop",
                    transform = self.transform.name(),
                    depth = depth.level,
                );
            }
        }

        drop(depth);
    }

    /// Current displayed text.
    #[must_use]
    pub fn displayed(&self) -> String {
        self.displayed.get()
    }

    /// The displayed-text cell. Host edits are written here.
    #[must_use]
    pub fn displayed_cell(&self) -> &Observable<String> {
        &self.displayed
    }

    /// The external cell this reconciler writes to.
    #[must_use]
    pub fn external_cell(&self) -> &Observable<String> {
        &self.external
    }

    /// The transform applied to every input.
    #[must_use]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> ReconcilerConfig {
        self.config
    }

    /// Whether both cells hold the same fixed point of the transform.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        let displayed = self.displayed.get();
        self.external.with(|external| *external == displayed)
            && self.transform.is_fixed_point(&displayed)
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> ReconcileStats {
        self.stats.get()
    }

    /// Zero all counters.
    pub fn reset_stats(&self) {
        self.stats.set(ReconcileStats::default());
    }

    fn record(&self, f: impl FnOnce(&mut ReconcileStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Tracks re-entrant nesting; restores the depth on drop (including unwind).
struct DepthGuard<'a> {
    owner: &'a Reconciler,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    level: u32,
}

impl<'a> DepthGuard<'a> {
    fn enter(owner: &'a Reconciler) -> Self {
        let level = owner.depth.get() + 1;
        owner.depth.set(level);
        owner.record(|stats| stats.max_depth = stats.max_depth.max(level));

        if level > owner.config.reentry_warn_depth && !owner.warned.get() {
            owner.warned.set(true);
            owner.record(|stats| stats.reentry_warnings += 1);
            #[cfg(feature = "tracing")]
            tracing::warn!(
                message = "field.reentry_depth",
                transform = owner.transform.name(),
                depth = level,
                limit = owner.config.reentry_warn_depth,
            );
        }

        Self { owner, level }
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        let level = self.owner.depth.get().saturating_sub(1);
        self.owner.depth.set(level);
        if level == 0 {
            self.owner.warned.set(false);
        }
    }
}
