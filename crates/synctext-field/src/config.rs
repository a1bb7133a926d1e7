#![forbid(unsafe_code)]

//! Reconciler tuning.

/// Default nesting depth past which a re-entrant reconciliation is reported.
///
/// A field whose transform is idempotent nests at most three deep (edit,
/// display write, external write), and callers chaining fields add a few
/// more levels per hop.
pub const DEFAULT_REENTRY_WARN_DEPTH: u32 = 16;

/// Configuration for a [`Reconciler`](crate::Reconciler).
///
/// # Example
///
/// ```
/// # use synctext_field::ReconcilerConfig;
/// let config = ReconcilerConfig::default().reentry_warn_depth(4);
/// assert_eq!(config.reentry_warn_depth, 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReconcilerConfig {
    /// Re-entrancy depth that counts as a suspected non-idempotent
    /// transform. Crossing it increments
    /// [`ReconcileStats::reentry_warnings`](crate::ReconcileStats) and, with
    /// the `tracing` feature, emits a warning. Reconciliation is never cut
    /// short.
    pub reentry_warn_depth: u32,
}

impl ReconcilerConfig {
    /// Set the re-entrancy warning depth.
    #[must_use]
    pub fn reentry_warn_depth(mut self, depth: u32) -> Self {
        self.reentry_warn_depth = depth;
        self
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            reentry_warn_depth: DEFAULT_REENTRY_WARN_DEPTH,
        }
    }
}
