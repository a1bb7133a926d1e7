#![forbid(unsafe_code)]

//! synctext public facade.
//!
//! Re-exports the reactive cells and the formatted field component, plus a
//! [`prelude`] for glob import.
//!
//! ```
//! use synctext::prelude::*;
//!
//! let amount = Observable::new(String::from("ABC123"));
//! let field = FormattedField::new("Amount", &amount, stock::digits_only());
//! assert_eq!(field.displayed(), "123");
//! assert_eq!(amount.get(), "123");
//! ```

pub use synctext_field as field;
pub use synctext_reactive as reactive;

pub use synctext_field::{
    FormattedField, HostEdits, HostField, ReconcileStats, Reconciler, ReconcilerConfig, Title,
    Transform, stock,
};
pub use synctext_reactive::{Binding, BindingScope, Observable, Subscription};

pub mod prelude {
    pub use crate::{
        Binding, BindingScope, FormattedField, HostEdits, HostField, Observable, ReconcilerConfig,
        Subscription, Title, Transform, stock,
    };
}
