//! Coercion errors.
//!
//! These are returned to whoever asked for the conversion. The bridge never
//! logs or swallows them.

use thiserror::Error;

use crate::values::InstanceRef;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    /// The source value cannot be represented by the target type at all.
    #[error("Invalid type \"{from}\", expected \"{to}\"")]
    TypeMismatch { from: &'static str, to: String },

    /// A nil source was offered to a target that has no empty form.
    #[error("Unable to convert nil value to non-optional type {to}")]
    NilToNonNullable { to: String },

    /// Narrowing an integer would change its value.
    #[error("Integer {value} too large for {to}")]
    Overflow { value: i64, to: String },

    /// Narrowing a float would change its value.
    #[error("Floating point {value} too precise to represent as {to}")]
    PrecisionLoss { value: f64, to: String },

    #[error("Unable to find instance [{name}]")]
    InstanceNotFound { name: String },

    #[error("Unable to resolve instance reference {}", reference.index())]
    UnresolvedInstance { reference: InstanceRef },

    #[error("Instance [{instance}] has no slot {slot}")]
    MissingSlot { instance: String, slot: String },
}
