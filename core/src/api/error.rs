//! Public error type for the environment boundary.
//!
//! Coercion errors pass through unchanged. Dispatch errors never reach this
//! type: they are delivered to the engine as string results instead.

use thiserror::Error;

use crate::convert::ConversionError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Invalid API usage (e.g., a function name the engine cannot parse).
    #[error("API error: {0}")]
    Api(String),

    /// The engine rejected a textual construct.
    #[error("Unable to build construct: {construct}")]
    Build { construct: String },

    /// The engine could not evaluate an expression.
    #[error("Unable to evaluate expression: {expression}")]
    Eval { expression: String },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
