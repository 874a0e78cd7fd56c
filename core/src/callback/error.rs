//! Errors raised around callback dispatch.
//!
//! None of these ever reach the engine as a fault. Dispatch turns them into
//! a string value written to the call's output slot; their `Display` form is
//! that string.

use alloc::borrow::Cow;
use core::fmt;

use thiserror::Error;

use super::table::EnvHandle;

/// Failure reported by a host callback.
///
/// Any error type converts into this with `?`, recording its Rust type name
/// as the error kind. Must not implement [`std::error::Error`] itself while
/// that blanket conversion exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackError {
    kind: Cow<'static, str>,
    message: String,
}

impl CallbackError {
    pub fn new(kind: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// An error with the generic kind `error`.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new("error", message)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl<E: std::error::Error + 'static> From<E> for CallbackError {
    fn from(err: E) -> Self {
        Self::new(core::any::type_name::<E>(), err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// The engine called in with a handle no live environment owns.
    #[error("Error: Callback from unknown environment {0}")]
    UnknownEnvironment(EnvHandle),

    /// The call carried no first argument.
    #[error("Error: Invalid argument count")]
    ArgumentCount,

    /// The first argument did not decode to a symbol naming the callback.
    #[error("Error: Invalid argument type in callback, expected symbol but found {found}")]
    ArgumentType { found: &'static str },

    #[error("Error: Unknown callback name {0}")]
    UnknownCallback(String),

    /// The callback ran and reported a failure.
    #[error("{0}")]
    CallbackExecution(CallbackError),
}

impl From<CallbackError> for DispatchError {
    fn from(err: CallbackError) -> Self {
        DispatchError::CallbackExecution(err)
    }
}
