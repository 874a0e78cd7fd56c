//! A value bridge between host code and a forward-chaining rule engine.
//!
//! Host values cross into engine storage through [`slot::DataSlot`], come
//! back out through the coercion rules in [`convert`], and engine code calls
//! host functions through the trampoline in [`callback`].

extern crate alloc;

pub mod api;
pub mod callback;
pub mod convert;
pub mod engine;
pub mod slot;
pub mod values;

pub use api::{BridgeOptions, Environment, Error};
pub use callback::{CallbackError, DispatchError};
pub use convert::{ConversionError, Converter, Extract, convert};
pub use slot::DataSlot;
pub use values::{IntoValue, Tag, Value};

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_dispatch() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
