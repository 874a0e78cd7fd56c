//! Public API for hosting callbacks inside a rule engine.
//!
//! An [`Environment`] owns an engine, registers the trampoline with it and
//! keeps the environment's callback registry reachable from the trampoline
//! through the shared environment table.
//!
//! # Example
//!
//! ```
//! use rulebridge_core::api::Environment;
//! use rulebridge_core::values::Value;
//!
//! let env = Environment::new().unwrap();
//! env.define_function("add", |args: &[Value]| {
//!     let sum = args.iter().filter_map(Value::as_int).sum::<i64>();
//!     Ok(Value::Integer(sum))
//! })
//! .unwrap();
//!
//! let result = env.call("add", &[Value::Integer(40), Value::Integer(2)]).unwrap();
//! assert_eq!(result, Value::Integer(42));
//! ```

pub mod environment;
pub mod error;
pub mod options;

pub use environment::Environment;
pub use error::Error;
pub use options::BridgeOptions;

#[cfg(test)]
mod environment_test;
