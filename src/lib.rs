//! Rulebridge - host functions and values for a forward-chaining rule engine
//!
//! # Overview
//!
//! Rulebridge moves values between a host program and a CLIPS-style rule
//! engine, and lets engine code call host functions:
//!
//! - Host values are encoded into engine data objects and decoded back
//! - Decoded values are coerced into typed host targets with range checks
//! - Engine calls are routed to registered host callbacks by name
//!
//! # Quick Start
//!
//! ```
//! use rulebridge::{Environment, Value};
//!
//! let env = Environment::new().unwrap();
//! env.define_function("double", |args: &[Value]| {
//!     let n = args.first().and_then(Value::as_int).unwrap_or(0);
//!     Ok(Value::Integer(n * 2))
//! })
//! .unwrap();
//!
//! let result = env.call("double", &[Value::Integer(21)]).unwrap();
//! assert_eq!(result, Value::Integer(42));
//!
//! // Coerce engine values into host types
//! let mut small: i8 = 0;
//! assert!(env.extract(&Value::Integer(300), &mut small).is_err());
//! ```
//!
//! # Callback Errors
//!
//! Callbacks return [`CallbackError`]. Any standard error converts into one
//! with `?`, and the engine sees it as a `"kind: message"` string result:
//!
//! ```
//! use rulebridge::{Environment, Value};
//!
//! let env = Environment::new().unwrap();
//! env.define_function("parse", |args: &[Value]| {
//!     let text = args.first().and_then(Value::as_text).unwrap_or_default();
//!     Ok(Value::Integer(text.parse::<i64>()?))
//! })
//! .unwrap();
//!
//! let result = env.call("parse", &[Value::string("nope")]).unwrap();
//! assert!(result.as_text().unwrap().ends_with("invalid digit found in string"));
//! ```

// Re-export public API from rulebridge_core
pub use rulebridge_core::api::{BridgeOptions, Environment, Error};

// Re-export commonly used types and values
pub use rulebridge_core::values::{
    self, ExternalAddress, FactRef, InstanceName, InstanceRef, IntoValue, Symbol, Tag, Value,
};
pub use rulebridge_core::{callback, convert, engine, slot};
pub use rulebridge_core::{Converter, DataSlot, Extract};

// Re-export errors
pub use rulebridge_core::{CallbackError, ConversionError, DispatchError};
