//! The trampoline: the single engine function through which engine code
//! reaches every host callback.
//!
//! Wire contract: argument 1 is a symbol naming the callback, arguments
//! 2..=N are forwarded to it in order, and the result is written to the
//! engine's output data object. Failures are written there too, as strings;
//! the engine has no channel for host errors.

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::registry::Registry;
use super::table::{EnvHandle, EnvironmentTable};
use super::DispatchError;
use crate::engine::{CallFrame, DataObject, NativeEngine};
use crate::slot::DataSlot;
use crate::values::{Tag, Value};

/// Name the trampoline is registered under unless configured otherwise.
pub const TRAMPOLINE_NAME: &str = "host-function";

/// Entry point called by the engine.
///
/// Resolves `handle` in `table` and dispatches the call, writing the result
/// or a diagnostic string into `out`. An unknown handle abandons the call
/// and leaves `out` untouched.
pub fn trampoline(
    engine: &dyn NativeEngine,
    table: &EnvironmentTable,
    handle: EnvHandle,
    frame: &dyn CallFrame,
    out: &mut DataObject,
) -> Result<(), DispatchError> {
    let registry = table.resolve(handle).inspect_err(|err| {
        warn!(%err, "abandoning callback dispatch");
    })?;

    let mut output = DataSlot::wrap(engine, out);
    match dispatch(engine, &registry, frame) {
        Ok(value) => output.set(value),
        Err(err) => {
            debug!(%err, "callback dispatch failed");
            output.set(Value::String(err.to_string()));
        }
    }
    Ok(())
}

/// [`trampoline`] against this thread's shared environment table.
pub fn host_function(
    engine: &dyn NativeEngine,
    handle: EnvHandle,
    frame: &dyn CallFrame,
    out: &mut DataObject,
) -> Result<(), DispatchError> {
    EnvironmentTable::with_global(|table| trampoline(engine, table, handle, frame, out))
}

/// Decode a call, run the named callback and return its result.
///
/// Every engine call runs exactly one callback, or none if the call is
/// malformed. Arguments are read through one scratch slot and decoded into
/// owned values before the callback sees them.
pub fn dispatch(
    engine: &dyn NativeEngine,
    registry: &Registry,
    frame: &dyn CallFrame,
) -> Result<Value, DispatchError> {
    let arg_count = frame.arg_count();
    let mut scratch = DataSlot::new(engine);

    if !scratch.load(|data| frame.arg_type_check(1, Tag::Symbol, data)) {
        if arg_count == 0 {
            return Err(DispatchError::ArgumentCount);
        }
        return Err(DispatchError::ArgumentType {
            found: scratch.value().type_name(),
        });
    }
    let name = match scratch.value() {
        Value::Symbol(name) => name,
        // TRUE, FALSE and nil pass the tag check but do not decode to symbols.
        other => {
            return Err(DispatchError::ArgumentType {
                found: other.type_name(),
            });
        }
    };

    let callback = registry
        .get(&name)
        .ok_or_else(|| DispatchError::UnknownCallback(name.to_string()))?;

    let mut args: SmallVec<[Value; 4]> = SmallVec::with_capacity(arg_count.saturating_sub(1));
    for index in 2..=arg_count {
        if scratch.load(|data| frame.arg(index, data)) {
            args.push(scratch.value());
        } else {
            args.push(Value::Nil);
        }
    }
    scratch.release();

    debug!(callback = %name, args = args.len(), "dispatching callback");
    Ok(callback(args.as_slice())?)
}
