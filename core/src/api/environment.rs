//! The boundary between a host program and one engine environment.

use alloc::rc::Rc;
use core::fmt::Write;

use tracing::debug;

use super::{BridgeOptions, Error};
use crate::callback::{CallbackError, EnvHandle, EnvironmentTable, Registry, host_function};
use crate::convert::{Converter, Extract};
use crate::engine::{ArgumentFrame, DataObject, MemoryEngine, NativeEngine};
use crate::slot::{DataSlot, codec};
use crate::values::Value;

/// Characters that cannot appear in an engine symbol.
const DELIMITERS: &[char] = &['(', ')', '"', '&', '|', '<', '~', ';', '?', '$'];

/// An engine environment with host callbacks attached.
///
/// Creating an environment registers the trampoline with its engine and
/// publishes its callback registry under a fresh [`EnvHandle`]. Dropping it
/// withdraws the registry, after which calls from the engine carrying the
/// old handle are abandoned.
///
/// # Example
///
/// ```
/// use rulebridge_core::api::Environment;
/// use rulebridge_core::values::Value;
///
/// let env = Environment::new().unwrap();
/// env.define_function("greet", |args: &[Value]| {
///     let name = args.first().and_then(Value::as_text).unwrap_or("world");
///     Ok(Value::string(format!("hello {name}")))
/// })
/// .unwrap();
///
/// let greeting = env.call("greet", &[Value::symbol("bob")]).unwrap();
/// assert_eq!(greeting, Value::string("hello bob"));
/// ```
pub struct Environment<E: NativeEngine = MemoryEngine> {
    engine: E,
    handle: EnvHandle,
    registry: Rc<Registry>,
    options: BridgeOptions,
}

impl Environment<MemoryEngine> {
    /// Create an environment backed by an in-process engine.
    pub fn new() -> Result<Self, Error> {
        Self::with_options(BridgeOptions::default())
    }

    pub fn with_options(options: BridgeOptions) -> Result<Self, Error> {
        Self::with_engine(MemoryEngine::new(), options)
    }
}

impl<E: NativeEngine> Environment<E> {
    /// Attach the bridge to `engine`.
    ///
    /// Fails if the engine refuses to register the trampoline.
    pub fn with_engine(engine: E, options: BridgeOptions) -> Result<Self, Error> {
        validate_name(&options.trampoline_name)?;
        if !engine.define_function(&options.trampoline_name) {
            return Err(Error::Api(format!(
                "unable to register trampoline {}",
                options.trampoline_name
            )));
        }

        let handle = EnvHandle::fresh();
        let registry = Rc::new(Registry::new());
        EnvironmentTable::with_global(|table| table.insert(handle, registry.clone()));
        debug!(%handle, trampoline = %options.trampoline_name, "environment created");

        Ok(Self {
            engine,
            handle,
            registry,
            options,
        })
    }

    pub fn handle(&self) -> EnvHandle {
        self.handle
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn options(&self) -> &BridgeOptions {
        &self.options
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Make `callback` callable from the engine as `name`.
    ///
    /// Builds a forwarding function that passes its name and arguments to
    /// the trampoline. Redefining a name replaces the previous callback.
    pub fn define_function<F>(&self, name: &str, callback: F) -> Result<(), Error>
    where
        F: Fn(&[Value]) -> Result<Value, CallbackError> + 'static,
    {
        validate_name(name)?;
        let construct = forwarding_construct(&self.options.trampoline_name, name);
        if !self.engine.build(&construct) {
            return Err(Error::Build { construct });
        }
        if self.registry.register(name, callback).is_some() {
            debug!(function = name, "callback replaced");
        }
        Ok(())
    }

    /// Call the function `name` the way the engine would: through the
    /// trampoline, with `name` as the leading symbol.
    ///
    /// Dispatch failures arrive as string results, exactly as the engine
    /// would see them.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        if !self.registry.contains(name) {
            return Err(Error::Eval {
                expression: call_expression(name, args),
            });
        }

        let mut frame = ArgumentFrame::new();
        frame.push_value(&self.engine, &Value::symbol(name));
        for arg in args {
            frame.push_value(&self.engine, arg);
        }

        let mut out = DataObject::default();
        host_function(&self.engine, self.handle, &frame, &mut out)
            .map_err(|err| Error::Api(err.to_string()))?;
        Ok(codec::decode(&out))
    }

    /// A fresh slot owned by the caller, allocated from this engine.
    pub fn slot(&self) -> DataSlot<'_> {
        DataSlot::new(&self.engine)
    }

    /// Coerce `value` into `target` using this environment's options.
    pub fn extract<T: Extract>(&self, value: &Value, target: &mut T) -> Result<(), Error> {
        self.converter().convert(target, value)?;
        Ok(())
    }

    /// A converter resolving instances through this environment's engine.
    pub fn converter(&self) -> Converter<'_> {
        Converter::new(&self.engine)
            .extract_references(self.options.extract_references)
            .module(self.options.default_module.as_deref())
    }
}

impl<E: NativeEngine> Drop for Environment<E> {
    fn drop(&mut self) {
        EnvironmentTable::unregister_global(self.handle);
        debug!(handle = %self.handle, "environment destroyed");
    }
}

impl<E: NativeEngine> core::fmt::Debug for Environment<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Environment")
            .field("handle", &self.handle)
            .field("registry", &self.registry)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() || name.contains(|c: char| c.is_whitespace() || DELIMITERS.contains(&c)) {
        return Err(Error::Api(format!("invalid function name {name:?}")));
    }
    Ok(())
}

/// `(deffunction NAME ($?args) (TRAMPOLINE NAME (expand$ ?args)))`
pub(crate) fn forwarding_construct(trampoline: &str, name: &str) -> String {
    format!("(deffunction {name} ($?args) ({trampoline} {name} (expand$ ?args)))")
}

fn call_expression(name: &str, args: &[Value]) -> String {
    let mut expression = format!("({name}");
    for arg in args {
        let _ = write!(expression, " {arg}");
    }
    expression.push(')');
    expression
}
