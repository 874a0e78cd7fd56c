//! Tests for the environment boundary.

use pretty_assertions::assert_eq;

use crate::api::{BridgeOptions, Environment, Error};
use crate::callback::{CallbackError, EnvironmentTable};
use crate::convert::ConversionError;
use crate::engine::{Atom, Instance, InstanceResolver, MemoryEngine, Multifield, NativeEngine};
use crate::values::{ExternalAddress, InstanceRef, Value};

fn sum(args: &[Value]) -> Result<Value, CallbackError> {
    Ok(Value::Integer(args.iter().filter_map(Value::as_int).sum()))
}

#[test]
fn test_new_registers_trampoline() {
    let env = Environment::new().unwrap();
    assert_eq!(env.engine().functions(), vec!["host-function".to_string()]);
    assert!(EnvironmentTable::with_global(|table| table.contains(env.handle())));
}

#[test]
fn test_define_function_builds_forwarding_construct() {
    let env = Environment::new().unwrap();
    env.define_function("sum", sum).unwrap();

    assert_eq!(
        env.engine().constructs(),
        vec!["(deffunction sum ($?args) (host-function sum (expand$ ?args)))".to_string()]
    );
    assert!(env.registry().contains("sum"));
}

#[test]
fn test_custom_trampoline_name() {
    let options = BridgeOptions {
        trampoline_name: "py-function".into(),
        ..BridgeOptions::default()
    };
    let env = Environment::with_options(options).unwrap();
    env.define_function("sum", sum).unwrap();

    assert_eq!(env.engine().functions(), vec!["py-function".to_string()]);
    assert_eq!(
        env.engine().constructs(),
        vec!["(deffunction sum ($?args) (py-function sum (expand$ ?args)))".to_string()]
    );
}

#[test]
fn test_call_spreads_arguments() {
    let env = Environment::new().unwrap();
    env.define_function("sum", sum).unwrap();

    let args = [Value::Integer(1), Value::Integer(2), Value::Integer(39)];
    assert_eq!(env.call("sum", &args), Ok(Value::Integer(42)));
    assert_eq!(env.call("sum", &[]), Ok(Value::Integer(0)));
}

#[test]
fn test_call_undefined_function() {
    let env = Environment::new().unwrap();
    let err = env
        .call("missing", &[Value::Integer(1), Value::string("x")])
        .unwrap_err();
    assert_eq!(
        err,
        Error::Eval {
            expression: "(missing 1 \"x\")".into()
        }
    );
}

#[test]
fn test_invalid_function_names() {
    let env = Environment::new().unwrap();
    for name in ["", "two words", "(paren", "a\"b"] {
        assert!(
            matches!(env.define_function(name, sum), Err(Error::Api(_))),
            "{:?}",
            name
        );
    }
    assert!(env.engine().constructs().is_empty());
}

#[test]
fn test_callback_failure_is_a_string_result() {
    let env = Environment::new().unwrap();
    env.define_function("fail", |_: &[Value]| {
        Err(CallbackError::new("ValueError", "bad input"))
    })
    .unwrap();

    assert_eq!(
        env.call("fail", &[]),
        Ok(Value::string("ValueError: bad input"))
    );
}

#[test]
fn test_redefinition_replaces_callback() {
    let env = Environment::new().unwrap();
    env.define_function("f", |_: &[Value]| Ok(Value::Integer(1)))
        .unwrap();
    env.define_function("f", |_: &[Value]| Ok(Value::Integer(2)))
        .unwrap();
    assert_eq!(env.call("f", &[]), Ok(Value::Integer(2)));
    assert_eq!(env.registry().len(), 1);
}

#[test]
fn test_environments_are_isolated() {
    let first = Environment::new().unwrap();
    let second = Environment::new().unwrap();
    first
        .define_function("who", |_: &[Value]| Ok(Value::symbol("first")))
        .unwrap();
    second
        .define_function("who", |_: &[Value]| Ok(Value::symbol("second")))
        .unwrap();

    assert_ne!(first.handle(), second.handle());
    assert_eq!(first.call("who", &[]), Ok(Value::symbol("first")));
    assert_eq!(second.call("who", &[]), Ok(Value::symbol("second")));
}

#[test]
fn test_drop_withdraws_registry() {
    let env = Environment::new().unwrap();
    let handle = env.handle();
    drop(env);
    assert!(!EnvironmentTable::with_global(|table| table.contains(handle)));
}

// ============================================================================
// Extraction
// ============================================================================

#[test]
fn test_extract_uses_options() {
    let env = Environment::new().unwrap();
    let reference = env
        .engine()
        .make_instance("rex", "DOG", [("legs", Value::Integer(4))]);

    let mut target = Instance::default();
    env.extract(&Value::instance_name("rex"), &mut target)
        .unwrap();
    assert_eq!(target.reference(), reference);
    assert_eq!(target.slot("legs"), Some(&Value::Integer(4)));

    let mut legs: u8 = 0;
    assert_eq!(
        env.extract(&Value::Integer(400), &mut legs),
        Err(Error::Conversion(ConversionError::Overflow {
            value: 400,
            to: "u8".into()
        }))
    );
}

#[test]
fn test_extract_scoped_to_default_module() {
    let options = BridgeOptions {
        default_module: Some("ZOO".into()),
        ..BridgeOptions::default()
    };
    let env = Environment::with_options(options).unwrap();
    let plain = env.engine().make_instance("rex", "DOG", [("legs", Value::Integer(4))]);
    let scoped = env.engine().make_instance("ZOO::rex", "DOG", [("legs", Value::Integer(3))]);

    let mut target = InstanceRef::default();
    env.extract(&Value::instance_name("rex"), &mut target)
        .unwrap();
    assert_eq!(target, scoped);
    assert_ne!(target, plain);
}

#[test]
fn test_extract_without_reference_resolution() {
    let options = BridgeOptions {
        extract_references: false,
        ..BridgeOptions::default()
    };
    let env = Environment::with_options(options).unwrap();

    let mut target = String::new();
    env.extract(&Value::instance_name("rex"), &mut target)
        .unwrap();
    assert_eq!(target, "rex");
}

#[test]
fn test_slot_allocates_from_engine() {
    let env = Environment::new().unwrap();
    let mut slot = env.slot();
    slot.set("interned");
    assert_eq!(slot.value(), Value::string("interned"));
    assert_eq!(env.engine().lexeme_count(), 1);
}

// ============================================================================
// Engines that refuse
// ============================================================================

/// An engine whose loader rejects everything and, optionally, refuses to
/// register external functions.
#[derive(Default)]
struct Stubborn {
    inner: MemoryEngine,
    refuse_functions: bool,
}

impl InstanceResolver for Stubborn {
    fn find_instance(&self, name: &str, module: Option<&str>) -> Option<InstanceRef> {
        self.inner.find_instance(name, module)
    }

    fn resolve_instance(&self, reference: InstanceRef) -> Option<Instance> {
        self.inner.resolve_instance(reference)
    }
}

impl NativeEngine for Stubborn {
    fn add_symbol(&self, text: &str) -> Atom {
        self.inner.add_symbol(text)
    }

    fn add_integer(&self, value: i64) -> Atom {
        self.inner.add_integer(value)
    }

    fn add_float(&self, value: f64) -> Atom {
        self.inner.add_float(value)
    }

    fn add_external_address(&self, address: ExternalAddress) -> Atom {
        self.inner.add_external_address(address)
    }

    fn create_multifield(&self, len: usize) -> Multifield {
        self.inner.create_multifield(len)
    }

    fn define_function(&self, name: &str) -> bool {
        !self.refuse_functions && self.inner.define_function(name)
    }

    fn build(&self, _construct: &str) -> bool {
        false
    }
}

#[test]
fn test_rejected_construct() {
    crate::test_utils::init_test_logging();
    let env = Environment::with_engine(Stubborn::default(), BridgeOptions::default()).unwrap();
    let err = env.define_function("sum", sum).unwrap_err();
    assert_eq!(
        err,
        Error::Build {
            construct: "(deffunction sum ($?args) (host-function sum (expand$ ?args)))".into()
        }
    );
    assert!(!env.registry().contains("sum"));
}

#[test]
fn test_rejected_trampoline() {
    let engine = Stubborn {
        refuse_functions: true,
        ..Stubborn::default()
    };
    let err = Environment::with_engine(engine, BridgeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Api(_)));
}
