//! Tests for callback dispatch through the trampoline.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use pretty_assertions::assert_eq;

use crate::callback::{
    CallbackError, DispatchError, EnvHandle, EnvironmentTable, Registry, dispatch, host_function,
    trampoline,
};
use crate::engine::{ArgumentFrame, DataObject, MemoryEngine};
use crate::slot::codec;
use crate::values::{Tag, Value};

struct Fixture {
    engine: MemoryEngine,
    table: EnvironmentTable,
    handle: EnvHandle,
    registry: Rc<Registry>,
}

impl Fixture {
    fn new() -> Self {
        let table = EnvironmentTable::new();
        let handle = EnvHandle::fresh();
        let registry = Rc::new(Registry::new());
        table.insert(handle, registry.clone());
        Self {
            engine: MemoryEngine::new(),
            table,
            handle,
            registry,
        }
    }

    /// Call the trampoline with `args` and decode what it wrote.
    fn call(&self, args: &[Value]) -> Value {
        let frame = ArgumentFrame::from_values(&self.engine, args);
        let mut out = DataObject::default();
        trampoline(&self.engine, &self.table, self.handle, &frame, &mut out).unwrap();
        codec::decode(&out)
    }
}

fn double(args: &[Value]) -> Result<Value, CallbackError> {
    let n = args
        .first()
        .and_then(Value::as_int)
        .ok_or_else(|| CallbackError::msg("expected an integer"))?;
    Ok(Value::Integer(2 * n))
}

#[test]
fn test_dispatch_happy_path() {
    crate::test_utils::init_test_logging();
    let fixture = Fixture::new();
    fixture.registry.register("double", double);

    let result = fixture.call(&[Value::symbol("double"), Value::Integer(21)]);
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn test_dispatch_unknown_callback() {
    let fixture = Fixture::new();
    let result = fixture.call(&[Value::symbol("missing"), Value::Integer(1)]);
    assert_eq!(
        result,
        Value::string("Error: Unknown callback name missing")
    );
    assert!(result.as_text().unwrap().contains("Unknown"));
}

#[test]
fn test_dispatch_malformed_first_argument() {
    let fixture = Fixture::new();
    fixture.registry.register("double", double);

    let result = fixture.call(&[Value::Integer(5), Value::Integer(21)]);
    let Value::String(message) = result else {
        panic!("expected a string result, got {:?}", result);
    };
    assert!(message.contains("Invalid argument"), "{}", message);
    assert!(message.contains("Integer"), "{}", message);

    let result = fixture.call(&[Value::string("double"), Value::Integer(21)]);
    assert!(result.as_text().unwrap().contains("Invalid argument"));
}

#[test]
fn test_dispatch_reserved_symbols_are_not_callback_names() {
    let fixture = Fixture::new();
    fixture.registry.register("TRUE", |_: &[Value]| Ok(Value::Integer(1)));

    let result = fixture.call(&[Value::symbol("TRUE")]);
    assert_eq!(
        result,
        Value::string("Error: Invalid argument type in callback, expected symbol but found Boolean")
    );
}

#[test]
fn test_dispatch_without_arguments() {
    let fixture = Fixture::new();
    let result = fixture.call(&[]);
    assert_eq!(result, Value::string("Error: Invalid argument count"));
}

#[test]
fn test_dispatch_unknown_environment_leaves_output_unset() {
    let fixture = Fixture::new();
    fixture.registry.register("double", double);
    let frame = ArgumentFrame::from_values(
        &fixture.engine,
        &[Value::symbol("double"), Value::Integer(21)],
    );
    let stranger = EnvHandle::fresh();

    let mut out = DataObject::default();
    let result = trampoline(&fixture.engine, &fixture.table, stranger, &frame, &mut out);
    assert_eq!(result, Err(DispatchError::UnknownEnvironment(stranger)));
    assert_eq!(out, DataObject::default());
}

#[test]
fn test_callback_error_becomes_string_result() {
    let fixture = Fixture::new();
    fixture.registry.register("parse", |args: &[Value]| {
        let text = args.first().and_then(Value::as_text).unwrap_or_default();
        Ok(Value::Integer(text.parse::<i64>()?))
    });

    let ok = fixture.call(&[Value::symbol("parse"), Value::string("17")]);
    assert_eq!(ok, Value::Integer(17));

    let failed = fixture.call(&[Value::symbol("parse"), Value::string("x")]);
    let message = failed.as_text().unwrap();
    assert!(
        message.ends_with("ParseIntError: invalid digit found in string"),
        "{}",
        message
    );
}

#[test]
fn test_callback_error_kind_and_message() {
    let fixture = Fixture::new();
    fixture
        .registry
        .register("fail", |_: &[Value]| Err(CallbackError::new("Refused", "not today")));

    let result = fixture.call(&[Value::symbol("fail")]);
    assert_eq!(result, Value::string("Refused: not today"));
}

#[test]
fn test_arguments_arrive_decoded_in_order() {
    let fixture = Fixture::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    fixture.registry.register("record", move |args: &[Value]| {
        sink.borrow_mut().extend(args.iter().cloned());
        Ok(Value::Nil)
    });

    let args = [
        Value::symbol("record"),
        Value::Integer(1),
        Value::Float(2.5),
        Value::string("three"),
        Value::symbol("four"),
        Value::Boolean(false),
        Value::Nil,
        Value::multifield([Value::Integer(5), Value::symbol("six")]),
        Value::instance_name("seven"),
    ];
    let result = fixture.call(&args);

    assert_eq!(result, Value::Nil);
    assert_eq!(*seen.borrow(), args[1..].to_vec());
}

#[test]
fn test_each_call_invokes_exactly_once() {
    let fixture = Fixture::new();
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    fixture.registry.register("tick", move |_: &[Value]| {
        counter.set(counter.get() + 1);
        Ok(Value::Integer(counter.get()))
    });

    assert_eq!(fixture.call(&[Value::symbol("tick")]), Value::Integer(1));
    assert_eq!(fixture.call(&[Value::symbol("tick")]), Value::Integer(2));
    fixture.call(&[Value::symbol("untick")]);
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_multifield_result() {
    let fixture = Fixture::new();
    fixture.registry.register("pair", |args: &[Value]| {
        Ok(Value::multifield(args.iter().rev().cloned()))
    });

    let frame = ArgumentFrame::from_values(
        &fixture.engine,
        &[Value::symbol("pair"), Value::Integer(1), Value::Integer(2)],
    );
    let mut out = DataObject::default();
    trampoline(&fixture.engine, &fixture.table, fixture.handle, &frame, &mut out).unwrap();

    assert_eq!(out.tag(), Tag::Multifield.raw());
    assert_eq!((out.begin(), out.end()), (1, 2));
    assert_eq!(
        codec::decode(&out),
        Value::multifield([Value::Integer(2), Value::Integer(1)])
    );
}

#[test]
fn test_callback_may_register_callbacks() {
    let fixture = Fixture::new();
    let registry = Rc::downgrade(&fixture.registry);
    fixture.registry.register("install", move |_: &[Value]| {
        if let Some(registry) = registry.upgrade() {
            registry.register("double", double);
        }
        Ok(Value::Boolean(true))
    });

    assert_eq!(fixture.call(&[Value::symbol("install")]), Value::Boolean(true));
    assert_eq!(
        fixture.call(&[Value::symbol("double"), Value::Integer(4)]),
        Value::Integer(8)
    );
}

#[test]
fn test_dispatch_directly_reports_errors() {
    let engine = MemoryEngine::new();
    let registry = Registry::new();
    let frame = ArgumentFrame::from_values(&engine, &[Value::symbol("nope")]);
    assert_eq!(
        dispatch(&engine, &registry, &frame),
        Err(DispatchError::UnknownCallback("nope".into()))
    );
}

#[test]
fn test_host_function_uses_shared_table() {
    let engine = MemoryEngine::new();
    let handle = EnvHandle::fresh();
    let registry = Rc::new(Registry::new());
    registry.register("double", double);
    EnvironmentTable::with_global(|table| table.insert(handle, registry.clone()));

    let frame = ArgumentFrame::from_values(&engine, &[Value::symbol("double"), Value::Integer(5)]);
    let mut out = DataObject::default();
    host_function(&engine, handle, &frame, &mut out).unwrap();
    assert_eq!(codec::decode(&out), Value::Integer(10));

    EnvironmentTable::with_global(|table| table.remove(handle));
    assert!(host_function(&engine, handle, &frame, &mut out).is_err());
}
