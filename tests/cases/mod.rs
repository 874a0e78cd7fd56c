//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rulebridge::{CallbackError, Environment, Value};

/// Extract `input` into a default-initialized `target` through a fresh
/// environment and match the result (the filled target or the error)
/// against `expected`.
#[macro_export]
macro_rules! extract_case {
    (
        $name:ident,
        input: $input:expr,
        target: $ty:ty,
        expected: $expected:pat $(if $guard:expr)? $(,)?
    ) => {
        #[test]
        fn $name() {
            let env = rulebridge::Environment::new().unwrap();
            let mut target = <$ty>::default();
            let result = env.extract(&$input, &mut target).map(|()| target);
            assert!(matches!(result, $expected $(if $guard)?), "got {:?}", result);
        }
    };
}

/// Returns its arguments unchanged, as a multifield.
pub fn echo(args: &[Value]) -> Result<Value, CallbackError> {
    Ok(Value::Multifield(args.to_vec()))
}

/// An environment with [`echo`] defined.
pub fn echo_env() -> Environment {
    let env = Environment::new().unwrap();
    env.define_function("echo", echo).unwrap();
    env
}
