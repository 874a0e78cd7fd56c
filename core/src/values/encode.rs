//! Host value → [`Value`] conversion.
//!
//! Statically typed host values go through [`IntoValue`]. Type-erased values
//! go through [`Value::from_any`], which applies the same precedence at
//! runtime and falls back to the symbol `FALSE` for anything it cannot
//! represent, since the engine has no "unknown" type.

use core::any::Any;

use super::value::{ExternalAddress, FactRef, InstanceName, InstanceRef, Symbol, Value};

pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for &Value {
    fn into_value(self) -> Value {
        self.clone()
    }
}

impl IntoValue for () {
    fn into_value(self) -> Value {
        Value::Nil
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

macro_rules! impl_into_value_int {
    ($($ty:ty),*) => {
        $(
            impl IntoValue for $ty {
                fn into_value(self) -> Value {
                    Value::Integer(self as i64)
                }
            }
        )*
    };
}

impl_into_value_int!(i8, i16, i32, i64, isize);

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(self as f64)
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.into())
    }
}

impl IntoValue for Symbol {
    fn into_value(self) -> Value {
        Value::Symbol(self)
    }
}

impl IntoValue for InstanceName {
    fn into_value(self) -> Value {
        Value::InstanceName(self)
    }
}

impl IntoValue for FactRef {
    fn into_value(self) -> Value {
        Value::FactReference(self)
    }
}

impl IntoValue for InstanceRef {
    fn into_value(self) -> Value {
        Value::InstanceReference(self)
    }
}

impl IntoValue for ExternalAddress {
    fn into_value(self) -> Value {
        Value::ExternalAddress(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(value) => value.into_value(),
            None => Value::Nil,
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Multifield(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue + Clone> IntoValue for &[T] {
    fn into_value(self) -> Value {
        Value::Multifield(self.iter().cloned().map(IntoValue::into_value).collect())
    }
}

impl<T: IntoValue, const N: usize> IntoValue for [T; N] {
    fn into_value(self) -> Value {
        Value::Multifield(self.into_iter().map(IntoValue::into_value).collect())
    }
}

macro_rules! try_downcast {
    ($value:expr; $($ty:ty),*) => {
        $(
            if let Some(v) = $value.downcast_ref::<$ty>() {
                return v.clone().into_value();
            }
        )*
    };
}

macro_rules! try_downcast_sequence {
    ($value:expr; $($ty:ty),*) => {
        $(
            if let Some(v) = downcast_sequence::<$ty>($value) {
                return v;
            }
        )*
    };
}

macro_rules! downcast_array {
    ($value:expr, $ty:ty; $($n:literal),*) => {
        $(
            if let Some(items) = $value.downcast_ref::<[$ty; $n]>() {
                return Some(items.as_slice().into_value());
            }
        )*
    };
}

/// A `Vec`, boxed slice, static slice or array (up to 16 elements) of `T`.
fn downcast_sequence<T: IntoValue + Clone + 'static>(value: &dyn Any) -> Option<Value> {
    if let Some(items) = value.downcast_ref::<Vec<T>>() {
        return Some(items.as_slice().into_value());
    }
    if let Some(items) = value.downcast_ref::<Box<[T]>>() {
        return Some((&**items).into_value());
    }
    if let Some(items) = value.downcast_ref::<&'static [T]>() {
        return Some((*items).into_value());
    }
    downcast_array!(value, T; 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16);
    None
}

impl Value {
    /// Encode a type-erased host value.
    ///
    /// Known scalar, text and handle types are mapped like [`IntoValue`], and
    /// so are sequences of them (`Vec`, boxed and static slices, arrays of up
    /// to 16 elements). `Vec<Box<dyn Any>>` is encoded element by element.
    /// Anything else becomes the symbol `FALSE`.
    pub fn from_any(value: &dyn Any) -> Value {
        try_downcast!(value;
            Value, bool, Symbol, String, i8, i16, i32, i64, isize, f32, f64,
            ExternalAddress, InstanceName, FactRef, InstanceRef
        );
        if let Some(s) = value.downcast_ref::<&'static str>() {
            return Value::String((*s).into());
        }
        try_downcast_sequence!(value;
            Value, bool, Symbol, String, &'static str, i8, i16, i32, i64, isize, f32, f64,
            ExternalAddress, InstanceName, FactRef, InstanceRef
        );
        if let Some(items) = value.downcast_ref::<Vec<Box<dyn Any>>>() {
            return Value::multifield(items.iter().map(|item| Value::from_any(&**item)));
        }
        if let Some(item) = value.downcast_ref::<Option<Box<dyn Any>>>() {
            return match item {
                Some(inner) => Value::from_any(&**inner),
                None => Value::Nil,
            };
        }
        Value::Boolean(false)
    }
}
