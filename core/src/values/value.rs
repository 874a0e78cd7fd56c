//! The dynamic value model shared by the engine and the host.
//!
//! A [`Value`] is the decoded, host-side form of one engine cell. Values own
//! their payloads, so a callback that receives them can never reach back into
//! engine storage.

use core::fmt;
use core::ops::Deref;

/// Text the engine treats as a symbol rather than a string.
///
/// Symbols and strings share the same textual payload on the engine side but
/// stay distinct host types after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Symbol(pub String);

/// Text naming an object instance, e.g. `[my-instance]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct InstanceName(pub String);

macro_rules! impl_text_wrapper {
    ($name:ident) => {
        impl $name {
            pub fn new(text: impl Into<String>) -> Self {
                Self(text.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(text: &str) -> Self {
                Self(text.into())
            }
        }

        impl From<String> for $name {
            fn from(text: String) -> Self {
                Self(text)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_text_wrapper!(Symbol);
impl_text_wrapper!(InstanceName);

/// Opaque handle to a fact owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct FactRef(u64);

/// Opaque handle to an object instance owned by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct InstanceRef(u64);

/// Opaque, pointer-sized handle the engine stores without interpreting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ExternalAddress(usize);

impl FactRef {
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u64 {
        self.0
    }
}

impl InstanceRef {
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    pub const fn index(self) -> u64 {
        self.0
    }
}

impl ExternalAddress {
    pub const fn new(address: usize) -> Self {
        Self(address)
    }

    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    pub const fn address(self) -> usize {
        self.0
    }
}

/// A single dynamic value crossing the engine boundary.
///
/// `Boolean` and `Nil` have no engine-side type of their own: they travel as
/// the symbols `TRUE`, `FALSE` and `nil`. Decoding maps those three symbols
/// back to `Boolean`/`Nil`, so an explicit `Symbol("TRUE")` does not survive
/// a round trip through the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Symbol(Symbol),
    InstanceName(InstanceName),
    Multifield(Vec<Value>),
    FactReference(FactRef),
    InstanceReference(InstanceRef),
    ExternalAddress(ExternalAddress),
}

impl Value {
    pub fn symbol(text: impl Into<String>) -> Self {
        Value::Symbol(Symbol(text.into()))
    }

    pub fn string(text: impl Into<String>) -> Self {
        Value::String(text.into())
    }

    pub fn instance_name(text: impl Into<String>) -> Self {
        Value::InstanceName(InstanceName(text.into()))
    }

    pub fn multifield(values: impl IntoIterator<Item = Value>) -> Self {
        Value::Multifield(values.into_iter().collect())
    }

    /// Name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Symbol(_) => "Symbol",
            Value::InstanceName(_) => "InstanceName",
            Value::Multifield(_) => "Multifield",
            Value::FactReference(_) => "FactReference",
            Value::InstanceReference(_) => "InstanceReference",
            Value::ExternalAddress(_) => "ExternalAddress",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Textual payload of a string, symbol or instance name.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Symbol(s) => Some(s),
            Value::InstanceName(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_multifield(&self) -> Option<&[Value]> {
        match self {
            Value::Multifield(values) => Some(values),
            _ => None,
        }
    }
}
