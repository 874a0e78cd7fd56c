//! Engine type codes and the outbound half of the type tag resolver.

use core::fmt;

use super::value::Value;

pub const TRUE_SYMBOL: &str = "TRUE";
pub const FALSE_SYMBOL: &str = "FALSE";
pub const NIL_SYMBOL: &str = "nil";

/// The engine's wire type codes, as stored in a data object's type field.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Float = 0,
    Integer = 1,
    Symbol = 2,
    String = 3,
    Multifield = 4,
    ExternalAddress = 5,
    FactAddress = 6,
    InstanceAddress = 7,
    InstanceName = 8,
}

impl Tag {
    /// Decode a raw type code. Codes the bridge does not model yield `None`.
    pub const fn from_raw(raw: i16) -> Option<Tag> {
        Some(match raw {
            0 => Tag::Float,
            1 => Tag::Integer,
            2 => Tag::Symbol,
            3 => Tag::String,
            4 => Tag::Multifield,
            5 => Tag::ExternalAddress,
            6 => Tag::FactAddress,
            7 => Tag::InstanceAddress,
            8 => Tag::InstanceName,
            _ => return None,
        })
    }

    pub const fn raw(self) -> i16 {
        self as i16
    }

    /// Select the outbound tag for a host value.
    ///
    /// `Nil` and `Boolean` have no engine type and travel as symbols.
    pub fn of(value: &Value) -> Tag {
        match value {
            Value::Nil | Value::Boolean(_) | Value::Symbol(_) => Tag::Symbol,
            Value::String(_) => Tag::String,
            Value::Integer(_) => Tag::Integer,
            Value::Float(_) => Tag::Float,
            Value::ExternalAddress(_) => Tag::ExternalAddress,
            Value::InstanceName(_) => Tag::InstanceName,
            Value::FactReference(_) => Tag::FactAddress,
            Value::InstanceReference(_) => Tag::InstanceAddress,
            Value::Multifield(_) => Tag::Multifield,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Float => "FLOAT",
            Tag::Integer => "INTEGER",
            Tag::Symbol => "SYMBOL",
            Tag::String => "STRING",
            Tag::Multifield => "MULTIFIELD",
            Tag::ExternalAddress => "EXTERNAL_ADDRESS",
            Tag::FactAddress => "FACT_ADDRESS",
            Tag::InstanceAddress => "INSTANCE_ADDRESS",
            Tag::InstanceName => "INSTANCE_NAME",
        };
        f.write_str(name)
    }
}
