//! Engine-style printed form of values, used in diagnostics.

use core::fmt;

use super::tag::{FALSE_SYMBOL, NIL_SYMBOL, TRUE_SYMBOL};
use super::value::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str(NIL_SYMBOL),
            Value::Boolean(true) => f.write_str(TRUE_SYMBOL),
            Value::Boolean(false) => f.write_str(FALSE_SYMBOL),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => format_float(f, *x),
            Value::String(s) => escape_string(f, s),
            Value::Symbol(s) => f.write_str(s),
            Value::InstanceName(name) => write!(f, "[{}]", name),
            Value::Multifield(values) => {
                write!(f, "(")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, ")")
            }
            Value::FactReference(fact) => write!(f, "<Fact-{}>", fact.index()),
            Value::InstanceReference(instance) => write!(f, "<Instance-{}>", instance.index()),
            Value::ExternalAddress(address) => write!(f, "<Pointer-{:#x}>", address.address()),
        }
    }
}

/// Floats always print with a decimal point so they read back as floats.
fn format_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        write!(f, "nan")
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            write!(f, "inf")
        } else {
            write!(f, "-inf")
        }
    } else {
        let s = value.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            write!(f, "{}", s)
        } else {
            write!(f, "{}.0", s)
        }
    }
}

fn escape_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}
