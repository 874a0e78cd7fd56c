//! Tag-directed encoding and decoding between [`Value`] and engine storage.
//!
//! This is the storage half of the type tag resolver: [`Tag::of`] picks the
//! outbound tag, this module writes the matching payload and reads payloads
//! back according to their stored tag.

use alloc::rc::Rc;

use tracing::trace;

use crate::engine::{Atom, DataObject, Field, Multifield, NativeEngine};
use crate::values::tag::{FALSE_SYMBOL, NIL_SYMBOL, TRUE_SYMBOL};
use crate::values::{InstanceName, Symbol, Tag, Value};

/// Encode `value` into `out`.
///
/// `tag` overrides the resolved tag when the destination is pinned to a
/// fixed engine type. Multifields are always freshly allocated, sized to the
/// sequence, and `out` is set to refer to the whole of it.
pub fn encode_into(
    engine: &dyn NativeEngine,
    value: &Value,
    tag: Option<Tag>,
    out: &mut DataObject,
) {
    let tag = tag.unwrap_or_else(|| Tag::of(value));
    let atom = encode_atom(engine, value);
    if let Value::Multifield(values) = value {
        out.set_range(1, values.len());
    }
    out.set_tag(tag.raw());
    out.set_value(Some(atom));
}

fn encode_atom(engine: &dyn NativeEngine, value: &Value) -> Atom {
    match value {
        Value::Nil => engine.add_symbol(NIL_SYMBOL),
        Value::Boolean(true) => engine.add_symbol(TRUE_SYMBOL),
        Value::Boolean(false) => engine.add_symbol(FALSE_SYMBOL),
        Value::Integer(i) => engine.add_integer(*i),
        Value::Float(f) => engine.add_float(*f),
        Value::String(s) => engine.add_symbol(s),
        Value::Symbol(s) => engine.add_symbol(s),
        Value::InstanceName(s) => engine.add_symbol(s),
        Value::ExternalAddress(address) => engine.add_external_address(*address),
        Value::FactReference(fact) => Atom::Fact(*fact),
        Value::InstanceReference(instance) => Atom::Instance(*instance),
        Value::Multifield(values) => Atom::Multifield(Rc::new(encode_multifield(engine, values))),
    }
}

fn encode_multifield(engine: &dyn NativeEngine, values: &[Value]) -> Multifield {
    let mut multifield = engine.create_multifield(values.len());
    for (i, value) in values.iter().enumerate() {
        multifield.set(i + 1, Tag::of(value), encode_atom(engine, value));
    }
    multifield
}

/// Decode the value stored in `data`.
///
/// A missing payload or an unknown type code decodes as `Nil`. For
/// multifields only the `[begin, end]` range of `data` is materialized.
pub fn decode(data: &DataObject) -> Value {
    let Some(atom) = data.value() else {
        return Value::Nil;
    };
    match Tag::from_raw(data.tag()) {
        Some(Tag::Multifield) => decode_range(atom, data.begin(), data.end()),
        Some(tag) => decode_atom(tag, atom),
        None => {
            trace!(tag = data.tag(), "unknown type code decodes as nil");
            Value::Nil
        }
    }
}

/// Materialize fields `begin..=end` of a multifield payload, in order.
pub fn decode_range(atom: &Atom, begin: usize, end: usize) -> Value {
    let Atom::Multifield(multifield) = atom else {
        return Value::Nil;
    };
    let values = (begin..=end)
        .filter_map(|index| multifield.get(index))
        .map(decode_field)
        .collect();
    Value::Multifield(values)
}

pub fn decode_field(field: &Field) -> Value {
    match (Tag::from_raw(field.tag()), field.value()) {
        (Some(tag), Some(atom)) => decode_atom(tag, atom),
        _ => Value::Nil,
    }
}

fn decode_atom(tag: Tag, atom: &Atom) -> Value {
    match (tag, atom) {
        (Tag::Float, Atom::Float(f)) => Value::Float(*f),
        (Tag::Integer, Atom::Integer(i)) => Value::Integer(*i),
        (Tag::String, Atom::Lexeme(s)) => Value::String(s.to_string()),
        (Tag::Symbol, Atom::Lexeme(s)) => decode_symbol(s),
        (Tag::InstanceName, Atom::Lexeme(s)) => Value::InstanceName(InstanceName::new(&**s)),
        (Tag::ExternalAddress, Atom::External(address)) => Value::ExternalAddress(*address),
        (Tag::FactAddress, Atom::Fact(fact)) => Value::FactReference(*fact),
        (Tag::InstanceAddress, Atom::Instance(instance)) => Value::InstanceReference(*instance),
        (Tag::Multifield, Atom::Multifield(multifield)) => {
            decode_range(atom, 1, multifield.len())
        }
        (tag, atom) => {
            trace!(%tag, ?atom, "payload does not match its tag");
            Value::Nil
        }
    }
}

/// The engine has no boolean or nil type, so these three symbols decode
/// specially. Any other symbol stays a [`Symbol`].
pub fn decode_symbol(text: &str) -> Value {
    match text {
        NIL_SYMBOL => Value::Nil,
        TRUE_SYMBOL => Value::Boolean(true),
        FALSE_SYMBOL => Value::Boolean(false),
        _ => Value::Symbol(Symbol::new(text)),
    }
}
