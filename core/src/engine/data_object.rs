//! Engine-side storage: atoms, multifields and the pass-by-reference cell.
//!
//! These mirror the engine's native layout. A [`DataObject`] stores a raw
//! type code next to its payload; nothing here checks that the two agree.
//! Interpreting the pair is the job of the slot codec.

use alloc::rc::Rc;
use core::fmt;

use crate::values::{ExternalAddress, FactRef, InstanceRef, Tag};

/// A payload owned by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// Interned text shared by symbols, strings and instance names.
    Lexeme(Rc<str>),
    Integer(i64),
    Float(f64),
    External(ExternalAddress),
    Multifield(Rc<Multifield>),
    Fact(FactRef),
    Instance(InstanceRef),
}

/// One cell of a multifield.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Field {
    tag: i16,
    value: Option<Atom>,
}

impl Field {
    pub fn new(tag: Tag, value: Atom) -> Self {
        Self {
            tag: tag.raw(),
            value: Some(value),
        }
    }

    pub fn tag(&self) -> i16 {
        self.tag
    }

    pub fn value(&self) -> Option<&Atom> {
        self.value.as_ref()
    }
}

/// A contiguous run of fields. Indices are 1-based, as on the engine side.
#[derive(Clone, PartialEq, Default)]
pub struct Multifield {
    fields: Vec<Field>,
}

impl Multifield {
    /// Allocate a multifield holding `len` empty fields.
    pub fn new(len: usize) -> Self {
        Self {
            fields: vec![Field::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Field> {
        index.checked_sub(1).and_then(|i| self.fields.get(i))
    }

    /// Store a field at a 1-based index. Returns `false` when out of range.
    pub fn set(&mut self, index: usize, tag: Tag, value: Atom) -> bool {
        match index.checked_sub(1).and_then(|i| self.fields.get_mut(i)) {
            Some(field) => {
                *field = Field::new(tag, value);
                true
            }
            None => false,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

impl fmt::Debug for Multifield {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields.iter()).finish()
    }
}

/// The engine's data object: a type code, a payload and, for multifields,
/// the inclusive 1-based `[begin, end]` range the object refers to.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataObject {
    tag: i16,
    value: Option<Atom>,
    begin: usize,
    end: usize,
}

impl DataObject {
    pub fn new(tag: Tag, value: Atom) -> Self {
        Self {
            tag: tag.raw(),
            value: Some(value),
            begin: 0,
            end: 0,
        }
    }

    pub fn tag(&self) -> i16 {
        self.tag
    }

    pub fn set_tag(&mut self, tag: i16) {
        self.tag = tag;
    }

    pub fn value(&self) -> Option<&Atom> {
        self.value.as_ref()
    }

    pub fn set_value(&mut self, value: Option<Atom>) {
        self.value = value;
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn set_begin(&mut self, begin: usize) {
        self.begin = begin;
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn set_end(&mut self, end: usize) {
        self.end = end;
    }

    /// Number of fields in the referenced range.
    pub fn length(&self) -> usize {
        (self.end + 1).saturating_sub(self.begin)
    }

    /// Refer to a sub-range of a multifield payload.
    pub fn set_range(&mut self, begin: usize, end: usize) {
        self.begin = begin;
        self.end = end;
    }
}
