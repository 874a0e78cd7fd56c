//! Owned handles to engine data objects.
//!
//! A [`DataSlot`] either allocates its own [`DataObject`] or wraps one the
//! engine lent it, such as the trampoline's output cell. Owned storage is
//! freed when the slot is released or dropped, on every exit path of the
//! scope holding it. Borrowed storage is never freed by the slot.

pub mod codec;

use tracing::warn;

use crate::convert::{ConversionError, Converter, Extract};
use crate::engine::{DataObject, NativeEngine};
use crate::values::{IntoValue, Tag, Value};

enum Storage<'a> {
    Owned(Box<DataObject>),
    Borrowed(&'a mut DataObject),
    Released,
}

pub struct DataSlot<'a> {
    engine: &'a dyn NativeEngine,
    storage: Storage<'a>,
    tag: Option<Tag>,
}

impl<'a> DataSlot<'a> {
    /// Allocate a fresh, empty data object owned by this slot.
    pub fn new(engine: &'a dyn NativeEngine) -> Self {
        Self {
            engine,
            storage: Storage::Owned(Box::default()),
            tag: None,
        }
    }

    /// Wrap a data object owned by the engine.
    pub fn wrap(engine: &'a dyn NativeEngine, data: &'a mut DataObject) -> Self {
        Self {
            engine,
            storage: Storage::Borrowed(data),
            tag: None,
        }
    }

    /// Pin the tag used by [`DataSlot::set`] instead of resolving one per value.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn is_owned(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    pub fn is_released(&self) -> bool {
        matches!(self.storage, Storage::Released)
    }

    pub fn data(&self) -> Option<&DataObject> {
        match &self.storage {
            Storage::Owned(data) => Some(&**data),
            Storage::Borrowed(data) => Some(&**data),
            Storage::Released => None,
        }
    }

    /// The underlying data object, for engine calls that fill it by reference.
    pub fn data_mut(&mut self) -> Option<&mut DataObject> {
        match &mut self.storage {
            Storage::Owned(data) => Some(&mut **data),
            Storage::Borrowed(data) => Some(&mut **data),
            Storage::Released => None,
        }
    }

    /// Let an engine call fill the data object by reference.
    ///
    /// Returns what `fill` returns, or `false` without calling it when the
    /// slot has been released.
    pub fn load(&mut self, fill: impl FnOnce(&mut DataObject) -> bool) -> bool {
        self.data_mut().is_some_and(fill)
    }

    /// Decode the currently stored value. A released slot reads as `Nil`.
    pub fn value(&self) -> Value {
        self.data().map(codec::decode).unwrap_or_default()
    }

    /// Encode `value` and store it.
    pub fn set(&mut self, value: impl IntoValue) {
        let value = value.into_value();
        let engine = self.engine;
        let tag = self.tag;
        match self.data_mut() {
            Some(data) => codec::encode_into(engine, &value, tag, data),
            None => warn!("value written to a released data slot was dropped"),
        }
    }

    /// The referenced multifield range, in ascending index order.
    ///
    /// Returns `None` unless the slot currently holds a multifield.
    pub fn multifield_values(&self) -> Option<Vec<Value>> {
        let data = self.data()?;
        if data.tag() != Tag::Multifield.raw() {
            return None;
        }
        match codec::decode_range(data.value()?, data.begin(), data.end()) {
            Value::Multifield(values) => Some(values),
            _ => None,
        }
    }

    /// Release storage allocated by this slot. Idempotent; a slot wrapping
    /// engine-owned storage is left untouched.
    pub fn release(&mut self) {
        if let Storage::Owned(_) = self.storage {
            self.storage = Storage::Released;
        }
    }

    /// Decode the stored value and coerce it into `target`.
    pub fn extract_value<T: Extract>(
        &self,
        target: &mut T,
        extract_references: bool,
    ) -> Result<(), ConversionError> {
        let converter = Converter::new(self.engine).extract_references(extract_references);
        self.extract_with(&converter, target)
    }

    pub fn extract_with<T: Extract>(
        &self,
        converter: &Converter<'_>,
        target: &mut T,
    ) -> Result<(), ConversionError> {
        converter.convert(target, &self.value())
    }
}

impl core::fmt::Debug for DataSlot<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let storage = match self.storage {
            Storage::Owned(_) => "owned",
            Storage::Borrowed(_) => "borrowed",
            Storage::Released => "released",
        };
        f.debug_struct("DataSlot")
            .field("storage", &storage)
            .field("tag", &self.tag)
            .field("data", &self.data())
            .finish()
    }
}
