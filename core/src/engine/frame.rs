//! The call context the engine hands to the trampoline.

use smallvec::SmallVec;

use super::{DataObject, NativeEngine};
use crate::slot::codec;
use crate::values::{Tag, Value};

/// Positional access to the arguments of an engine function call.
///
/// Indices are 1-based, matching the engine's argument numbering.
pub trait CallFrame {
    fn arg_count(&self) -> usize;

    /// Copy argument `index` into `out`. Returns `false` if it does not exist.
    fn arg(&self, index: usize, out: &mut DataObject) -> bool;

    /// Copy argument `index` into `out` if it exists and carries `expected`.
    fn arg_type_check(&self, index: usize, expected: Tag, out: &mut DataObject) -> bool {
        self.arg(index, out) && out.tag() == expected.raw()
    }
}

/// A call frame holding already-evaluated arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgumentFrame {
    args: SmallVec<[DataObject; 4]>,
}

impl ArgumentFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode host values into engine storage, in order.
    pub fn from_values<'a>(
        engine: &dyn NativeEngine,
        values: impl IntoIterator<Item = &'a Value>,
    ) -> Self {
        let mut frame = Self::new();
        for value in values {
            frame.push_value(engine, value);
        }
        frame
    }

    pub fn push(&mut self, data: DataObject) {
        self.args.push(data);
    }

    pub fn push_value(&mut self, engine: &dyn NativeEngine, value: &Value) {
        let mut data = DataObject::default();
        codec::encode_into(engine, value, None, &mut data);
        self.args.push(data);
    }
}

impl CallFrame for ArgumentFrame {
    fn arg_count(&self) -> usize {
        self.args.len()
    }

    fn arg(&self, index: usize, out: &mut DataObject) -> bool {
        match index.checked_sub(1).and_then(|i| self.args.get(i)) {
            Some(data) => {
                out.clone_from(data);
                true
            }
            None => false,
        }
    }
}
