//! The native side of the boundary.
//!
//! The bridge never owns engine memory. It talks to the engine through
//! [`NativeEngine`], which allocates atoms and multifields and exposes the
//! instance lookups the coercion engine needs. [`MemoryEngine`] is an
//! in-process implementation used by tests and by hosts that do not link a
//! native engine.

pub mod data_object;
pub mod frame;
pub mod memory;

pub use data_object::{Atom, DataObject, Field, Multifield};
pub use frame::{ArgumentFrame, CallFrame};
pub use memory::MemoryEngine;

use crate::values::{ExternalAddress, InstanceRef, Value};

/// A concrete object instance, as returned by the instance collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Instance {
    reference: InstanceRef,
    name: String,
    class: String,
    slots: Vec<(String, Value)>,
}

impl Instance {
    pub fn new(
        reference: InstanceRef,
        name: impl Into<String>,
        class: impl Into<String>,
        slots: Vec<(String, Value)>,
    ) -> Self {
        Self {
            reference,
            name: name.into(),
            class: class.into(),
            slots,
        }
    }

    pub fn reference(&self) -> InstanceRef {
        self.reference
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.slots
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, value)| value)
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slots.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Instance lookups delegated to the engine.
pub trait InstanceResolver {
    /// Find an instance by name, optionally scoped to a module.
    fn find_instance(&self, name: &str, module: Option<&str>) -> Option<InstanceRef>;

    /// Materialize the instance behind a reference.
    fn resolve_instance(&self, reference: InstanceRef) -> Option<Instance>;
}

/// Resolver for conversions that never touch instances.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstances;

impl InstanceResolver for NoInstances {
    fn find_instance(&self, _name: &str, _module: Option<&str>) -> Option<InstanceRef> {
        None
    }

    fn resolve_instance(&self, _reference: InstanceRef) -> Option<Instance> {
        None
    }
}

/// Entry points of the native engine used by the bridge.
///
/// Methods take `&self`: the engine is a single-threaded native handle and
/// callbacks may re-enter it while a dispatch is in progress.
pub trait NativeEngine: InstanceResolver {
    /// Intern a lexeme. Symbols, strings and instance names share one table.
    fn add_symbol(&self, text: &str) -> Atom;

    fn add_integer(&self, value: i64) -> Atom;

    fn add_float(&self, value: f64) -> Atom;

    fn add_external_address(&self, address: ExternalAddress) -> Atom;

    /// Allocate a multifield with exactly `len` fields.
    fn create_multifield(&self, len: usize) -> Multifield;

    /// Register an engine function that calls back into the host under `name`.
    fn define_function(&self, name: &str) -> bool;

    /// Build a single construct from its textual form.
    fn build(&self, construct: &str) -> bool;
}
