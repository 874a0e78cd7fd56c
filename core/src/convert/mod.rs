//! Type-directed coercion of decoded values into host types.
//!
//! Each host type that can receive a [`Value`] implements [`Extract`]. The
//! [`Converter`] drives the shared part of the algorithm: resolving instance
//! references, routing nil, and recursing into sequence elements. The
//! per-type rules (direct assignment, checked narrowing, explicit text
//! conversions) live in the impls.
//!
//! Conversion mutates the target in place. Every (target, source) pair ends
//! in either a correctly typed target or a [`ConversionError`]; narrowing
//! never truncates silently.

pub mod error;
mod impls;

pub use error::ConversionError;

use tracing::trace;

use crate::engine::{Instance, InstanceResolver, NoInstances};
use crate::values::tag::NIL_SYMBOL;
use crate::values::{InstanceRef, Value};

static NO_INSTANCES: NoInstances = NoInstances;

/// A host type that a decoded [`Value`] can be coerced into.
pub trait Extract: Sized {
    /// Name of the target type in error messages.
    fn describe() -> String {
        core::any::type_name::<Self>().into()
    }

    /// Accept an absent value. Only optional-like targets can.
    fn extract_nil(&mut self) -> Result<(), ConversionError> {
        Err(ConversionError::NilToNonNullable {
            to: Self::describe(),
        })
    }

    /// Accept a non-nil value.
    fn extract_value(
        &mut self,
        source: &Value,
        converter: &Converter<'_>,
    ) -> Result<(), ConversionError>;

    /// Accept a resolved instance. Targets that model engine objects
    /// override this to pull their fields out of the instance slots.
    fn extract_instance(
        &mut self,
        _instance: &Instance,
        _converter: &Converter<'_>,
    ) -> Result<(), ConversionError> {
        Err(ConversionError::TypeMismatch {
            from: "Instance",
            to: Self::describe(),
        })
    }
}

pub(crate) fn mismatch<T: Extract>(source: &Value) -> ConversionError {
    ConversionError::TypeMismatch {
        from: source.type_name(),
        to: T::describe(),
    }
}

/// Drives conversions, carrying the instance collaborator and flags.
#[derive(Clone, Copy)]
pub struct Converter<'r> {
    resolver: &'r dyn InstanceResolver,
    extract_references: bool,
    module: Option<&'r str>,
}

impl<'r> Converter<'r> {
    /// A converter resolving instances through `resolver`. Reference
    /// extraction starts disabled.
    pub fn new(resolver: &'r dyn InstanceResolver) -> Self {
        Self {
            resolver,
            extract_references: false,
            module: None,
        }
    }

    /// A converter with no instance collaborator.
    pub fn detached() -> Converter<'static> {
        Converter::new(&NO_INSTANCES)
    }

    /// When set, instance names and instance references are resolved and
    /// handed to [`Extract::extract_instance`] instead of being coerced.
    pub fn extract_references(mut self, enabled: bool) -> Self {
        self.extract_references = enabled;
        self
    }

    /// Module scope for instance name lookups.
    pub fn module(mut self, module: Option<&'r str>) -> Self {
        self.module = module;
        self
    }

    pub fn extracts_references(&self) -> bool {
        self.extract_references
    }

    /// Coerce `source` into `target`.
    pub fn convert<T: Extract>(
        &self,
        target: &mut T,
        source: &Value,
    ) -> Result<(), ConversionError> {
        if self.extract_references {
            match source {
                Value::InstanceName(name) if name == NIL_SYMBOL => return target.extract_nil(),
                Value::InstanceName(name) => {
                    let reference = self
                        .resolver
                        .find_instance(name, self.module)
                        .ok_or_else(|| ConversionError::InstanceNotFound {
                            name: name.to_string(),
                        })?;
                    return self.convert_instance(target, reference);
                }
                Value::InstanceReference(reference) => {
                    return self.convert_instance(target, *reference);
                }
                _ => {}
            }
        }

        match source {
            Value::Nil => target.extract_nil(),
            _ => target.extract_value(source, self),
        }
    }

    fn convert_instance<T: Extract>(
        &self,
        target: &mut T,
        reference: InstanceRef,
    ) -> Result<(), ConversionError> {
        let instance = self
            .resolver
            .resolve_instance(reference)
            .ok_or(ConversionError::UnresolvedInstance { reference })?;
        trace!(instance = instance.name(), target = %T::describe(), "extracting instance");
        target.extract_instance(&instance, self)
    }

    /// Coerce the value of one instance slot into `target`.
    pub fn extract_slot<T: Extract>(
        &self,
        instance: &Instance,
        slot: &str,
        target: &mut T,
    ) -> Result<(), ConversionError> {
        let value = instance
            .slot(slot)
            .ok_or_else(|| ConversionError::MissingSlot {
                instance: instance.name().into(),
                slot: slot.into(),
            })?;
        self.convert(target, value)
    }
}

impl core::fmt::Debug for Converter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Converter")
            .field("extract_references", &self.extract_references)
            .field("module", &self.module)
            .finish_non_exhaustive()
    }
}

/// Coerce `source` into `target` without instance resolution.
pub fn convert<T: Extract>(target: &mut T, source: &Value) -> Result<(), ConversionError> {
    Converter::detached().convert(target, source)
}
