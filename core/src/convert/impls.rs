//! Per-type coercion rules.

use super::{ConversionError, Converter, Extract, mismatch};
use crate::engine::Instance;
use crate::values::{ExternalAddress, FactRef, InstanceName, InstanceRef, Symbol, Value};

// Integers arrive as i64. Narrower targets truncate and compare: the value
// is cast down and back up, and must come back unchanged.
macro_rules! impl_extract_narrow_int {
    ($($ty:ty),*) => {
        $(
            impl Extract for $ty {
                fn describe() -> String {
                    stringify!($ty).into()
                }

                fn extract_value(
                    &mut self,
                    source: &Value,
                    _converter: &Converter<'_>,
                ) -> Result<(), ConversionError> {
                    let Value::Integer(value) = *source else {
                        return Err(mismatch::<Self>(source));
                    };
                    let narrowed = value as $ty;
                    if narrowed as i64 != value {
                        return Err(ConversionError::Overflow {
                            value,
                            to: Self::describe(),
                        });
                    }
                    *self = narrowed;
                    Ok(())
                }
            }
        )*
    };
}

impl_extract_narrow_int!(i8, i16, i32, isize, u8, u16, u32, u64, usize);

impl Extract for i64 {
    fn describe() -> String {
        "i64".into()
    }

    fn extract_value(&mut self, source: &Value, _: &Converter<'_>) -> Result<(), ConversionError> {
        match source {
            Value::Integer(value) => {
                *self = *value;
                Ok(())
            }
            _ => Err(mismatch::<Self>(source)),
        }
    }
}

impl Extract for f64 {
    fn describe() -> String {
        "f64".into()
    }

    fn extract_value(&mut self, source: &Value, _: &Converter<'_>) -> Result<(), ConversionError> {
        match source {
            Value::Float(value) => {
                *self = *value;
                Ok(())
            }
            _ => Err(mismatch::<Self>(source)),
        }
    }
}

impl Extract for f32 {
    fn describe() -> String {
        "f32".into()
    }

    fn extract_value(&mut self, source: &Value, _: &Converter<'_>) -> Result<(), ConversionError> {
        let Value::Float(value) = *source else {
            return Err(mismatch::<Self>(source));
        };
        let narrowed = value as f32;
        if (narrowed as f64).to_bits() != value.to_bits() {
            return Err(ConversionError::PrecisionLoss {
                value,
                to: Self::describe(),
            });
        }
        *self = narrowed;
        Ok(())
    }
}

impl Extract for bool {
    fn describe() -> String {
        "bool".into()
    }

    fn extract_value(&mut self, source: &Value, _: &Converter<'_>) -> Result<(), ConversionError> {
        match source {
            Value::Boolean(value) => {
                *self = *value;
                Ok(())
            }
            _ => Err(mismatch::<Self>(source)),
        }
    }
}

// Strings, symbols and instance names are interconvertible: each accepts its
// own variant directly and the other two by explicit conversion of the text.
macro_rules! impl_extract_text {
    ($ty:ty, $name:literal, $wrap:expr) => {
        impl Extract for $ty {
            fn describe() -> String {
                $name.into()
            }

            fn extract_value(
                &mut self,
                source: &Value,
                _converter: &Converter<'_>,
            ) -> Result<(), ConversionError> {
                match source {
                    Value::String(text) => *self = $wrap(text.as_str()),
                    Value::Symbol(text) => *self = $wrap(text.as_str()),
                    Value::InstanceName(text) => *self = $wrap(text.as_str()),
                    _ => return Err(mismatch::<Self>(source)),
                }
                Ok(())
            }
        }
    };
}

impl_extract_text!(String, "String", String::from);
impl_extract_text!(Symbol, "Symbol", Symbol::from);
impl_extract_text!(InstanceName, "InstanceName", InstanceName::from);

macro_rules! impl_extract_handle {
    ($ty:ty, $name:literal, $variant:ident) => {
        impl Extract for $ty {
            fn describe() -> String {
                $name.into()
            }

            fn extract_value(
                &mut self,
                source: &Value,
                _converter: &Converter<'_>,
            ) -> Result<(), ConversionError> {
                match source {
                    Value::$variant(handle) => {
                        *self = *handle;
                        Ok(())
                    }
                    _ => Err(mismatch::<Self>(source)),
                }
            }
        }
    };
}

impl_extract_handle!(FactRef, "FactRef", FactReference);
impl_extract_handle!(InstanceRef, "InstanceRef", InstanceReference);
impl_extract_handle!(ExternalAddress, "ExternalAddress", ExternalAddress);

/// The dynamic target: accepts anything as-is.
impl Extract for Value {
    fn describe() -> String {
        "Value".into()
    }

    fn extract_nil(&mut self) -> Result<(), ConversionError> {
        *self = Value::Nil;
        Ok(())
    }

    fn extract_value(&mut self, source: &Value, _: &Converter<'_>) -> Result<(), ConversionError> {
        self.clone_from(source);
        Ok(())
    }

    fn extract_instance(
        &mut self,
        instance: &Instance,
        _: &Converter<'_>,
    ) -> Result<(), ConversionError> {
        *self = Value::InstanceReference(instance.reference());
        Ok(())
    }
}

impl Extract for Instance {
    fn describe() -> String {
        "Instance".into()
    }

    fn extract_value(&mut self, source: &Value, _: &Converter<'_>) -> Result<(), ConversionError> {
        Err(mismatch::<Self>(source))
    }

    fn extract_instance(
        &mut self,
        instance: &Instance,
        _: &Converter<'_>,
    ) -> Result<(), ConversionError> {
        self.clone_from(instance);
        Ok(())
    }
}

/// One level of optionality: nil clears it, anything else fills it.
impl<T: Extract + Default> Extract for Option<T> {
    fn describe() -> String {
        format!("Option<{}>", T::describe())
    }

    fn extract_nil(&mut self) -> Result<(), ConversionError> {
        *self = None;
        Ok(())
    }

    fn extract_value(
        &mut self,
        source: &Value,
        converter: &Converter<'_>,
    ) -> Result<(), ConversionError> {
        match self {
            Some(inner) => inner.extract_value(source, converter),
            // A zero-length sequence is never assigned, not even as `Some`.
            None if is_empty_multifield(source) => Ok(()),
            None => {
                let mut inner = T::default();
                inner.extract_value(source, converter)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }

    fn extract_instance(
        &mut self,
        instance: &Instance,
        converter: &Converter<'_>,
    ) -> Result<(), ConversionError> {
        match self {
            Some(inner) => inner.extract_instance(instance, converter),
            None => {
                let mut inner = T::default();
                inner.extract_instance(instance, converter)?;
                *self = Some(inner);
                Ok(())
            }
        }
    }
}

/// Multifields coerce element by element through the full algorithm.
///
/// Elements are converted into scratch storage and committed only once every
/// element converted, so a failure leaves the target as it was. On commit the
/// target's allocation is reused when it can hold the source. An empty source
/// leaves the target untouched.
impl<T: Extract + Default> Extract for Vec<T> {
    fn describe() -> String {
        format!("Vec<{}>", T::describe())
    }

    fn extract_value(
        &mut self,
        source: &Value,
        converter: &Converter<'_>,
    ) -> Result<(), ConversionError> {
        let Value::Multifield(items) = source else {
            return Err(mismatch::<Self>(source));
        };
        if items.is_empty() {
            return Ok(());
        }

        let mut converted = Vec::with_capacity(items.len());
        for item in items {
            let mut element = T::default();
            converter.convert(&mut element, item)?;
            converted.push(element);
        }

        if self.capacity() >= converted.len() {
            self.clear();
            self.extend(converted);
        } else {
            *self = converted;
        }
        Ok(())
    }
}

fn is_empty_multifield(source: &Value) -> bool {
    matches!(source, Value::Multifield(items) if items.is_empty())
}
