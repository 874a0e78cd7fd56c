pub mod display;
pub mod encode;
pub mod tag;
pub mod value;

pub use encode::IntoValue;
pub use tag::Tag;
pub use value::{ExternalAddress, FactRef, InstanceName, InstanceRef, Symbol, Value};
