//! Host callbacks invoked from engine code.

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod table;

pub use dispatch::{TRAMPOLINE_NAME, dispatch, host_function, trampoline};
pub use error::{CallbackError, DispatchError};
pub use registry::{Callback, Registry};
pub use table::{EnvHandle, EnvironmentTable};

#[cfg(test)]
mod dispatch_test;
