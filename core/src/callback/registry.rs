//! Per-environment callback registry.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use hashbrown::HashMap;

use super::CallbackError;
use crate::values::Value;

/// A host function callable from engine code.
///
/// Arguments arrive decoded and in call order; the callback cannot reach the
/// engine's argument storage through them.
pub type Callback = Rc<dyn Fn(&[Value]) -> Result<Value, CallbackError>>;

/// Name → callback mapping owned by one environment.
///
/// Lookups hand out a clone of the callback, so a callback may register or
/// remove callbacks while it runs.
#[derive(Default)]
pub struct Registry {
    callbacks: RefCell<HashMap<String, Callback>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` under `name`, returning the one it replaces.
    pub fn register<F>(&self, name: impl Into<String>, callback: F) -> Option<Callback>
    where
        F: Fn(&[Value]) -> Result<Value, CallbackError> + 'static,
    {
        self.callbacks
            .borrow_mut()
            .insert(name.into(), Rc::new(callback))
    }

    pub fn unregister(&self, name: &str) -> Option<Callback> {
        self.callbacks.borrow_mut().remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Callback> {
        self.callbacks.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.borrow().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.borrow().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.callbacks.borrow().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("callbacks", &self.names())
            .finish()
    }
}
