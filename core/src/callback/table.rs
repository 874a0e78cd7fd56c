//! Handle → environment mapping consulted by the trampoline.
//!
//! The engine only hands the trampoline an untyped environment handle. The
//! boundary layer registers each environment's callback registry here when
//! the environment is created and removes it when the environment is
//! destroyed; dispatch then re-resolves the handle on every call.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use static_assertions::assert_eq_size;
use tracing::trace;

use super::DispatchError;
use super::registry::Registry;

/// Opaque identity of one engine environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvHandle(u64);
assert_eq_size!(EnvHandle, u64);

impl EnvHandle {
    /// A handle never handed out before in this process.
    pub fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EnvHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

thread_local! {
    static ENVIRONMENTS: EnvironmentTable = EnvironmentTable::new();
}

/// Live environments by handle.
///
/// The engine is single-threaded, so the process-wide table is kept per
/// thread and needs no lock.
#[derive(Default)]
pub struct EnvironmentTable {
    entries: RefCell<HashMap<EnvHandle, Rc<Registry>>>,
}

impl EnvironmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against the table shared by every environment on this thread.
    pub fn with_global<R>(f: impl FnOnce(&EnvironmentTable) -> R) -> R {
        ENVIRONMENTS.with(f)
    }

    /// Remove `handle` from the shared table. Safe to call while the thread
    /// is shutting down.
    pub(crate) fn unregister_global(handle: EnvHandle) {
        let _ = ENVIRONMENTS.try_with(|table| table.remove(handle));
    }

    pub fn insert(&self, handle: EnvHandle, registry: Rc<Registry>) {
        trace!(%handle, "environment registered");
        self.entries.borrow_mut().insert(handle, registry);
    }

    pub fn remove(&self, handle: EnvHandle) -> Option<Rc<Registry>> {
        trace!(%handle, "environment removed");
        self.entries.borrow_mut().remove(&handle)
    }

    /// Resolve a raw handle delivered by the engine.
    pub fn resolve(&self, handle: EnvHandle) -> Result<Rc<Registry>, DispatchError> {
        self.entries
            .borrow()
            .get(&handle)
            .cloned()
            .ok_or(DispatchError::UnknownEnvironment(handle))
    }

    pub fn contains(&self, handle: EnvHandle) -> bool {
        self.entries.borrow().contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl fmt::Debug for EnvironmentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.borrow().keys()).finish()
    }
}
