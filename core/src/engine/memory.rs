//! An in-process engine backing the bridge without a native library.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use hashbrown::{HashMap, HashSet};
use tracing::trace;

use super::{Atom, Instance, InstanceResolver, Multifield, NativeEngine};
use crate::values::{ExternalAddress, InstanceRef, Value};

const MODULE_SEPARATOR: &str = "::";

/// A pure-Rust engine: interned lexemes, a flat instance table and a log of
/// the functions and constructs defined through it.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    lexemes: RefCell<HashSet<Rc<str>>>,
    instances: RefCell<HashMap<String, Instance>>,
    next_instance: Cell<u64>,
    functions: RefCell<Vec<String>>,
    constructs: RefCell<Vec<String>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an instance of `class` named `name`.
    ///
    /// A name of the form `MODULE::name` is only visible through lookups
    /// scoped to `MODULE`.
    pub fn make_instance(
        &self,
        name: &str,
        class: &str,
        slots: impl IntoIterator<Item = (&'static str, Value)>,
    ) -> InstanceRef {
        let index = self.next_instance.get() + 1;
        self.next_instance.set(index);
        let reference = InstanceRef::new(index);
        let slots = slots
            .into_iter()
            .map(|(slot, value)| (String::from(slot), value))
            .collect();
        let instance = Instance::new(reference, name, class, slots);
        trace!(instance = name, class, index, "created instance");
        self.instances.borrow_mut().insert(name.into(), instance);
        reference
    }

    /// Number of distinct lexemes interned so far.
    pub fn lexeme_count(&self) -> usize {
        self.lexemes.borrow().len()
    }

    pub fn functions(&self) -> Vec<String> {
        self.functions.borrow().clone()
    }

    pub fn constructs(&self) -> Vec<String> {
        self.constructs.borrow().clone()
    }
}

impl InstanceResolver for MemoryEngine {
    fn find_instance(&self, name: &str, module: Option<&str>) -> Option<InstanceRef> {
        let instances = self.instances.borrow();
        if let Some(module) = module.filter(|_| !name.contains(MODULE_SEPARATOR)) {
            let scoped = format!("{module}{MODULE_SEPARATOR}{name}");
            if let Some(instance) = instances.get(&scoped) {
                return Some(instance.reference());
            }
        }
        instances.get(name).map(Instance::reference)
    }

    fn resolve_instance(&self, reference: InstanceRef) -> Option<Instance> {
        self.instances
            .borrow()
            .values()
            .find(|instance| instance.reference() == reference)
            .cloned()
    }
}

impl NativeEngine for MemoryEngine {
    fn add_symbol(&self, text: &str) -> Atom {
        let mut lexemes = self.lexemes.borrow_mut();
        if let Some(existing) = lexemes.get(text) {
            return Atom::Lexeme(existing.clone());
        }
        let interned: Rc<str> = Rc::from(text);
        lexemes.insert(interned.clone());
        Atom::Lexeme(interned)
    }

    fn add_integer(&self, value: i64) -> Atom {
        Atom::Integer(value)
    }

    fn add_float(&self, value: f64) -> Atom {
        Atom::Float(value)
    }

    fn add_external_address(&self, address: ExternalAddress) -> Atom {
        Atom::External(address)
    }

    fn create_multifield(&self, len: usize) -> Multifield {
        Multifield::new(len)
    }

    fn define_function(&self, name: &str) -> bool {
        let mut functions = self.functions.borrow_mut();
        if !functions.iter().any(|f| f == name) {
            functions.push(name.into());
        }
        true
    }

    fn build(&self, construct: &str) -> bool {
        if !is_balanced(construct) {
            return false;
        }
        self.constructs.borrow_mut().push(construct.into());
        true
    }
}

/// Parentheses outside string literals must balance and nest.
fn is_balanced(source: &str) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for c in source.chars() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0 && !in_string && source.contains('(')
}
