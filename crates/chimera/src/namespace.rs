use indexmap::IndexMap;

use crate::{intern::StringId, value::Value};

/// Insertion-ordered attribute mapping, keyed by interned name.
///
/// Backs both class namespaces (mutable for the life of the class) and
/// instance attribute dictionaries (private to one instance, populated only
/// by explicit assignment). Enumerating a namespace never reflects entries
/// that exist only further up the resolution chain.
#[derive(Debug, Default)]
pub(crate) struct Namespace {
    entries: IndexMap<StringId, Value, ahash::RandomState>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value bound to `name`, if present in this namespace.
    pub fn get(&self, name: StringId) -> Option<&Value> {
        self.entries.get(&name)
    }

    /// Binds `name` to `value`, returning the previously bound value if any.
    pub fn set(&mut self, name: StringId, value: Value) -> Option<Value> {
        self.entries.insert(name, value)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (StringId, Value)> + '_ {
        self.entries.iter().map(|(&name, &value)| (name, value))
    }
}
