//! Name-keyed registries with last-write-wins semantics
//!
//! Used for both components and stores. Registering an existing name replaces
//! the previous value without error; deregistering a missing name is a no-op.

use crate::registry::handles::{ComponentHandle, StoreHandle};
use crate::registry::names::{ComponentName, StoreName};
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Mapping from a typed name to a shared handle
#[derive(Debug, Clone)]
pub struct KeyedRegistry<K, V> {
    entries: HashMap<K, V>,
}

pub type ComponentRegistry = KeyedRegistry<ComponentName, ComponentHandle>;
pub type StoreRegistry = KeyedRegistry<StoreName, StoreHandle>;

impl<K, V> Default for KeyedRegistry<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> KeyedRegistry<K, V>
where
    K: Eq + Hash + Ord + Clone + Display,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` under `name`, returning whatever it replaced
    pub fn register(&mut self, name: K, value: V) -> Option<V> {
        let previous = self.entries.insert(name.clone(), value);
        if previous.is_some() {
            log::debug!("Registration '{}' replaced an existing entry", name);
        }
        previous
    }

    pub fn deregister(&mut self, name: &K) -> Option<V> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &K) -> Option<V> {
        self.entries.get(name).cloned()
    }

    pub fn contains(&self, name: &K) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<K> {
        let mut names: Vec<K> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
