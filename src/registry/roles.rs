//! Role registry
//!
//! A role is a named extension point that several components contribute to.
//! Entries keep insertion order and are not deduplicated by name.

use crate::registry::handles::ComponentHandle;
use crate::registry::names::RoleName;
use std::collections::HashMap;

/// One contribution to a role
#[derive(Debug, Clone)]
pub struct RoleEntry {
    pub component: ComponentHandle,
    pub name: String,
}

impl RoleEntry {
    pub fn new(name: impl Into<String>, component: ComponentHandle) -> Self {
        Self {
            component,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoleRegistry {
    roles: HashMap<RoleName, Vec<RoleEntry>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the role, creating the role on first use
    pub fn register(&mut self, role: RoleName, entry: RoleEntry) {
        self.roles.entry(role).or_default().push(entry);
    }

    /// Remove every entry of `role` named `name`
    ///
    /// The role itself stays registered even when it ends up empty. Returns
    /// the number of entries removed.
    pub fn deregister(&mut self, role: &RoleName, name: &str) -> usize {
        match self.roles.get_mut(role) {
            Some(entries) => {
                let before = entries.len();
                entries.retain(|entry| entry.name != name);
                before - entries.len()
            }
            None => 0,
        }
    }

    /// `None` if the role was never registered, possibly empty otherwise
    pub fn get(&self, role: &RoleName) -> Option<Vec<RoleEntry>> {
        self.roles.get(role).cloned()
    }

    /// Registered role names, sorted
    pub fn names(&self) -> Vec<RoleName> {
        let mut names: Vec<RoleName> = self.roles.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn clear(&mut self) {
        self.roles.clear();
    }
}
