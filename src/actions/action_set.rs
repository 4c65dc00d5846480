//! Named action sets
//!
//! A plugin declares a fixed list of actions up front. Triggering an action
//! notifies its listeners synchronously with the trigger arguments.

use crate::actions::error::ActionError;
use crate::core::cleanup::Disposer;
use crate::events::bus::{EventBus, EventTarget, Handler, HandlerResult};
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct ActionSet {
    names: Vec<String>,
    bus: EventBus,
}

/// Create an action set from a list of names; duplicates collapse
pub fn create_actions<I, S>(names: I) -> ActionSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ActionSet::new(names)
}

impl ActionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names.into_iter().map(Into::into) {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        Self {
            names: unique,
            bus: EventBus::new("actions"),
        }
    }

    /// Action names in declaration order
    pub fn names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    fn check(&self, name: &str) -> Result<(), ActionError> {
        if self.contains(name) {
            Ok(())
        } else {
            Err(ActionError::UnknownAction {
                name: name.to_string(),
                available: self.names.clone(),
            })
        }
    }

    /// Fire `name`, returning how many listeners were invoked
    pub fn trigger(&self, name: &str, args: &[Value]) -> Result<usize, ActionError> {
        self.check(name)?;
        log::trace!("Triggering action '{}'", name);
        Ok(self.bus.emit(name, args))
    }

    pub fn listen<F>(&self, name: &str, handler: F) -> Result<Disposer, ActionError>
    where
        F: Fn(&[Value]) -> HandlerResult + Send + Sync + 'static,
    {
        self.check(name)?;
        Ok(self.bus.on(name, handler))
    }

    pub fn listener_count(&self, name: &str) -> usize {
        self.bus.listener_count(name)
    }
}

/// Lets activation helpers subscribe to actions like any other event source
///
/// Unknown action names are logged and get a no-op disposer.
impl EventTarget for ActionSet {
    fn add_listener(&self, event: &str, handler: Handler) -> Disposer {
        if let Err(error) = self.check(event) {
            log::warn!("{}", error);
            return Disposer::noop();
        }
        self.bus.add_listener(event, handler)
    }
}
