//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::plugin::catalog::{builtin_plugins, find_builtin, BuiltinPlugin, BuiltinPluginEntry};
pub use crate::plugin::error::{PluginError, PluginResult};
pub use crate::plugin::helpers::ActivateHelpers;
pub use crate::plugin::lifecycle::{LifecycleState, PluginLifecycleScope};
pub use crate::plugin::signal::{AbortController, AbortSignal};
pub use crate::plugin::traits::Plugin;
pub use crate::plugin::types::{Activation, BuiltinServices, PluginInfo, PluginSettings, RegistryTarget};

/// Builtin plugins and their store types
pub mod builtins {
    pub use crate::plugin::builtin::event_counter::{
        CounterStore, EventCounterPlugin, EventCounts, PLUGIN_NAME as EVENT_COUNTER, RESET_ACTION,
    };
    pub use crate::plugin::builtin::event_log::{
        EventLog, EventLogPlugin, LoggedEvent, PLUGIN_NAME as EVENT_LOG,
    };
}
