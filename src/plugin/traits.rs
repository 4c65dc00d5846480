//! Plugin Trait
//!
//! A plugin is a unit of functionality activated against an app registry.
//! Activation receives plugin-specific initial properties, plugin-specific
//! services and the activation helpers; everything the plugin subscribes to
//! or allocates through the helpers is undone when its lifecycle scope is
//! deactivated.

use crate::plugin::error::PluginResult;
use crate::plugin::helpers::ActivateHelpers;
use crate::plugin::types::{Activation, PluginInfo};

pub trait Plugin: Send + Sync {
    /// Initial properties passed by the host on activation
    type Initial;

    /// Dependencies the host injects on activation
    type Services;

    /// Get plugin metadata
    fn info(&self) -> PluginInfo;

    /// Set the plugin up
    ///
    /// Returning an error (or panicking) tears down whatever was already
    /// registered through `helpers` and leaves the scope deactivated.
    fn activate(
        &self,
        initial: Self::Initial,
        services: Self::Services,
        helpers: &ActivateHelpers,
    ) -> PluginResult<Activation>;
}
