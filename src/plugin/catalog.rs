//! Builtin plugin catalog
//!
//! Builtin plugins register themselves with the `builtin_plugin!` macro and
//! are discovered at runtime through `inventory`, so adding a plugin never
//! requires touching a central list.

use crate::core::version::{get_api_version, is_api_compatible};
use crate::plugin::error::{PluginError, PluginResult};
use crate::plugin::traits::Plugin;
use crate::plugin::types::{BuiltinServices, PluginInfo, PluginSettings};

/// A plugin that can be driven from configuration
pub type BuiltinPlugin = dyn Plugin<Initial = PluginSettings, Services = BuiltinServices>;

/// Entry for a builtin plugin in the dynamic registry
pub struct BuiltinPluginEntry {
    pub info: fn() -> PluginInfo,
    pub factory: fn() -> Box<BuiltinPlugin>,
}

// Collect all builtin plugin entries
inventory::collect!(BuiltinPluginEntry);

/// Register a builtin plugin
///
/// ```ignore
/// builtin_plugin!(EventLogPlugin::plugin_info, || Box::new(EventLogPlugin));
/// ```
#[macro_export]
macro_rules! builtin_plugin {
    ($info:expr, $factory:expr) => {
        ::inventory::submit!($crate::plugin::catalog::BuiltinPluginEntry {
            info: $info,
            factory: $factory,
        });
    };
}

/// Every registered builtin compatible with this build, sorted by name
pub fn builtin_plugins() -> Vec<PluginInfo> {
    let mut plugins: Vec<PluginInfo> = inventory::iter::<BuiltinPluginEntry>()
        .map(|entry| (entry.info)())
        .filter(|info| {
            let compatible = is_api_compatible(info.api_version);
            if !compatible {
                log::warn!(
                    "Skipping builtin plugin '{}': API version {} is newer than {}",
                    info.name,
                    info.api_version,
                    get_api_version()
                );
            }
            compatible
        })
        .collect();
    plugins.sort_by(|a, b| a.name.cmp(&b.name));
    plugins
}

/// Instantiate the builtin plugin called `name`
pub fn find_builtin(name: &str) -> PluginResult<Box<BuiltinPlugin>> {
    let entry = inventory::iter::<BuiltinPluginEntry>()
        .find(|entry| (entry.info)().name == name)
        .ok_or_else(|| PluginError::PluginNotFound {
            plugin_name: name.to_string(),
        })?;

    let info = (entry.info)();
    if !is_api_compatible(info.api_version) {
        return Err(PluginError::VersionIncompatible {
            message: format!(
                "Plugin '{}' requires API version {} but this build provides {}",
                info.name,
                info.api_version,
                get_api_version()
            ),
        });
    }
    Ok((entry.factory)())
}
