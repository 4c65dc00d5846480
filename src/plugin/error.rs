//! Plugin Error Handling
//!
//! Error types for plugin lookup, compatibility checking, activation and
//! lifecycle misuse.

use crate::core::error_handling::ContextualError;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// Plugin not found in the builtin catalog
    #[error("Plugin not found: {plugin_name}")]
    PluginNotFound { plugin_name: String },

    /// Plugin API version incompatible with this build
    #[error("Version incompatible: {message}")]
    VersionIncompatible { message: String },

    /// The activation hook returned an error or panicked
    ///
    /// `source` holds the plugin's own error; it is `None` for panics.
    #[error("Failed to activate plugin '{plugin_name}': {cause}")]
    ActivationFailed {
        plugin_name: String,
        cause: String,
        #[source]
        source: Option<Box<PluginError>>,
    },

    /// A lifecycle operation was attempted from the wrong state
    #[error("Plugin '{plugin_name}' cannot {operation} while {state}")]
    InvalidState {
        plugin_name: String,
        state: String,
        operation: String,
    },

    /// Work was cut short by the plugin's abort signal
    #[error("Aborted: {reason}")]
    Aborted { reason: String },

    #[error("{message}")]
    Generic { message: String },
}

impl PluginError {
    pub fn activation_failed(plugin_name: impl Into<String>, cause: impl Into<String>) -> Self {
        Self::ActivationFailed {
            plugin_name: plugin_name.into(),
            cause: cause.into(),
            source: None,
        }
    }

    /// Wrap an error returned by a plugin's activation, keeping it as the source
    pub fn activation_failed_from(plugin_name: impl Into<String>, error: PluginError) -> Self {
        Self::ActivationFailed {
            plugin_name: plugin_name.into(),
            cause: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }
}

impl ContextualError for PluginError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            PluginError::PluginNotFound { .. } | PluginError::VersionIncompatible { .. }
        )
    }

    fn user_message(&self) -> Option<String> {
        match self {
            PluginError::PluginNotFound { plugin_name } => Some(format!(
                "Unknown plugin '{}'; run the 'plugins' command to list available plugins",
                plugin_name
            )),
            PluginError::VersionIncompatible { message } => Some(message.clone()),
            _ => None,
        }
    }
}
