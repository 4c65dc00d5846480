//! TOML configuration file parsing and loading
//!
//! ```toml
//! [logging]
//! level = "debug"
//! format = "ext"
//! color = true
//!
//! [[plugin]]
//! name = "event-counter"
//! events = ["open", "close"]
//! scope = "local"
//! ```

use crate::core::error_handling::ContextualError;
use crate::core::logging::LogFormat;
use crate::plugin::api::PluginSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file does not exist: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Invalid --emit value '{spec}': {message}")]
    InvalidEmit { spec: String, message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true // Every configuration problem is for the operator to fix
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<String>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    #[serde(rename = "plugin")]
    pub plugins: Vec<PluginSettings>,
}

impl AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(level) = self.logging.level.as_deref() {
            if !LOG_LEVELS.contains(&level) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "unknown log level '{}' (expected one of {})",
                        level,
                        LOG_LEVELS.join(", ")
                    ),
                });
            }
        }
        if let Some(format) = self.logging.format.as_deref() {
            LogFormat::from_str(format).map_err(|_| ConfigError::Invalid {
                message: format!("unknown log format '{}'", format),
            })?;
        }
        if let Some(plugin) = self.plugins.iter().find(|plugin| plugin.name.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                message: format!("plugin entry with empty name (events: {:?})", plugin.events),
            });
        }
        Ok(())
    }
}

/// `<config dir>/AppRegistry/app-registry.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("AppRegistry").join("app-registry.toml"))
}

/// Parse and validate configuration text; `path` is only used in errors
pub fn parse_config(contents: &str, path: &Path) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load the configuration
///
/// An explicitly named file must exist. Without one the default location is
/// tried, and a missing default file yields the default configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match explicit {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                log::trace!("No configuration file found, using defaults");
                return Ok(AppConfig::default());
            }
        },
    };

    log::debug!("Loading configuration from {}", path.display());
    let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    parse_config(&contents, &path)
}
