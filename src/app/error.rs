//! Application-level errors

use crate::app::cli::config::ConfigError;
use crate::context::api::ContextError;
use crate::core::error_handling::ContextualError;
use crate::plugin::api::PluginError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("Failed to serialise report: {0}")]
    Report(#[from] serde_json::Error),
}

impl From<PluginError> for AppError {
    fn from(error: PluginError) -> Self {
        AppError::Context(ContextError::Plugin(error))
    }
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(error) => error.is_user_actionable(),
            AppError::Context(error) => error.is_user_actionable(),
            AppError::Report(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            AppError::Config(error) => error.user_message(),
            AppError::Context(error) => error.user_message(),
            AppError::Report(_) => None,
        }
    }
}
