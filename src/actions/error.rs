use crate::core::error_handling::ContextualError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("Unknown action '{name}' (available: {})", available.join(", "))]
    UnknownAction { name: String, available: Vec<String> },
}

impl ContextualError for ActionError {
    fn is_user_actionable(&self) -> bool {
        false // Action names are fixed by the plugin that defines them
    }

    fn user_message(&self) -> Option<String> {
        None
    }
}
