//! Public API for actions and stores
//!
//! External modules should import from here rather than directly from internal modules.

pub use crate::actions::action_set::{create_actions, ActionSet};
pub use crate::actions::error::ActionError;
pub use crate::actions::store::ObservableStore;
