//! Role permission handlers.

mod update_decision_permissions;

pub use update_decision_permissions::{
    UpdateDecisionPermissionsCommand, UpdateDecisionPermissionsHandler,
    UpdateDecisionPermissionsResult,
};
