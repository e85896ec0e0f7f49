//! UpdateDecisionPermissionsHandler - Command handler for editing a
//! role's decision capabilities in one zone.
//!
//! The editor only has authority over the admin and decision bits; a
//! role's standard CRUD grants are managed elsewhere and must survive
//! this update untouched.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, RoleId};
use crate::domain::permissions::DecisionRolePermissions;
use crate::ports::RoleRepository;

/// Command to apply decision capabilities to a role in a zone.
#[derive(Debug, Clone)]
pub struct UpdateDecisionPermissionsCommand {
    pub role_id: RoleId,
    pub zone: String,
    /// Requested admin/decision capabilities. CRUD fields are ignored.
    pub capabilities: DecisionRolePermissions,
}

/// Result of the update: the full decoded grant after the write.
#[derive(Debug, Clone)]
pub struct UpdateDecisionPermissionsResult {
    pub permissions: DecisionRolePermissions,
}

/// Handler for decision permission updates.
pub struct UpdateDecisionPermissionsHandler {
    role_repository: Arc<dyn RoleRepository>,
}

impl UpdateDecisionPermissionsHandler {
    pub fn new(role_repository: Arc<dyn RoleRepository>) -> Self {
        Self { role_repository }
    }

    pub async fn handle(
        &self,
        cmd: UpdateDecisionPermissionsCommand,
    ) -> Result<UpdateDecisionPermissionsResult, DomainError> {
        let existing = self
            .role_repository
            .find_permissions(&cmd.role_id, &cmd.zone)
            .await?;

        let updated = match existing {
            Some(current) => current.encode().apply_decision_update(&cmd.capabilities).decode(),
            None => {
                // First grant in this zone: a decision role always gets
                // read access.
                let caps = cmd.capabilities;
                let mut created = DecisionRolePermissions::decision_role(
                    caps.invite_members,
                    caps.review,
                    caps.submit_proposals,
                    caps.vote,
                );
                created.admin = caps.admin;
                created
            }
        };

        self.role_repository
            .save_permissions(&cmd.role_id, &cmd.zone, &updated)
            .await?;

        tracing::debug!(role = %cmd.role_id, zone = %cmd.zone, "decision permissions updated");

        Ok(UpdateDecisionPermissionsResult {
            permissions: updated,
        })
    }
}
