//! Static access checker for tests and local development.
//!
//! Grants every caller the same fixed capability set. Useful while the
//! surrounding platform's role resolution is not wired up.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, ProcessInstanceId, ProfileId};
use crate::domain::permissions::{Capability, DecisionRolePermissions};
use crate::ports::DecisionAccessChecker;

/// [`DecisionAccessChecker`] backed by one fixed capability set.
pub struct StaticAccessChecker {
    granted: DecisionRolePermissions,
}

impl StaticAccessChecker {
    /// Grants every capability.
    pub fn allow_all() -> Self {
        Self {
            granted: DecisionRolePermissions {
                delete: true,
                update: true,
                read: true,
                create: true,
                admin: true,
                invite_members: true,
                review: true,
                submit_proposals: true,
                vote: true,
            },
        }
    }

    /// Grants nothing.
    pub fn deny_all() -> Self {
        Self {
            granted: DecisionRolePermissions::none(),
        }
    }

    /// Grants exactly the given capability set.
    pub fn with_permissions(granted: DecisionRolePermissions) -> Self {
        Self { granted }
    }
}

#[async_trait]
impl DecisionAccessChecker for StaticAccessChecker {
    async fn assert_access(
        &self,
        profile_id: &ProfileId,
        _instance_id: &ProcessInstanceId,
        required: &[Capability],
    ) -> Result<(), DomainError> {
        for capability in required {
            if !self.granted.grants(*capability) {
                return Err(DomainError::new(
                    ErrorCode::Forbidden,
                    format!("Profile {} lacks the {} capability", profile_id, capability),
                )
                .with_detail("capability", capability.to_string()));
            }
        }
        Ok(())
    }
}
