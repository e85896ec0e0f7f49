//! Role permission repository port.
//!
//! Permissions are packed to one integer per (role, zone) in storage,
//! but the packed form stays behind this port: callers only ever see
//! the decoded capability struct.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RoleId};
use crate::domain::permissions::DecisionRolePermissions;

/// Repository port for per-role, per-zone decision permissions.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// The decoded capability set for a role in a zone.
    ///
    /// Returns `None` when the role has no grant in that zone.
    async fn find_permissions(
        &self,
        role_id: &RoleId,
        zone: &str,
    ) -> Result<Option<DecisionRolePermissions>, DomainError>;

    /// Persist the capability set for a role in a zone.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save_permissions(
        &self,
        role_id: &RoleId,
        zone: &str,
        permissions: &DecisionRolePermissions,
    ) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn RoleRepository) {}
    }
}
