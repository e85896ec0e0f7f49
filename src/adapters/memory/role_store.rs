//! In-memory role permission store.
//!
//! Stores the packed integer form, the same way the relational schema
//! does, so the codec round-trip is exercised on every read and write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, RoleId};
use crate::domain::permissions::{DecisionRolePermissions, PermissionBits};
use crate::ports::RoleRepository;

/// In-memory implementation of [`RoleRepository`].
#[derive(Default)]
pub struct InMemoryRoleStore {
    grants: Mutex<HashMap<(RoleId, String), u32>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a packed grant directly, as a migration would.
    pub fn insert_raw(&self, role_id: RoleId, zone: &str, raw: u32) {
        self.grants
            .lock()
            .unwrap()
            .insert((role_id, zone.to_string()), raw);
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleStore {
    async fn find_permissions(
        &self,
        role_id: &RoleId,
        zone: &str,
    ) -> Result<Option<DecisionRolePermissions>, DomainError> {
        let grants = self.grants.lock().unwrap();
        match grants.get(&(*role_id, zone.to_string())) {
            Some(raw) => {
                let bits = PermissionBits::try_from_raw(*raw)?;
                Ok(Some(bits.decode()))
            }
            None => Ok(None),
        }
    }

    async fn save_permissions(
        &self,
        role_id: &RoleId,
        zone: &str,
        permissions: &DecisionRolePermissions,
    ) -> Result<(), DomainError> {
        self.grants
            .lock()
            .unwrap()
            .insert((*role_id, zone.to_string()), permissions.encode().raw());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn save_and_find_round_trips_through_the_packed_form() {
        let store = InMemoryRoleStore::new();
        let role_id = RoleId::new();
        let caps = DecisionRolePermissions::decision_role(true, false, true, true);

        store
            .save_permissions(&role_id, "decisions", &caps)
            .await
            .unwrap();

        let found = store
            .find_permissions(&role_id, "decisions")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, caps);
    }

    #[tokio::test]
    async fn missing_grant_returns_none() {
        let store = InMemoryRoleStore::new();
        let found = store
            .find_permissions(&RoleId::new(), "decisions")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn zones_are_independent() {
        let store = InMemoryRoleStore::new();
        let role_id = RoleId::new();
        let caps = DecisionRolePermissions::decision_role(false, true, false, false);

        store
            .save_permissions(&role_id, "decisions", &caps)
            .await
            .unwrap();

        assert!(store
            .find_permissions(&role_id, "posts")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn corrupted_raw_value_surfaces_as_validation_error() {
        let store = InMemoryRoleStore::new();
        let role_id = RoleId::new();
        store.insert_raw(role_id, "decisions", 1 << 12);

        let err = store
            .find_permissions(&role_id, "decisions")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
