//! PostgreSQL implementation of RoleRepository.
//!
//! Stores one packed integer per (role, zone); the bit layout never
//! leaves this adapter.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, RoleId};
use crate::domain::permissions::{DecisionRolePermissions, PermissionBits};
use crate::ports::RoleRepository;

/// PostgreSQL implementation of RoleRepository.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a new PostgresRoleRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn find_permissions(
        &self,
        role_id: &RoleId,
        zone: &str,
    ) -> Result<Option<DecisionRolePermissions>, DomainError> {
        let row: Option<(i32,)> = sqlx::query_as(
            "SELECT permission_bits FROM role_permissions WHERE role_id = $1 AND zone = $2",
        )
        .bind(role_id.as_uuid())
        .bind(zone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch role permissions: {}", e),
            )
        })?;

        match row {
            Some((raw,)) => {
                let bits = PermissionBits::try_from_raw(raw as u32)?;
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
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, zone, permission_bits)
            VALUES ($1, $2, $3)
            ON CONFLICT (role_id, zone)
            DO UPDATE SET permission_bits = EXCLUDED.permission_bits
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(zone)
        .bind(permissions.encode().raw() as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save role permissions: {}", e),
            )
        })?;

        Ok(())
    }
}
