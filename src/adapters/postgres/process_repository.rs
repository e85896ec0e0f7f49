//! PostgreSQL implementation of ProcessRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, OrganizationId, ProcessId, ProcessInstanceId, ProfileId, Timestamp,
};
use crate::domain::process::{
    DecisionProcess, InstanceData, InstanceStatus, ProcessInstance, ProcessSchema,
};
use crate::ports::ProcessRepository;

/// PostgreSQL implementation of ProcessRepository.
#[derive(Clone)]
pub struct PostgresProcessRepository {
    pool: PgPool,
}

impl PostgresProcessRepository {
    /// Creates a new PostgresProcessRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessRepository for PostgresProcessRepository {
    async fn find_process(&self, id: &ProcessId) -> Result<Option<DecisionProcess>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, organization_id, name, description, process_schema,
                   created_at, updated_at
            FROM decision_processes
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch process: {}", e),
            )
        })?;

        row.map(row_to_process).transpose()
    }

    async fn find_instance(
        &self,
        id: &ProcessInstanceId,
    ) -> Result<Option<ProcessInstance>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, process_id, owner_profile_id, profile_id, instance_data,
                   status, transition_count, created_at, updated_at
            FROM process_instances
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch process instance: {}", e),
            )
        })?;

        row.map(row_to_instance).transpose()
    }

    async fn update_instance(&self, instance: &ProcessInstance) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE process_instances SET
                instance_data = $2,
                status = $3,
                transition_count = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(instance.id().as_uuid())
        .bind(Json(instance.instance_data()))
        .bind(instance_status_to_str(instance.status()))
        .bind(instance.transition_count() as i32)
        .bind(instance.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update process instance: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProcessInstanceNotFound,
                format!("Process instance not found: {}", instance.id()),
            ));
        }

        Ok(())
    }

    async fn delete_instance(&self, id: &ProcessInstanceId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM process_instances WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to delete process instance: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ProcessInstanceNotFound,
                format!("Process instance not found: {}", id),
            ));
        }

        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn instance_status_to_str(status: InstanceStatus) -> &'static str {
    match status {
        InstanceStatus::Active => "active",
        InstanceStatus::Cancelled => "cancelled",
    }
}

fn str_to_instance_status(s: &str) -> Result<InstanceStatus, DomainError> {
    match s {
        "active" => Ok(InstanceStatus::Active),
        "cancelled" => Ok(InstanceStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid instance status: {}", s),
        )),
    }
}

fn column_err(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to get {}: {}", column, e),
    )
}

fn row_to_process(row: sqlx::postgres::PgRow) -> Result<DecisionProcess, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| column_err("id", e))?;
    let organization_id: uuid::Uuid = row
        .try_get("organization_id")
        .map_err(|e| column_err("organization_id", e))?;
    let name: String = row.try_get("name").map_err(|e| column_err("name", e))?;
    let description: Option<String> = row
        .try_get("description")
        .map_err(|e| column_err("description", e))?;
    let Json(process_schema): Json<ProcessSchema> = row
        .try_get("process_schema")
        .map_err(|e| column_err("process_schema", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| column_err("created_at", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_err("updated_at", e))?;

    Ok(DecisionProcess::reconstitute(
        ProcessId::from_uuid(id),
        OrganizationId::from_uuid(organization_id),
        name,
        description,
        process_schema,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_instance(row: sqlx::postgres::PgRow) -> Result<ProcessInstance, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| column_err("id", e))?;
    let process_id: uuid::Uuid = row
        .try_get("process_id")
        .map_err(|e| column_err("process_id", e))?;
    let owner_profile_id: String = row
        .try_get("owner_profile_id")
        .map_err(|e| column_err("owner_profile_id", e))?;
    let profile_id: String = row
        .try_get("profile_id")
        .map_err(|e| column_err("profile_id", e))?;
    let Json(instance_data): Json<InstanceData> = row
        .try_get("instance_data")
        .map_err(|e| column_err("instance_data", e))?;
    let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
    let transition_count: i32 = row
        .try_get("transition_count")
        .map_err(|e| column_err("transition_count", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| column_err("created_at", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_err("updated_at", e))?;

    Ok(ProcessInstance::reconstitute(
        ProcessInstanceId::from_uuid(id),
        ProcessId::from_uuid(process_id),
        ProfileId::new(owner_profile_id)?,
        ProfileId::new(profile_id)?,
        instance_data,
        str_to_instance_status(&status)?,
        transition_count as u32,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
