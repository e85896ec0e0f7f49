//! PostgreSQL implementation of ProposalReader.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, ProcessInstanceId, ProfileId, ProposalId, Timestamp,
};
use crate::domain::process::{Proposal, ProposalStatus};
use crate::ports::ProposalReader;

/// PostgreSQL implementation of ProposalReader.
#[derive(Clone)]
pub struct PostgresProposalReader {
    pool: PgPool,
}

impl PostgresProposalReader {
    /// Creates a new PostgresProposalReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProposalReader for PostgresProposalReader {
    async fn vote_eligible_ids(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<ProposalId>, DomainError> {
        let rows: Vec<(uuid::Uuid,)> = sqlx::query_as(
            r#"
            SELECT id FROM proposals
            WHERE process_instance_id = $1 AND status = 'submitted'
            "#,
        )
        .bind(instance_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch eligible proposals: {}", e),
            )
        })?;

        Ok(rows
            .into_iter()
            .map(|(id,)| ProposalId::from_uuid(id))
            .collect())
    }

    async fn find_by_instance(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<Proposal>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, process_instance_id, submitted_by_profile_id, status,
                   proposal_data, created_at, updated_at
            FROM proposals
            WHERE process_instance_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(instance_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch proposals: {}", e),
            )
        })?;

        rows.into_iter().map(row_to_proposal).collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn str_to_proposal_status(s: &str) -> Result<ProposalStatus, DomainError> {
    match s {
        "draft" => Ok(ProposalStatus::Draft),
        "submitted" => Ok(ProposalStatus::Submitted),
        "withdrawn" => Ok(ProposalStatus::Withdrawn),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid proposal status: {}", s),
        )),
    }
}

fn column_err(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to get {}: {}", column, e),
    )
}

fn row_to_proposal(row: sqlx::postgres::PgRow) -> Result<Proposal, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| column_err("id", e))?;
    let process_instance_id: uuid::Uuid = row
        .try_get("process_instance_id")
        .map_err(|e| column_err("process_instance_id", e))?;
    let submitted_by_profile_id: String = row
        .try_get("submitted_by_profile_id")
        .map_err(|e| column_err("submitted_by_profile_id", e))?;
    let status: String = row.try_get("status").map_err(|e| column_err("status", e))?;
    let Json(proposal_data): Json<serde_json::Value> = row
        .try_get("proposal_data")
        .map_err(|e| column_err("proposal_data", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| column_err("created_at", e))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| column_err("updated_at", e))?;

    Ok(Proposal::reconstitute(
        ProposalId::from_uuid(id),
        ProcessInstanceId::from_uuid(process_instance_id),
        ProfileId::new(submitted_by_profile_id)?,
        str_to_proposal_status(&status)?,
        proposal_data,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}
