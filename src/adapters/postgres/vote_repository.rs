//! PostgreSQL implementation of VoteRepository.
//!
//! The at-most-one-ballot invariant lives in the database: the
//! `vote_submissions` table carries a unique index on
//! `(process_instance_id, submitted_by_profile_id)`, and this adapter
//! translates its violation into the `AlreadyVoted` conflict. The
//! submission and its selection rows go through one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{
    DomainError, ErrorCode, ProcessInstanceId, ProfileId, Timestamp, VoteSubmissionId,
};
use crate::domain::voting::{VoteData, VoteProposalSelection, VoteSubmission};
use crate::ports::VoteRepository;

/// PostgreSQL implementation of VoteRepository.
#[derive(Clone)]
pub struct PostgresVoteRepository {
    pool: PgPool,
}

impl PostgresVoteRepository {
    /// Creates a new PostgresVoteRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VoteRepository for PostgresVoteRepository {
    async fn find_by_instance_and_profile(
        &self,
        instance_id: &ProcessInstanceId,
        profile_id: &ProfileId,
    ) -> Result<Option<VoteSubmission>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, process_instance_id, submitted_by_profile_id, vote_data,
                   custom_data, signature, created_at
            FROM vote_submissions
            WHERE process_instance_id = $1 AND submitted_by_profile_id = $2
            "#,
        )
        .bind(instance_id.as_uuid())
        .bind(profile_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch vote submission: {}", e),
            )
        })?;

        row.map(row_to_submission).transpose()
    }

    async fn record_ballot(
        &self,
        submission: &VoteSubmission,
        selections: &[VoteProposalSelection],
    ) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to open transaction: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO vote_submissions (
                id, process_instance_id, submitted_by_profile_id, vote_data,
                custom_data, signature, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(submission.id().as_uuid())
        .bind(submission.process_instance_id().as_uuid())
        .bind(submission.submitted_by_profile_id().as_str())
        .bind(Json(submission.vote_data()))
        .bind(submission.custom_data().cloned().map(Json))
        .bind(submission.signature())
        .bind(submission.created_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(map_submission_insert_error)?;

        for selection in selections {
            sqlx::query(
                r#"
                INSERT INTO vote_proposal_selections (vote_submission_id, proposal_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(selection.vote_submission_id.as_uuid())
            .bind(selection.proposal_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to insert vote selection: {}", e),
                )
            })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit vote transaction: {}", e),
            )
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

/// A unique violation here means the member's ballot already exists;
/// everything else stays a database error.
fn map_submission_insert_error(e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return DomainError::already_voted();
        }
    }
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to insert vote submission: {}", e),
    )
}

fn column_err(column: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to get {}: {}", column, e),
    )
}

fn row_to_submission(row: sqlx::postgres::PgRow) -> Result<VoteSubmission, DomainError> {
    let id: uuid::Uuid = row.try_get("id").map_err(|e| column_err("id", e))?;
    let process_instance_id: uuid::Uuid = row
        .try_get("process_instance_id")
        .map_err(|e| column_err("process_instance_id", e))?;
    let submitted_by_profile_id: String = row
        .try_get("submitted_by_profile_id")
        .map_err(|e| column_err("submitted_by_profile_id", e))?;
    let Json(vote_data): Json<VoteData> = row
        .try_get("vote_data")
        .map_err(|e| column_err("vote_data", e))?;
    let custom_data: Option<Json<serde_json::Value>> = row
        .try_get("custom_data")
        .map_err(|e| column_err("custom_data", e))?;
    let signature: String = row
        .try_get("signature")
        .map_err(|e| column_err("signature", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| column_err("created_at", e))?;

    Ok(VoteSubmission::reconstitute(
        VoteSubmissionId::from_uuid(id),
        ProcessInstanceId::from_uuid(process_instance_id),
        ProfileId::new(submitted_by_profile_id)?,
        vote_data,
        custom_data.map(|Json(value)| value),
        signature,
        Timestamp::from_datetime(created_at),
    ))
}
