//! Vote repository port (write side).
//!
//! # Uniqueness
//!
//! The at-most-one-ballot invariant is owned by storage: implementations
//! must back `(process_instance_id, submitted_by_profile_id)` with a
//! unique constraint and surface violations as the `AlreadyVoted`
//! conflict. The handler's existence pre-check only exists to produce a
//! friendlier error before the constraint fires.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProcessInstanceId, ProfileId};
use crate::domain::voting::{VoteProposalSelection, VoteSubmission};

/// Repository port for ballot persistence.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The member's ballot for an instance, if one exists.
    async fn find_by_instance_and_profile(
        &self,
        instance_id: &ProcessInstanceId,
        profile_id: &ProfileId,
    ) -> Result<Option<VoteSubmission>, DomainError>;

    /// Atomically persist a ballot and its selection rows.
    ///
    /// All-or-nothing: if any selection insert fails, the submission
    /// row must not persist either.
    ///
    /// # Errors
    ///
    /// - `AlreadyVoted` when the unique constraint fires
    /// - `DatabaseError` on any other persistence failure
    async fn record_ballot(
        &self,
        submission: &VoteSubmission,
        selections: &[VoteProposalSelection],
    ) -> Result<(), DomainError>;
}
