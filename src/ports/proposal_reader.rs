//! Proposal reader port (read side).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProcessInstanceId, ProposalId};
use crate::domain::process::Proposal;

/// Read-side port over the proposals of a process instance.
#[async_trait]
pub trait ProposalReader: Send + Sync {
    /// Ids of every proposal in the instance that ballots may select
    /// (submitted proposals only).
    async fn vote_eligible_ids(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<ProposalId>, DomainError>;

    /// All proposals of an instance, newest first.
    async fn find_by_instance(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<Proposal>, DomainError>;
}
