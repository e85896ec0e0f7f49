//! In-memory proposal store for tests and local development.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ProcessInstanceId, ProposalId};
use crate::domain::process::Proposal;
use crate::ports::ProposalReader;

/// In-memory implementation of [`ProposalReader`].
#[derive(Default)]
pub struct InMemoryProposalStore {
    proposals: Mutex<Vec<Proposal>>,
}

impl InMemoryProposalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a proposal.
    pub fn insert(&self, proposal: Proposal) {
        self.proposals.lock().unwrap().push(proposal);
    }
}

#[async_trait]
impl ProposalReader for InMemoryProposalStore {
    async fn vote_eligible_ids(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<ProposalId>, DomainError> {
        Ok(self
            .proposals
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.process_instance_id() == instance_id && p.is_vote_eligible())
            .map(|p| *p.id())
            .collect())
    }

    async fn find_by_instance(
        &self,
        instance_id: &ProcessInstanceId,
    ) -> Result<Vec<Proposal>, DomainError> {
        let mut proposals: Vec<Proposal> = self
            .proposals
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.process_instance_id() == instance_id)
            .cloned()
            .collect();
        proposals.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(proposals)
    }
}
