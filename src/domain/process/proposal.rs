//! Proposal aggregate: a member submission into a process instance.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{
    DomainError, ErrorCode, ProcessInstanceId, ProfileId, ProposalId, Timestamp,
};

/// Lifecycle status of a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Draft,
    Submitted,
    Withdrawn,
}

impl ProposalStatus {
    /// The wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Draft => "draft",
            ProposalStatus::Submitted => "submitted",
            ProposalStatus::Withdrawn => "withdrawn",
        }
    }
}

/// A proposal inside one process instance.
///
/// Only submitted proposals are eligible for voting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    id: ProposalId,
    process_instance_id: ProcessInstanceId,
    submitted_by_profile_id: ProfileId,
    status: ProposalStatus,
    /// Field values keyed by the compiled template's field keys.
    proposal_data: Value,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Proposal {
    /// Creates a new draft proposal.
    pub fn draft(
        id: ProposalId,
        process_instance_id: ProcessInstanceId,
        submitted_by_profile_id: ProfileId,
        proposal_data: Value,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            process_instance_id,
            submitted_by_profile_id,
            status: ProposalStatus::Draft,
            proposal_data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitute from persistence (no validation).
    pub fn reconstitute(
        id: ProposalId,
        process_instance_id: ProcessInstanceId,
        submitted_by_profile_id: ProfileId,
        status: ProposalStatus,
        proposal_data: Value,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            process_instance_id,
            submitted_by_profile_id,
            status,
            proposal_data,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &ProposalId {
        &self.id
    }

    pub fn process_instance_id(&self) -> &ProcessInstanceId {
        &self.process_instance_id
    }

    pub fn submitted_by_profile_id(&self) -> &ProfileId {
        &self.submitted_by_profile_id
    }

    pub fn status(&self) -> ProposalStatus {
        self.status
    }

    pub fn proposal_data(&self) -> &Value {
        &self.proposal_data
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Whether this proposal can appear on ballots.
    pub fn is_vote_eligible(&self) -> bool {
        self.status == ProposalStatus::Submitted
    }

    /// Submits a draft for review and voting.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the proposal is a draft
    pub fn submit(&mut self) -> Result<(), DomainError> {
        if self.status != ProposalStatus::Draft {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot submit a {} proposal", self.status.as_str()),
            ));
        }
        self.status = ProposalStatus::Submitted;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Withdraws a submitted proposal from consideration.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` unless the proposal is submitted
    pub fn withdraw(&mut self) -> Result<(), DomainError> {
        if self.status != ProposalStatus::Submitted {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Cannot withdraw a {} proposal", self.status.as_str()),
            ));
        }
        self.status = ProposalStatus::Withdrawn;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Replaces the draft's field values.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` once the proposal left draft
    pub fn update_data(&mut self, proposal_data: Value) -> Result<(), DomainError> {
        if self.status != ProposalStatus::Draft {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Only draft proposals can be edited",
            ));
        }
        self.proposal_data = proposal_data;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn proposal() -> Proposal {
        Proposal::draft(
            ProposalId::new(),
            ProcessInstanceId::new(),
            ProfileId::new("member-1").unwrap(),
            json!({ "title": "Community garden" }),
        )
    }

    #[test]
    fn draft_is_not_vote_eligible() {
        let proposal = proposal();
        assert_eq!(proposal.status(), ProposalStatus::Draft);
        assert!(!proposal.is_vote_eligible());
    }

    #[test]
    fn submit_makes_proposal_eligible() {
        let mut proposal = proposal();
        proposal.submit().unwrap();
        assert!(proposal.is_vote_eligible());
    }

    #[test]
    fn submit_twice_fails() {
        let mut proposal = proposal();
        proposal.submit().unwrap();
        let err = proposal.submit().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn withdraw_removes_eligibility() {
        let mut proposal = proposal();
        proposal.submit().unwrap();
        proposal.withdraw().unwrap();
        assert!(!proposal.is_vote_eligible());
    }

    #[test]
    fn withdrawing_a_draft_fails() {
        let mut proposal = proposal();
        assert!(proposal.withdraw().is_err());
    }

    #[test]
    fn editing_after_submission_fails() {
        let mut proposal = proposal();
        proposal.update_data(json!({ "title": "Updated" })).unwrap();
        proposal.submit().unwrap();
        assert!(proposal.update_data(json!({ "title": "Too late" })).is_err());
    }
}
