//! Ballot value objects: the persisted vote submission and its
//! proposal-selection join rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{
    ProcessInstanceId, ProfileId, ProposalId, Timestamp, VoteSubmissionId,
};

/// Version tag written into every ballot's vote data.
pub const VOTE_SCHEMA_VERSION: &str = "1.0";

/// Client context captured at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionMetadata {
    pub timestamp: Timestamp,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// Structured payload stored with each ballot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteData {
    pub schema_version: String,
    pub schema_type: String,
    pub submission_metadata: SubmissionMetadata,
    pub validation_signature: String,
}

/// One member's final, immutable ballot for a process instance.
///
/// At most one exists per (instance, profile); the storage layer backs
/// this with a unique constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteSubmission {
    id: VoteSubmissionId,
    process_instance_id: ProcessInstanceId,
    submitted_by_profile_id: ProfileId,
    vote_data: VoteData,
    custom_data: Option<Value>,
    /// Mirrors `vote_data.validation_signature` for indexed audits.
    signature: String,
    created_at: Timestamp,
}

impl VoteSubmission {
    /// Creates a ballot record.
    pub fn new(
        id: VoteSubmissionId,
        process_instance_id: ProcessInstanceId,
        submitted_by_profile_id: ProfileId,
        schema_type: String,
        metadata: SubmissionMetadata,
        validation_signature: String,
        custom_data: Option<Value>,
    ) -> Self {
        let created_at = metadata.timestamp;
        Self {
            id,
            process_instance_id,
            submitted_by_profile_id,
            vote_data: VoteData {
                schema_version: VOTE_SCHEMA_VERSION.to_string(),
                schema_type,
                submission_metadata: metadata,
                validation_signature: validation_signature.clone(),
            },
            custom_data,
            signature: validation_signature,
            created_at,
        }
    }

    /// Reconstitute from persistence (no validation).
    pub fn reconstitute(
        id: VoteSubmissionId,
        process_instance_id: ProcessInstanceId,
        submitted_by_profile_id: ProfileId,
        vote_data: VoteData,
        custom_data: Option<Value>,
        signature: String,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            process_instance_id,
            submitted_by_profile_id,
            vote_data,
            custom_data,
            signature,
            created_at,
        }
    }

    pub fn id(&self) -> &VoteSubmissionId {
        &self.id
    }

    pub fn process_instance_id(&self) -> &ProcessInstanceId {
        &self.process_instance_id
    }

    pub fn submitted_by_profile_id(&self) -> &ProfileId {
        &self.submitted_by_profile_id
    }

    pub fn vote_data(&self) -> &VoteData {
        &self.vote_data
    }

    pub fn custom_data(&self) -> Option<&Value> {
        self.custom_data.as_ref()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Builds the join rows for the selected proposals.
    pub fn selections_for(&self, proposal_ids: &[ProposalId]) -> Vec<VoteProposalSelection> {
        proposal_ids
            .iter()
            .map(|proposal_id| VoteProposalSelection {
                vote_submission_id: self.id,
                proposal_id: *proposal_id,
            })
            .collect()
    }
}

/// Join row: one selected proposal on one ballot.
///
/// Only ever written inside the same transaction as its parent
/// submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteProposalSelection {
    pub vote_submission_id: VoteSubmissionId,
    pub proposal_id: ProposalId,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission() -> VoteSubmission {
        VoteSubmission::new(
            VoteSubmissionId::new(),
            ProcessInstanceId::new(),
            ProfileId::new("member-1").unwrap(),
            "default".to_string(),
            SubmissionMetadata {
                timestamp: Timestamp::from_unix_secs(1_750_000_000),
                user_agent: Some("integration-test".to_string()),
            },
            "sig-abc".to_string(),
            None,
        )
    }

    #[test]
    fn signature_column_mirrors_vote_data() {
        let ballot = submission();
        assert_eq!(ballot.signature(), "sig-abc");
        assert_eq!(ballot.vote_data().validation_signature, "sig-abc");
        assert_eq!(ballot.vote_data().schema_version, VOTE_SCHEMA_VERSION);
    }

    #[test]
    fn created_at_matches_submission_metadata() {
        let ballot = submission();
        assert_eq!(
            ballot.created_at(),
            ballot.vote_data().submission_metadata.timestamp
        );
    }

    #[test]
    fn selections_reference_the_parent_ballot() {
        let ballot = submission();
        let ids = [ProposalId::new(), ProposalId::new()];
        let selections = ballot.selections_for(&ids);

        assert_eq!(selections.len(), 2);
        assert!(selections
            .iter()
            .all(|s| s.vote_submission_id == *ballot.id()));
        assert_eq!(selections[0].proposal_id, ids[0]);
    }

    #[test]
    fn vote_data_serializes_with_platform_field_names() {
        let ballot = submission();
        let json = serde_json::to_value(ballot.vote_data()).unwrap();
        assert_eq!(json["schemaVersion"], VOTE_SCHEMA_VERSION);
        assert_eq!(json["submissionMetadata"]["userAgent"], "integration-test");
        assert_eq!(json["validationSignature"], "sig-abc");
    }
}
