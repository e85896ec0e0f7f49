//! Shared test fixtures for the voting handlers.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;

use crate::adapters::memory::{InMemoryProcessStore, InMemoryProposalStore};
use crate::adapters::validation::ProcessConfigValidator;
use crate::domain::foundation::{
    OrganizationId, ProcessId, ProcessInstanceId, ProfileId, ProposalId, Timestamp,
    VoteSubmissionId,
};
use crate::domain::process::{
    DecisionProcess, InstanceData, InstanceStatus, PhaseSchedule, ProcessInstance, ProcessSchema,
    Proposal, StateConfig, StateDefinition,
};
use crate::domain::schema::SchemaRegistry;
use crate::domain::voting::{BallotSigner, SubmissionMetadata, VoteSubmission};

pub(crate) fn registry() -> Arc<SchemaRegistry> {
    Arc::new(SchemaRegistry::new(Arc::new(ProcessConfigValidator::new())))
}

pub(crate) fn signer() -> Arc<BallotSigner> {
    Arc::new(BallotSigner::unkeyed())
}

fn state(
    id: &str,
    allow_proposals: bool,
    allow_decisions: bool,
    start_date: Option<&str>,
) -> StateDefinition {
    StateDefinition {
        id: id.to_string(),
        name: id.to_string(),
        description: None,
        config: StateConfig {
            allow_proposals,
            allow_decisions,
        },
        phase: start_date.map(|date| PhaseSchedule {
            start_date: Some(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            end_date: None,
        }),
    }
}

/// A seeded three-phase process with one instance and its proposals.
pub(crate) struct VotingFixture {
    pub process_store: Arc<InMemoryProcessStore>,
    pub proposal_store: Arc<InMemoryProposalStore>,
    pub process_id: ProcessId,
    pub instance_id: ProcessInstanceId,
    pub proposals: Vec<ProposalId>,
    pub voter: ProfileId,
}

impl VotingFixture {
    /// Builds a fixture whose instance sits in `state_id`, with
    /// `proposal_count` submitted proposals.
    pub fn in_state(
        state_id: &str,
        max_votes_per_member: Option<u32>,
        proposal_count: usize,
    ) -> Self {
        let process = DecisionProcess::new(
            ProcessId::new(),
            OrganizationId::new(),
            "Participatory budget".to_string(),
            ProcessSchema {
                schema_type: "default".to_string(),
                states: vec![
                    state("submission", true, false, Some("2026-05-01")),
                    state("voting", false, true, Some("2026-06-01")),
                    state("results", false, false, None),
                ],
            },
        )
        .unwrap();

        let instance = ProcessInstance::reconstitute(
            ProcessInstanceId::new(),
            *process.id(),
            ProfileId::new("owner").unwrap(),
            ProfileId::new("instance-identity").unwrap(),
            InstanceData {
                current_state_id: state_id.to_string(),
                max_votes_per_member,
            },
            InstanceStatus::Active,
            0,
            Timestamp::now(),
            Timestamp::now(),
        );

        let process_store = Arc::new(InMemoryProcessStore::new());
        let proposal_store = Arc::new(InMemoryProposalStore::new());
        let process_id = *process.id();
        let instance_id = *instance.id();
        process_store.insert_process(process);
        process_store.insert_instance(instance);

        let mut proposals = Vec::with_capacity(proposal_count);
        for n in 0..proposal_count {
            let mut proposal = Proposal::draft(
                ProposalId::new(),
                instance_id,
                ProfileId::new(format!("proposer-{}", n)).unwrap(),
                json!({ "title": format!("Proposal {}", n) }),
            );
            proposal.submit().unwrap();
            proposals.push(*proposal.id());
            proposal_store.insert(proposal);
        }

        Self {
            process_store,
            proposal_store,
            process_id,
            instance_id,
            proposals,
            voter: ProfileId::new("member-1").unwrap(),
        }
    }

    /// Adds a draft (not yet eligible) proposal to the instance.
    pub fn add_draft_proposal(&self) -> ProposalId {
        let proposal = Proposal::draft(
            ProposalId::new(),
            self.instance_id,
            ProfileId::new("proposer-draft").unwrap(),
            json!({ "title": "Still a draft" }),
        );
        let id = *proposal.id();
        self.proposal_store.insert(proposal);
        id
    }

    /// A ballot for the fixture's voter, bypassing the handler.
    pub fn ballot_for(&self, selected: &[ProposalId]) -> VoteSubmission {
        let timestamp = Timestamp::now();
        VoteSubmission::new(
            VoteSubmissionId::new(),
            self.instance_id,
            self.voter.clone(),
            "default".to_string(),
            SubmissionMetadata {
                timestamp,
                user_agent: None,
            },
            signer().sign(selected, &self.voter, timestamp),
            None,
        )
    }
}
