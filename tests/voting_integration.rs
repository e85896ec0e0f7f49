//! End-to-end voting flow over the in-memory adapters.
//!
//! Drives the handlers the way a router would: launch a process,
//! submit proposals, open voting, cast ballots, and read status back.

use std::sync::Arc;

use serde_json::json;

use commonground::adapters::memory::{
    InMemoryProcessStore, InMemoryProposalStore, InMemoryVoteStore, StaticAccessChecker,
};
use commonground::adapters::validation::ProcessConfigValidator;
use commonground::application::handlers::voting::{
    GetVotingStatusHandler, GetVotingStatusQuery, SubmitVoteCommand, SubmitVoteError,
    SubmitVoteHandler, ValidateVoteSelectionHandler, ValidateVoteSelectionQuery,
};
use commonground::domain::foundation::{
    OrganizationId, ProcessId, ProcessInstanceId, ProfileId, ProposalId,
};
use commonground::domain::process::{
    DecisionProcess, ProcessInstance, ProcessSchema, Proposal, StateConfig, StateDefinition,
};
use commonground::domain::schema::SchemaRegistry;
use commonground::domain::voting::BallotSigner;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init()
        .ok();
}

struct TestPlatform {
    process_store: Arc<InMemoryProcessStore>,
    proposal_store: Arc<InMemoryProposalStore>,
    vote_store: Arc<InMemoryVoteStore>,
    registry: Arc<SchemaRegistry>,
    instance_id: ProcessInstanceId,
}

impl TestPlatform {
    /// A three-phase grantmaking process whose instance has been moved
    /// into the voting phase, with `proposal_count` submitted proposals.
    fn with_open_voting(proposal_count: usize) -> (Self, Vec<ProposalId>) {
        init_tracing();

        let state = |id: &str, proposals: bool, decisions: bool| StateDefinition {
            id: id.to_string(),
            name: id.to_string(),
            description: None,
            config: StateConfig {
                allow_proposals: proposals,
                allow_decisions: decisions,
            },
            phase: None,
        };

        let process = DecisionProcess::new(
            ProcessId::new(),
            OrganizationId::new(),
            "Neighborhood grants 2026".to_string(),
            ProcessSchema {
                schema_type: "default".to_string(),
                states: vec![
                    state("submission", true, false),
                    state("voting", false, true),
                    state("results", false, false),
                ],
            },
        )
        .unwrap();

        let mut instance = ProcessInstance::launch(
            ProcessInstanceId::new(),
            &process,
            ProfileId::new("org-admin").unwrap(),
            ProfileId::new("grants-2026").unwrap(),
        )
        .unwrap();
        instance.transition_to(&process, "voting").unwrap();

        let process_store = Arc::new(InMemoryProcessStore::new());
        let proposal_store = Arc::new(InMemoryProposalStore::new());
        let instance_id = *instance.id();
        process_store.insert_process(process);
        process_store.insert_instance(instance);

        let mut proposal_ids = Vec::new();
        for n in 0..proposal_count {
            let mut proposal = Proposal::draft(
                ProposalId::new(),
                instance_id,
                ProfileId::new(format!("member-{}", n)).unwrap(),
                json!({ "title": format!("Project {}", n), "budget": 1000 * (n + 1) }),
            );
            proposal.submit().unwrap();
            proposal_ids.push(*proposal.id());
            proposal_store.insert(proposal);
        }

        let platform = Self {
            process_store,
            proposal_store,
            vote_store: Arc::new(InMemoryVoteStore::new()),
            registry: Arc::new(SchemaRegistry::new(Arc::new(ProcessConfigValidator::new()))),
            instance_id,
        };
        (platform, proposal_ids)
    }

    fn submit_handler(&self) -> SubmitVoteHandler {
        SubmitVoteHandler::new(
            self.process_store.clone(),
            self.proposal_store.clone(),
            self.vote_store.clone(),
            Arc::new(StaticAccessChecker::allow_all()),
            self.registry.clone(),
            Arc::new(BallotSigner::unkeyed()),
        )
    }

    fn status_handler(&self) -> GetVotingStatusHandler {
        GetVotingStatusHandler::new(
            self.process_store.clone(),
            self.proposal_store.clone(),
            self.vote_store.clone(),
            Arc::new(StaticAccessChecker::allow_all()),
            self.registry.clone(),
        )
    }

    fn dry_run_handler(&self) -> ValidateVoteSelectionHandler {
        ValidateVoteSelectionHandler::new(
            self.process_store.clone(),
            self.proposal_store.clone(),
            self.vote_store.clone(),
            Arc::new(StaticAccessChecker::allow_all()),
            self.registry.clone(),
        )
    }

    fn command(&self, voter: &str, selected: Vec<ProposalId>) -> SubmitVoteCommand {
        SubmitVoteCommand {
            process_instance_id: self.instance_id,
            selected_proposal_ids: selected,
            profile_id: ProfileId::new(voter).unwrap(),
            user_agent: Some("integration-suite".to_string()),
        }
    }
}

#[tokio::test]
async fn full_voting_flow_records_one_ballot_per_member() {
    let (platform, proposals) = TestPlatform::with_open_voting(4);
    let handler = platform.submit_handler();

    // The dry run approves the planned selection.
    let validation = platform
        .dry_run_handler()
        .handle(ValidateVoteSelectionQuery {
            process_instance_id: platform.instance_id,
            selected_proposal_ids: proposals[..2].to_vec(),
            profile_id: ProfileId::new("voter-a").unwrap(),
        })
        .await
        .unwrap();
    assert!(validation.is_valid);

    // Two members cast ballots.
    handler
        .handle(platform.command("voter-a", proposals[..2].to_vec()))
        .await
        .unwrap();
    handler
        .handle(platform.command("voter-b", proposals[1..4].to_vec()))
        .await
        .unwrap();

    assert_eq!(platform.vote_store.submissions().len(), 2);
    assert_eq!(platform.vote_store.selections().len(), 5);

    // The first member's view is now read-only.
    let status = platform
        .status_handler()
        .handle(GetVotingStatusQuery {
            process_instance_id: platform.instance_id,
            profile_id: ProfileId::new("voter-a").unwrap(),
        })
        .await
        .unwrap();
    assert!(status.has_voted);
    assert!(status.read_only);
    assert_eq!(status.eligible_proposal_count, 4);
}

#[tokio::test]
async fn a_member_cannot_vote_twice() {
    let (platform, proposals) = TestPlatform::with_open_voting(3);
    let handler = platform.submit_handler();

    handler
        .handle(platform.command("voter-a", proposals[..1].to_vec()))
        .await
        .unwrap();

    let second = handler
        .handle(platform.command("voter-a", proposals[1..2].to_vec()))
        .await;
    assert!(matches!(second, Err(SubmitVoteError::AlreadyVoted)));

    assert_eq!(platform.vote_store.submissions().len(), 1);
    assert_eq!(platform.vote_store.selections().len(), 1);
}

#[tokio::test]
async fn over_limit_ballot_is_rejected_whole() {
    let (platform, proposals) = TestPlatform::with_open_voting(4);
    let handler = platform.submit_handler();

    // Default limit is 3; four selections must not partially apply.
    let result = handler.handle(platform.command("voter-a", proposals)).await;
    assert!(matches!(result, Err(SubmitVoteError::InvalidSelection(_))));
    assert!(platform.vote_store.submissions().is_empty());
}

#[tokio::test]
async fn ballots_only_reference_own_instance_proposals() {
    let (platform, mut proposals) = TestPlatform::with_open_voting(1);
    let (_other_platform, other_proposals) = TestPlatform::with_open_voting(1);
    proposals.extend(other_proposals);

    let result = platform
        .submit_handler()
        .handle(platform.command("voter-a", proposals))
        .await;
    assert!(matches!(result, Err(SubmitVoteError::InvalidSelection(_))));
}

#[tokio::test]
async fn interrupted_ballot_write_is_invisible() {
    let (platform, proposals) = TestPlatform::with_open_voting(2);
    let failing_store = Arc::new(InMemoryVoteStore::failing_selection_insert());

    let failing = SubmitVoteHandler::new(
        platform.process_store.clone(),
        platform.proposal_store.clone(),
        failing_store.clone(),
        Arc::new(StaticAccessChecker::allow_all()),
        platform.registry.clone(),
        Arc::new(BallotSigner::unkeyed()),
    );

    let result = failing
        .handle(platform.command("voter-a", proposals))
        .await;
    assert!(result.is_err());
    assert!(failing_store.submissions().is_empty());
    assert!(failing_store.selections().is_empty());

    // Status over the same store still reads as "not voted".
    let status = GetVotingStatusHandler::new(
        platform.process_store.clone(),
        platform.proposal_store.clone(),
        failing_store,
        Arc::new(StaticAccessChecker::allow_all()),
        platform.registry.clone(),
    )
    .handle(GetVotingStatusQuery {
        process_instance_id: platform.instance_id,
        profile_id: ProfileId::new("voter-a").unwrap(),
    })
    .await
    .unwrap();
    assert!(!status.has_voted);
}
