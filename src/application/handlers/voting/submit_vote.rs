//! SubmitVoteHandler - Command handler for casting a member's ballot.
//!
//! A ballot is terminal: there is no editing or retraction, so the
//! handler's job is to refuse anything that would need undoing later.

use std::sync::Arc;

use crate::domain::foundation::{
    DomainError, ErrorCode, ProcessId, ProcessInstanceId, ProfileId, ProposalId, Timestamp,
    VoteSubmissionId,
};
use crate::domain::permissions::Capability;
use crate::domain::schema::{SchemaRegistry, ValidationReport};
use crate::domain::voting::{
    validate_selection, BallotSigner, SelectionValidation, SubmissionMetadata,
    VoteProposalSelection, VoteSubmission,
};
use crate::ports::{DecisionAccessChecker, ProcessRepository, ProposalReader, VoteRepository};

use super::context::{VotingContext, VotingContextError};

/// Command to cast a ballot.
#[derive(Debug, Clone)]
pub struct SubmitVoteCommand {
    pub process_instance_id: ProcessInstanceId,
    pub selected_proposal_ids: Vec<ProposalId>,
    pub profile_id: ProfileId,
    /// Client user agent, captured into the submission metadata.
    pub user_agent: Option<String>,
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitVoteResult {
    pub submission: VoteSubmission,
    pub selections: Vec<VoteProposalSelection>,
}

/// Error type for ballot submission.
#[derive(Debug, Clone)]
pub enum SubmitVoteError {
    /// Process instance not found.
    InstanceNotFound(ProcessInstanceId),
    /// Parent process not found.
    ProcessNotFound(ProcessId),
    /// The instance's current state id matches no state of the process.
    CurrentStateNotFound { state_id: String },
    /// The derived configuration failed schema validation.
    InvalidSchema(ValidationReport),
    /// The current phase does not accept ballots.
    VotingClosed,
    /// A ballot already exists for this member and instance.
    AlreadyVoted,
    /// The selection failed validation.
    InvalidSelection(SelectionValidation),
    /// Domain error (access denial, storage failure).
    Domain(DomainError),
}

impl std::fmt::Display for SubmitVoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitVoteError::InstanceNotFound(id) => {
                write!(f, "Process instance not found: {}", id)
            }
            SubmitVoteError::ProcessNotFound(id) => write!(f, "Process not found: {}", id),
            SubmitVoteError::CurrentStateNotFound { state_id } => {
                write!(f, "Current state not found: {}", state_id)
            }
            SubmitVoteError::InvalidSchema(_) => {
                write!(f, "Decision process configuration is invalid")
            }
            SubmitVoteError::VotingClosed => write!(f, "Voting is closed for the current phase"),
            SubmitVoteError::AlreadyVoted => {
                write!(f, "A ballot has already been submitted for this process instance")
            }
            SubmitVoteError::InvalidSelection(validation) => {
                write!(f, "Invalid selection: {}", validation.messages().join("; "))
            }
            SubmitVoteError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SubmitVoteError {}

impl From<DomainError> for SubmitVoteError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::AlreadyVoted => SubmitVoteError::AlreadyVoted,
            _ => SubmitVoteError::Domain(err),
        }
    }
}

impl From<VotingContextError> for SubmitVoteError {
    fn from(err: VotingContextError) -> Self {
        match err {
            VotingContextError::InstanceNotFound(id) => SubmitVoteError::InstanceNotFound(id),
            VotingContextError::ProcessNotFound(id) => SubmitVoteError::ProcessNotFound(id),
            VotingContextError::CurrentStateNotFound { state_id } => {
                SubmitVoteError::CurrentStateNotFound { state_id }
            }
            VotingContextError::InvalidSchema(report) => SubmitVoteError::InvalidSchema(report),
            VotingContextError::Domain(err) => err.into(),
        }
    }
}

/// Handler for casting ballots.
pub struct SubmitVoteHandler {
    process_repository: Arc<dyn ProcessRepository>,
    proposal_reader: Arc<dyn ProposalReader>,
    vote_repository: Arc<dyn VoteRepository>,
    access_checker: Arc<dyn DecisionAccessChecker>,
    schema_registry: Arc<SchemaRegistry>,
    signer: Arc<BallotSigner>,
}

impl SubmitVoteHandler {
    pub fn new(
        process_repository: Arc<dyn ProcessRepository>,
        proposal_reader: Arc<dyn ProposalReader>,
        vote_repository: Arc<dyn VoteRepository>,
        access_checker: Arc<dyn DecisionAccessChecker>,
        schema_registry: Arc<SchemaRegistry>,
        signer: Arc<BallotSigner>,
    ) -> Self {
        Self {
            process_repository,
            proposal_reader,
            vote_repository,
            access_checker,
            schema_registry,
            signer,
        }
    }

    pub async fn handle(&self, cmd: SubmitVoteCommand) -> Result<SubmitVoteResult, SubmitVoteError> {
        // 1-3. Resolve instance, process, current phase, voting config.
        let ctx = VotingContext::resolve(
            self.process_repository.as_ref(),
            self.schema_registry.as_ref(),
            &cmd.process_instance_id,
        )
        .await?;

        // Capability gate.
        self.access_checker
            .assert_access(&cmd.profile_id, &cmd.process_instance_id, &[Capability::Vote])
            .await
            .map_err(SubmitVoteError::Domain)?;

        // 4. The phase must accept ballots.
        if !ctx.voting_open() {
            return Err(SubmitVoteError::VotingClosed);
        }

        // 5. Friendly duplicate check; storage still owns the invariant.
        let existing = self
            .vote_repository
            .find_by_instance_and_profile(&cmd.process_instance_id, &cmd.profile_id)
            .await?;
        if existing.is_some() {
            return Err(SubmitVoteError::AlreadyVoted);
        }

        // 6. Validate the selection against the instance's proposals.
        let eligible = self
            .proposal_reader
            .vote_eligible_ids(&cmd.process_instance_id)
            .await?
            .into_iter()
            .collect();
        let validation = validate_selection(
            &cmd.selected_proposal_ids,
            &eligible,
            ctx.voting_config.max_votes_per_member,
        );
        if !validation.is_valid {
            return Err(SubmitVoteError::InvalidSelection(validation));
        }

        // 7. Sign the ballot.
        let timestamp = Timestamp::now();
        let signature = self
            .signer
            .sign(&cmd.selected_proposal_ids, &cmd.profile_id, timestamp);

        let submission = VoteSubmission::new(
            VoteSubmissionId::new(),
            cmd.process_instance_id,
            cmd.profile_id.clone(),
            ctx.schema_type.clone(),
            SubmissionMetadata {
                timestamp,
                user_agent: cmd.user_agent.clone(),
            },
            signature,
            None,
        );
        let selections = submission.selections_for(&cmd.selected_proposal_ids);

        // 8. One atomic write for the ballot and its selections.
        self.vote_repository
            .record_ballot(&submission, &selections)
            .await?;

        tracing::debug!(
            instance = %cmd.process_instance_id,
            profile = %cmd.profile_id,
            selections = selections.len(),
            "ballot recorded"
        );

        Ok(SubmitVoteResult {
            submission,
            selections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryVoteStore, StaticAccessChecker};
    use crate::application::handlers::voting::fixtures::{registry, signer, VotingFixture};
    use crate::domain::foundation::ErrorCategory;

    fn handler(fixture: &VotingFixture, vote_store: Arc<InMemoryVoteStore>) -> SubmitVoteHandler {
        SubmitVoteHandler::new(
            fixture.process_store.clone(),
            fixture.proposal_store.clone(),
            vote_store,
            Arc::new(StaticAccessChecker::allow_all()),
            registry(),
            signer(),
        )
    }

    fn command(fixture: &VotingFixture, selected: Vec<ProposalId>) -> SubmitVoteCommand {
        SubmitVoteCommand {
            process_instance_id: fixture.instance_id,
            selected_proposal_ids: selected,
            profile_id: fixture.voter.clone(),
            user_agent: Some("test-agent".to_string()),
        }
    }

    #[tokio::test]
    async fn records_ballot_when_voting_is_open() {
        let fixture = VotingFixture::in_state("voting", None, 3);
        let vote_store = Arc::new(InMemoryVoteStore::new());
        let handler = handler(&fixture, vote_store.clone());

        let selected = fixture.proposals[..2].to_vec();
        let result = handler.handle(command(&fixture, selected.clone())).await.unwrap();

        assert_eq!(result.selections.len(), 2);
        assert_eq!(result.submission.vote_data().schema_type, "default");
        assert!(!result.submission.signature().is_empty());

        let stored = vote_store.submissions();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].submitted_by_profile_id(), &fixture.voter);
        assert_eq!(vote_store.selections().len(), 2);
    }

    #[tokio::test]
    async fn ballot_signature_verifies_against_the_selection() {
        let fixture = VotingFixture::in_state("voting", None, 2);
        let vote_store = Arc::new(InMemoryVoteStore::new());
        let handler = handler(&fixture, vote_store);

        let selected = fixture.proposals.clone();
        let result = handler.handle(command(&fixture, selected.clone())).await.unwrap();

        let verified = signer().verify(
            &selected,
            &fixture.voter,
            result.submission.vote_data().submission_metadata.timestamp,
            result.submission.signature(),
        );
        assert!(verified);
    }

    #[tokio::test]
    async fn second_ballot_for_same_member_conflicts() {
        let fixture = VotingFixture::in_state("voting", None, 3);
        let vote_store = Arc::new(InMemoryVoteStore::new());
        let handler = handler(&fixture, vote_store.clone());

        handler
            .handle(command(&fixture, fixture.proposals[..1].to_vec()))
            .await
            .unwrap();
        let second = handler
            .handle(command(&fixture, fixture.proposals[1..2].to_vec()))
            .await;

        assert!(matches!(second, Err(SubmitVoteError::AlreadyVoted)));
        assert_eq!(vote_store.submissions().len(), 1);
    }

    #[tokio::test]
    async fn storage_conflict_still_surfaces_as_already_voted() {
        // Two racing requests: the pre-check passes for both, the
        // constraint catches the loser.
        let fixture = VotingFixture::in_state("voting", None, 2);
        let vote_store = Arc::new(InMemoryVoteStore::new());

        let racing = fixture.ballot_for(&fixture.proposals[..1]);
        vote_store
            .record_ballot(&racing, &racing.selections_for(&fixture.proposals[..1]))
            .await
            .unwrap();

        // The handler's own pre-check would catch this; call the
        // repository path directly to model the race window.
        let late = fixture.ballot_for(&fixture.proposals[1..2]);
        let err = vote_store
            .record_ballot(&late, &late.selections_for(&fixture.proposals[1..2]))
            .await
            .unwrap_err();

        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(matches!(
            SubmitVoteError::from(err),
            SubmitVoteError::AlreadyVoted
        ));
    }

    #[tokio::test]
    async fn rejects_ballot_when_phase_disallows_decisions() {
        let fixture = VotingFixture::in_state("submission", None, 2);
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let result = handler
            .handle(command(&fixture, fixture.proposals[..1].to_vec()))
            .await;
        assert!(matches!(result, Err(SubmitVoteError::VotingClosed)));
    }

    #[tokio::test]
    async fn rejects_selection_over_the_member_limit() {
        let fixture = VotingFixture::in_state("voting", Some(3), 4);
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let result = handler
            .handle(command(&fixture, fixture.proposals.clone()))
            .await;

        match result {
            Err(SubmitVoteError::InvalidSelection(validation)) => {
                assert!(validation
                    .messages()
                    .iter()
                    .any(|m| m.contains("maximum of 3")));
            }
            other => panic!("Expected InvalidSelection, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn rejects_proposal_from_another_instance() {
        let fixture = VotingFixture::in_state("voting", None, 1);
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let foreign = ProposalId::new();
        let result = handler
            .handle(command(&fixture, vec![fixture.proposals[0], foreign]))
            .await;

        assert!(matches!(result, Err(SubmitVoteError::InvalidSelection(_))));
    }

    #[tokio::test]
    async fn rejects_duplicate_proposal_in_selection() {
        let fixture = VotingFixture::in_state("voting", None, 1);
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let result = handler
            .handle(command(
                &fixture,
                vec![fixture.proposals[0], fixture.proposals[0]],
            ))
            .await;

        assert!(matches!(result, Err(SubmitVoteError::InvalidSelection(_))));
    }

    #[tokio::test]
    async fn draft_proposals_are_not_eligible() {
        let fixture = VotingFixture::in_state("voting", None, 1);
        let draft_id = fixture.add_draft_proposal();
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let result = handler.handle(command(&fixture, vec![draft_id])).await;
        assert!(matches!(result, Err(SubmitVoteError::InvalidSelection(_))));
    }

    #[tokio::test]
    async fn fails_when_instance_is_missing() {
        let fixture = VotingFixture::in_state("voting", None, 1);
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let mut cmd = command(&fixture, vec![]);
        cmd.process_instance_id = ProcessInstanceId::new();

        let result = handler.handle(cmd).await;
        assert!(matches!(result, Err(SubmitVoteError::InstanceNotFound(_))));
    }

    #[tokio::test]
    async fn fails_when_current_state_is_unknown() {
        let fixture = VotingFixture::in_state("ghost", None, 1);
        let handler = handler(&fixture, Arc::new(InMemoryVoteStore::new()));

        let result = handler.handle(command(&fixture, vec![])).await;
        match result {
            Err(SubmitVoteError::CurrentStateNotFound { state_id }) => {
                assert_eq!(state_id, "ghost");
            }
            other => panic!("Expected CurrentStateNotFound, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn missing_vote_capability_is_denied() {
        let fixture = VotingFixture::in_state("voting", None, 1);
        let handler = SubmitVoteHandler::new(
            fixture.process_store.clone(),
            fixture.proposal_store.clone(),
            Arc::new(InMemoryVoteStore::new()),
            Arc::new(StaticAccessChecker::deny_all()),
            registry(),
            signer(),
        );

        let result = handler
            .handle(command(&fixture, fixture.proposals.clone()))
            .await;
        match result {
            Err(SubmitVoteError::Domain(err)) => {
                assert_eq!(err.category(), ErrorCategory::Unauthorized);
            }
            other => panic!("Expected access denial, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn failed_selection_write_leaves_no_ballot_behind() {
        let fixture = VotingFixture::in_state("voting", None, 2);
        let vote_store = Arc::new(InMemoryVoteStore::failing_selection_insert());
        let handler = handler(&fixture, vote_store.clone());

        let result = handler
            .handle(command(&fixture, fixture.proposals.clone()))
            .await;

        assert!(matches!(result, Err(SubmitVoteError::Domain(_))));
        assert!(vote_store.submissions().is_empty());
        assert!(vote_store.selections().is_empty());
    }
}
