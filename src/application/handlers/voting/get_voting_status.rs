//! GetVotingStatusHandler - Read-only voting state for one viewer.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ProcessId, ProcessInstanceId, ProfileId};
use crate::domain::permissions::Capability;
use crate::domain::process::StateDefinition;
use crate::domain::schema::{SchemaRegistry, ValidationReport};
use crate::ports::{DecisionAccessChecker, ProcessRepository, ProposalReader, VoteRepository};

use super::context::{VotingContext, VotingContextError};

/// Query for a viewer's voting status in one process instance.
#[derive(Debug, Clone)]
pub struct GetVotingStatusQuery {
    pub process_instance_id: ProcessInstanceId,
    pub profile_id: ProfileId,
}

/// What the voting UI needs to render itself.
#[derive(Debug, Clone)]
pub struct VotingStatus {
    /// Whether the current phase accepts ballots.
    pub voting_open: bool,
    /// Whether the viewer already submitted a ballot.
    pub has_voted: bool,
    /// Whether the UI should render read-only (already voted, or the
    /// phase is closed).
    pub read_only: bool,
    pub max_votes_per_member: u32,
    pub eligible_proposal_count: usize,
    pub current_state: StateDefinition,
    /// Scheduled phases still ahead, in process order.
    pub upcoming_states: Vec<StateDefinition>,
}

/// Error type for the status query.
#[derive(Debug, Clone)]
pub enum GetVotingStatusError {
    InstanceNotFound(ProcessInstanceId),
    ProcessNotFound(ProcessId),
    CurrentStateNotFound { state_id: String },
    InvalidSchema(ValidationReport),
    Domain(DomainError),
}

impl std::fmt::Display for GetVotingStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetVotingStatusError::InstanceNotFound(id) => {
                write!(f, "Process instance not found: {}", id)
            }
            GetVotingStatusError::ProcessNotFound(id) => write!(f, "Process not found: {}", id),
            GetVotingStatusError::CurrentStateNotFound { state_id } => {
                write!(f, "Current state not found: {}", state_id)
            }
            GetVotingStatusError::InvalidSchema(_) => {
                write!(f, "Decision process configuration is invalid")
            }
            GetVotingStatusError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GetVotingStatusError {}

impl From<DomainError> for GetVotingStatusError {
    fn from(err: DomainError) -> Self {
        GetVotingStatusError::Domain(err)
    }
}

impl From<VotingContextError> for GetVotingStatusError {
    fn from(err: VotingContextError) -> Self {
        match err {
            VotingContextError::InstanceNotFound(id) => GetVotingStatusError::InstanceNotFound(id),
            VotingContextError::ProcessNotFound(id) => GetVotingStatusError::ProcessNotFound(id),
            VotingContextError::CurrentStateNotFound { state_id } => {
                GetVotingStatusError::CurrentStateNotFound { state_id }
            }
            VotingContextError::InvalidSchema(report) => {
                GetVotingStatusError::InvalidSchema(report)
            }
            VotingContextError::Domain(err) => GetVotingStatusError::Domain(err),
        }
    }
}

/// Handler for the voting status query. Never mutates.
pub struct GetVotingStatusHandler {
    process_repository: Arc<dyn ProcessRepository>,
    proposal_reader: Arc<dyn ProposalReader>,
    vote_repository: Arc<dyn VoteRepository>,
    access_checker: Arc<dyn DecisionAccessChecker>,
    schema_registry: Arc<SchemaRegistry>,
}

impl GetVotingStatusHandler {
    pub fn new(
        process_repository: Arc<dyn ProcessRepository>,
        proposal_reader: Arc<dyn ProposalReader>,
        vote_repository: Arc<dyn VoteRepository>,
        access_checker: Arc<dyn DecisionAccessChecker>,
        schema_registry: Arc<SchemaRegistry>,
    ) -> Self {
        Self {
            process_repository,
            proposal_reader,
            vote_repository,
            access_checker,
            schema_registry,
        }
    }

    pub async fn handle(
        &self,
        query: GetVotingStatusQuery,
    ) -> Result<VotingStatus, GetVotingStatusError> {
        let ctx = VotingContext::resolve(
            self.process_repository.as_ref(),
            self.schema_registry.as_ref(),
            &query.process_instance_id,
        )
        .await?;

        self.access_checker
            .assert_access(
                &query.profile_id,
                &query.process_instance_id,
                &[Capability::Read],
            )
            .await?;

        let has_voted = self
            .vote_repository
            .find_by_instance_and_profile(&query.process_instance_id, &query.profile_id)
            .await?
            .is_some();

        let eligible = self
            .proposal_reader
            .vote_eligible_ids(&query.process_instance_id)
            .await?;

        let voting_open = ctx.voting_open();
        Ok(VotingStatus {
            voting_open,
            has_voted,
            read_only: has_voted || !voting_open,
            max_votes_per_member: ctx.voting_config.max_votes_per_member,
            eligible_proposal_count: eligible.len(),
            upcoming_states: ctx.upcoming_states(),
            current_state: ctx.current_state,
        })
    }
}
