//! ValidateVoteSelectionHandler - Dry-run of a ballot submission.
//!
//! Runs the same checks as submission without writing anything, so the
//! UI can flag problems while the member is still choosing.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ProcessId, ProcessInstanceId, ProfileId, ProposalId};
use crate::domain::permissions::Capability;
use crate::domain::schema::{SchemaRegistry, ValidationReport};
use crate::domain::voting::{validate_selection, SelectionValidation};
use crate::ports::{DecisionAccessChecker, ProcessRepository, ProposalReader, VoteRepository};

use super::context::{VotingContext, VotingContextError};

/// Query describing the selection to validate.
#[derive(Debug, Clone)]
pub struct ValidateVoteSelectionQuery {
    pub process_instance_id: ProcessInstanceId,
    pub selected_proposal_ids: Vec<ProposalId>,
    pub profile_id: ProfileId,
}

/// Error type for the dry-run query.
#[derive(Debug, Clone)]
pub enum ValidateVoteSelectionError {
    InstanceNotFound(ProcessInstanceId),
    ProcessNotFound(ProcessId),
    CurrentStateNotFound { state_id: String },
    InvalidSchema(ValidationReport),
    Domain(DomainError),
}

impl std::fmt::Display for ValidateVoteSelectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidateVoteSelectionError::InstanceNotFound(id) => {
                write!(f, "Process instance not found: {}", id)
            }
            ValidateVoteSelectionError::ProcessNotFound(id) => {
                write!(f, "Process not found: {}", id)
            }
            ValidateVoteSelectionError::CurrentStateNotFound { state_id } => {
                write!(f, "Current state not found: {}", state_id)
            }
            ValidateVoteSelectionError::InvalidSchema(_) => {
                write!(f, "Decision process configuration is invalid")
            }
            ValidateVoteSelectionError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ValidateVoteSelectionError {}

impl From<DomainError> for ValidateVoteSelectionError {
    fn from(err: DomainError) -> Self {
        ValidateVoteSelectionError::Domain(err)
    }
}

impl From<VotingContextError> for ValidateVoteSelectionError {
    fn from(err: VotingContextError) -> Self {
        match err {
            VotingContextError::InstanceNotFound(id) => {
                ValidateVoteSelectionError::InstanceNotFound(id)
            }
            VotingContextError::ProcessNotFound(id) => {
                ValidateVoteSelectionError::ProcessNotFound(id)
            }
            VotingContextError::CurrentStateNotFound { state_id } => {
                ValidateVoteSelectionError::CurrentStateNotFound { state_id }
            }
            VotingContextError::InvalidSchema(report) => {
                ValidateVoteSelectionError::InvalidSchema(report)
            }
            VotingContextError::Domain(err) => ValidateVoteSelectionError::Domain(err),
        }
    }
}

/// Handler for the selection dry-run. Never mutates.
pub struct ValidateVoteSelectionHandler {
    process_repository: Arc<dyn ProcessRepository>,
    proposal_reader: Arc<dyn ProposalReader>,
    vote_repository: Arc<dyn VoteRepository>,
    access_checker: Arc<dyn DecisionAccessChecker>,
    schema_registry: Arc<SchemaRegistry>,
}

impl ValidateVoteSelectionHandler {
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
        query: ValidateVoteSelectionQuery,
    ) -> Result<SelectionValidation, ValidateVoteSelectionError> {
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

        let eligible = self
            .proposal_reader
            .vote_eligible_ids(&query.process_instance_id)
            .await?
            .into_iter()
            .collect();

        let mut validation = validate_selection(
            &query.selected_proposal_ids,
            &eligible,
            ctx.voting_config.max_votes_per_member,
        );

        if !ctx.voting_open() {
            validation.is_valid = false;
            validation
                .errors
                .entry("phase".to_string())
                .or_default()
                .push("Voting is closed for the current phase".to_string());
        }

        let already_voted = self
            .vote_repository
            .find_by_instance_and_profile(&query.process_instance_id, &query.profile_id)
            .await?
            .is_some();
        if already_voted {
            validation.is_valid = false;
            validation
                .errors
                .entry("ballot".to_string())
                .or_default()
                .push("A ballot has already been submitted".to_string());
        }

        Ok(validation)
    }
}
