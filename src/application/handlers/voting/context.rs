//! Shared resolution steps for the voting handlers.
//!
//! Every voting operation starts the same way: load the instance and
//! its parent process, find the active phase, and derive the voting
//! config through the schema registry. The three handlers share that
//! prefix here and diverge afterwards.

use crate::domain::foundation::{DomainError, ProcessId, ProcessInstanceId};
use crate::domain::process::{resolver, DecisionProcess, ProcessInstance, StateDefinition};
use crate::domain::schema::{
    InstanceVotingOverrides, ProcessSchemaInput, SchemaRegistry, ValidationReport, VotingConfig,
    DEFAULT_MAX_VOTES_PER_MEMBER,
};
use crate::ports::ProcessRepository;

/// Resolved voting context for one process instance.
pub(crate) struct VotingContext {
    pub instance: ProcessInstance,
    pub process: DecisionProcess,
    pub current_state: StateDefinition,
    pub voting_config: VotingConfig,
    pub schema_type: String,
}

/// Failures shared by the voting handlers' resolution prefix.
#[derive(Debug, Clone)]
pub(crate) enum VotingContextError {
    InstanceNotFound(ProcessInstanceId),
    ProcessNotFound(ProcessId),
    CurrentStateNotFound { state_id: String },
    InvalidSchema(ValidationReport),
    Domain(DomainError),
}

impl VotingContext {
    /// Runs the shared resolution prefix.
    pub async fn resolve(
        process_repository: &dyn ProcessRepository,
        schema_registry: &SchemaRegistry,
        instance_id: &ProcessInstanceId,
    ) -> Result<Self, VotingContextError> {
        let instance = process_repository
            .find_instance(instance_id)
            .await
            .map_err(VotingContextError::Domain)?
            .ok_or(VotingContextError::InstanceNotFound(*instance_id))?;

        let process = process_repository
            .find_process(instance.process_id())
            .await
            .map_err(VotingContextError::Domain)?
            .ok_or(VotingContextError::ProcessNotFound(*instance.process_id()))?;

        let current_state = resolver::current_state(process.states(), instance.current_state_id())
            .cloned()
            .ok_or_else(|| VotingContextError::CurrentStateNotFound {
                state_id: instance.current_state_id().to_string(),
            })?;

        let max_votes = instance
            .instance_data()
            .max_votes_per_member
            .unwrap_or(DEFAULT_MAX_VOTES_PER_MEMBER);

        let detection_input = ProcessSchemaInput {
            allow_proposals: current_state.config.allow_proposals,
            allow_decisions: current_state.config.allow_decisions,
            instance_data: InstanceVotingOverrides {
                max_votes_per_member: max_votes,
            },
            schema_type: process.process_schema().schema_type.clone(),
        };

        let processed = schema_registry.process_schema(&detection_input.to_value());
        if !processed.is_valid {
            return Err(VotingContextError::InvalidSchema(processed.validation));
        }
        let voting_config = processed.voting_config.ok_or_else(|| {
            VotingContextError::Domain(DomainError::new(
                crate::domain::foundation::ErrorCode::InternalError,
                "Valid schema produced no voting config",
            ))
        })?;

        Ok(Self {
            instance,
            process,
            current_state,
            voting_config,
            schema_type: processed.schema_type,
        })
    }

    /// Whether ballots are accepted in the current phase.
    pub fn voting_open(&self) -> bool {
        self.voting_config.allow_decisions
    }

    /// The phases still ahead of the current one, for "what happens
    /// next" displays.
    pub fn upcoming_states(&self) -> Vec<StateDefinition> {
        resolver::next_steps(self.process.states(), self.instance.current_state_id())
            .into_iter()
            .cloned()
            .collect()
    }
}
