//! Process instance aggregate: one running execution of a process.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, ProcessId, ProcessInstanceId, ProfileId, Timestamp,
};

use super::definition::DecisionProcess;

/// Per-instance mutable data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData {
    /// Which phase the instance is currently in.
    pub current_state_id: String,

    /// Instance-level override of the voting limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_votes_per_member: Option<u32>,
}

/// Lifecycle status of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Active,
    Cancelled,
}

/// How a cancellation request was resolved.
///
/// Instances that already moved through phases keep their row for the
/// audit trail; untouched instances can be removed outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationOutcome {
    SoftCancelled,
    HardDelete,
}

/// One running execution of a decision process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessInstance {
    id: ProcessInstanceId,
    process_id: ProcessId,
    /// Profile that launched the instance.
    owner_profile_id: ProfileId,
    /// The instance's own identity profile on the platform.
    profile_id: ProfileId,
    instance_data: InstanceData,
    status: InstanceStatus,
    transition_count: u32,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl ProcessInstance {
    /// Launches a new instance in the process's initial state.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the process schema has no states
    pub fn launch(
        id: ProcessInstanceId,
        process: &DecisionProcess,
        owner_profile_id: ProfileId,
        profile_id: ProfileId,
    ) -> Result<Self, DomainError> {
        let initial = process
            .process_schema()
            .initial_state()
            .ok_or_else(|| {
                DomainError::new(ErrorCode::ValidationFailed, "Process schema has no states")
            })?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            process_id: *process.id(),
            owner_profile_id,
            profile_id,
            instance_data: InstanceData {
                current_state_id: initial.id.clone(),
                max_votes_per_member: None,
            },
            status: InstanceStatus::Active,
            transition_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: ProcessInstanceId,
        process_id: ProcessId,
        owner_profile_id: ProfileId,
        profile_id: ProfileId,
        instance_data: InstanceData,
        status: InstanceStatus,
        transition_count: u32,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            process_id,
            owner_profile_id,
            profile_id,
            instance_data,
            status,
            transition_count,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &ProcessInstanceId {
        &self.id
    }

    pub fn process_id(&self) -> &ProcessId {
        &self.process_id
    }

    pub fn owner_profile_id(&self) -> &ProfileId {
        &self.owner_profile_id
    }

    pub fn profile_id(&self) -> &ProfileId {
        &self.profile_id
    }

    pub fn instance_data(&self) -> &InstanceData {
        &self.instance_data
    }

    pub fn status(&self) -> InstanceStatus {
        self.status
    }

    pub fn transition_count(&self) -> u32 {
        self.transition_count
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// The id of the phase the instance is currently in.
    pub fn current_state_id(&self) -> &str {
        &self.instance_data.current_state_id
    }

    /// Whether the instance has ever moved past its initial state.
    pub fn has_transition_history(&self) -> bool {
        self.transition_count > 0
    }

    /// Sets the instance-level voting limit override.
    pub fn set_max_votes_per_member(&mut self, max: Option<u32>) {
        self.instance_data.max_votes_per_member = max;
        self.updated_at = Timestamp::now();
    }

    /// Moves the instance to another phase of its process.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the instance is cancelled
    /// - `StateNotFound` if the target id is not in the process schema
    pub fn transition_to(
        &mut self,
        process: &DecisionProcess,
        state_id: &str,
    ) -> Result<(), DomainError> {
        if self.status == InstanceStatus::Cancelled {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Cancelled instances cannot change state",
            ));
        }
        if !process.states().iter().any(|s| s.id == state_id) {
            return Err(DomainError::new(
                ErrorCode::StateNotFound,
                format!("State '{}' is not part of this process", state_id),
            )
            .with_detail("stateId", state_id));
        }

        self.instance_data.current_state_id = state_id.to_string();
        self.transition_count += 1;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Cancels the instance.
    ///
    /// Returns [`CancellationOutcome::HardDelete`] when no transition
    /// has ever happened, in which case the caller removes the row;
    /// otherwise the instance is soft-cancelled in place.
    pub fn cancel(&mut self) -> CancellationOutcome {
        if self.has_transition_history() {
            self.status = InstanceStatus::Cancelled;
            self.updated_at = Timestamp::now();
            CancellationOutcome::SoftCancelled
        } else {
            CancellationOutcome::HardDelete
        }
    }
}
