//! Process repository port.
//!
//! Persistence contract for process definitions and their running
//! instances.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProcessId, ProcessInstanceId};
use crate::domain::process::{DecisionProcess, ProcessInstance};

/// Repository port for processes and process instances.
#[async_trait]
pub trait ProcessRepository: Send + Sync {
    /// Find a process definition by id.
    ///
    /// Returns `None` if not found.
    async fn find_process(&self, id: &ProcessId) -> Result<Option<DecisionProcess>, DomainError>;

    /// Find a process instance by id.
    ///
    /// Returns `None` if not found.
    async fn find_instance(
        &self,
        id: &ProcessInstanceId,
    ) -> Result<Option<ProcessInstance>, DomainError>;

    /// Persist a changed instance (state transition, override, cancel).
    ///
    /// # Errors
    ///
    /// - `ProcessInstanceNotFound` if the instance doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update_instance(&self, instance: &ProcessInstance) -> Result<(), DomainError>;

    /// Remove an instance outright (hard cancellation of an untouched
    /// instance).
    ///
    /// # Errors
    ///
    /// - `ProcessInstanceNotFound` if the instance doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn delete_instance(&self, id: &ProcessInstanceId) -> Result<(), DomainError>;
}
