//! In-memory process store for tests and local development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, ProcessId, ProcessInstanceId};
use crate::domain::process::{DecisionProcess, ProcessInstance};
use crate::ports::ProcessRepository;

/// In-memory implementation of [`ProcessRepository`].
#[derive(Default)]
pub struct InMemoryProcessStore {
    processes: Mutex<HashMap<ProcessId, DecisionProcess>>,
    instances: Mutex<HashMap<ProcessInstanceId, ProcessInstance>>,
}

impl InMemoryProcessStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a process definition.
    pub fn insert_process(&self, process: DecisionProcess) {
        self.processes
            .lock()
            .unwrap()
            .insert(*process.id(), process);
    }

    /// Seeds a process instance.
    pub fn insert_instance(&self, instance: ProcessInstance) {
        self.instances
            .lock()
            .unwrap()
            .insert(*instance.id(), instance);
    }
}

#[async_trait]
impl ProcessRepository for InMemoryProcessStore {
    async fn find_process(&self, id: &ProcessId) -> Result<Option<DecisionProcess>, DomainError> {
        Ok(self.processes.lock().unwrap().get(id).cloned())
    }

    async fn find_instance(
        &self,
        id: &ProcessInstanceId,
    ) -> Result<Option<ProcessInstance>, DomainError> {
        Ok(self.instances.lock().unwrap().get(id).cloned())
    }

    async fn update_instance(&self, instance: &ProcessInstance) -> Result<(), DomainError> {
        let mut instances = self.instances.lock().unwrap();
        if !instances.contains_key(instance.id()) {
            return Err(DomainError::new(
                ErrorCode::ProcessInstanceNotFound,
                format!("Process instance not found: {}", instance.id()),
            ));
        }
        instances.insert(*instance.id(), instance.clone());
        Ok(())
    }

    async fn delete_instance(&self, id: &ProcessInstanceId) -> Result<(), DomainError> {
        let mut instances = self.instances.lock().unwrap();
        if instances.remove(id).is_none() {
            return Err(DomainError::new(
                ErrorCode::ProcessInstanceNotFound,
                format!("Process instance not found: {}", id),
            ));
        }
        Ok(())
    }
}
