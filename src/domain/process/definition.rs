//! Decision process aggregate: the reusable phase schema an
//! organization launches instances from.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{OrganizationId, ProcessId, Timestamp, ValidationError};

use super::state::StateDefinition;

/// Maximum length for a process name.
pub const MAX_NAME_LENGTH: usize = 200;

/// The phase schema attached to a process definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSchema {
    /// Dialect name fed into schema detection.
    pub schema_type: String,

    /// Ordered phases; array order is the canonical sequence.
    pub states: Vec<StateDefinition>,
}

impl ProcessSchema {
    /// The first phase, where new instances start.
    pub fn initial_state(&self) -> Option<&StateDefinition> {
        self.states.first()
    }
}

/// A reusable decision process definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionProcess {
    id: ProcessId,
    organization_id: OrganizationId,
    name: String,
    description: Option<String>,
    process_schema: ProcessSchema,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl DecisionProcess {
    /// Creates a new process definition.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the name is empty
    /// - `OutOfRange` if the name exceeds [`MAX_NAME_LENGTH`]
    /// - `EmptyField` if the schema declares no states
    pub fn new(
        id: ProcessId,
        organization_id: OrganizationId,
        name: String,
        process_schema: ProcessSchema,
    ) -> Result<Self, ValidationError> {
        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_NAME_LENGTH as i64,
                name.len() as i64,
            ));
        }
        if process_schema.states.is_empty() {
            return Err(ValidationError::empty_field("states"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            organization_id,
            name,
            description: None,
            process_schema,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute from persistence (no validation).
    pub fn reconstitute(
        id: ProcessId,
        organization_id: OrganizationId,
        name: String,
        description: Option<String>,
        process_schema: ProcessSchema,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            organization_id,
            name,
            description,
            process_schema,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &ProcessId {
        &self.id
    }

    pub fn organization_id(&self) -> &OrganizationId {
        &self.organization_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn process_schema(&self) -> &ProcessSchema {
        &self.process_schema
    }

    /// The ordered phases of this process.
    pub fn states(&self) -> &[StateDefinition] {
        &self.process_schema.states
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
        self.updated_at = Timestamp::now();
    }
}
