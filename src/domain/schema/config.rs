//! Derived configuration values and validation reporting.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Canonical fallback when a process instance does not set its own
/// `maxVotesPerMember`. The platform historically used both 3 and 5;
/// 3 is the canonical value.
pub const DEFAULT_MAX_VOTES_PER_MEMBER: u32 = 3;

/// Voting configuration derived per schema dialect.
///
/// Never persisted; recomputed on every request from the process
/// configuration and the instance overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingConfig {
    /// Whether ballots are accepted in the current phase.
    pub allow_decisions: bool,

    /// Upper bound on proposals one member may select.
    pub max_votes_per_member: u32,

    /// Dialect-specific extras, passed through to the renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_config: Option<Map<String, Value>>,
}

/// Proposal form configuration derived per schema dialect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalConfig {
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub field_constraints: Map<String, Value>,
}

/// Structural validation outcome keyed by field name.
///
/// Field-level errors are a map rather than a flat list so the UI can
/// attach each message to the right input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    /// A report with no errors.
    pub fn valid() -> Self {
        Self::default()
    }

    /// Records one error against a field.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// True when no field has errors.
    pub fn is_valid(&self) -> bool {
        self.field_errors.is_empty()
    }

    /// The error map, field name to messages.
    pub fn field_errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.field_errors
    }

    /// Errors recorded against one field.
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.field_errors
            .get(field)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// The wire shape handlers feed into schema detection.
///
/// Built from the current state's capabilities and the instance's
/// voting overrides; field names match the surrounding platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSchemaInput {
    pub allow_proposals: bool,
    pub allow_decisions: bool,
    pub instance_data: InstanceVotingOverrides,
    pub schema_type: String,
}

/// Per-instance overrides carried inside the detection payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceVotingOverrides {
    pub max_votes_per_member: u32,
}

impl ProcessSchemaInput {
    /// Serializes the payload for the registry.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("detection payload is always serializable")
    }
}
