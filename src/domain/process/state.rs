//! Process phase definitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One phase of a decision process.
///
/// The position of a state inside the process's `states` array is the
/// canonical phase ordering; there is no separate sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDefinition {
    /// Stable identifier referenced by `instanceData.currentStateId`.
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub config: StateConfig,

    /// Scheduled window, when the organization has planned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<PhaseSchedule>,
}

impl StateDefinition {
    /// Whether this phase has a scheduled start date.
    pub fn is_scheduled(&self) -> bool {
        self.phase
            .as_ref()
            .map(|p| p.start_date.is_some())
            .unwrap_or(false)
    }
}

/// Capabilities open during one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateConfig {
    pub allow_proposals: bool,
    pub allow_decisions: bool,
}

/// Scheduled calendar window of a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseSchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}
