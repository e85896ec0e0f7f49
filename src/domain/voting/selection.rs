//! Ballot selection validation.

use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::domain::foundation::ProposalId;

/// Field key selection errors are reported under.
const SELECTION_FIELD: &str = "proposalIds";

/// Structured validation outcome for a proposed selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionValidation {
    pub is_valid: bool,
    /// Field name to error messages, so the UI can attach them.
    pub errors: BTreeMap<String, Vec<String>>,
}

impl SelectionValidation {
    fn valid() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }

    fn add_error(&mut self, message: String) {
        self.is_valid = false;
        self.errors
            .entry(SELECTION_FIELD.to_string())
            .or_default()
            .push(message);
    }

    /// All messages recorded against the selection field.
    pub fn messages(&self) -> &[String] {
        self.errors
            .get(SELECTION_FIELD)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Validates a member's selection against the instance's eligible
/// proposals and the voting limit.
///
/// A single bad id rejects the whole submission; nothing is silently
/// dropped.
pub fn validate_selection(
    selected: &[ProposalId],
    eligible: &HashSet<ProposalId>,
    max_votes_per_member: u32,
) -> SelectionValidation {
    let mut result = SelectionValidation::valid();

    let mut seen: HashSet<&ProposalId> = HashSet::with_capacity(selected.len());
    for id in selected {
        if !seen.insert(id) {
            result.add_error(format!("Proposal {} is selected more than once", id));
        }
    }

    if selected.len() as u64 > max_votes_per_member as u64 {
        result.add_error(format!(
            "Selection exceeds the maximum of {} votes per member",
            max_votes_per_member
        ));
    }

    for id in selected {
        if !eligible.contains(id) {
            result.add_error(format!(
                "Proposal {} does not belong to this process instance",
                id
            ));
        }
    }

    result
}
