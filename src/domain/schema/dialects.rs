//! The three built-in schema dialects.
//!
//! A dialect is recognized two ways: by an explicit `schemaType` field,
//! or by its type predicate when the field is absent. `simple` is the
//! bare capability pair, `default` additionally carries base
//! `votingConfig`/`proposalConfig` sections, and `advanced` layers
//! `advancedVotingConfig`/`advancedProposalConfig` overrides on top.

use serde_json::{Map, Value};

use super::config::{ProposalConfig, VotingConfig, DEFAULT_MAX_VOTES_PER_MEMBER};
use super::registry::{SchemaHandler, SchemaKind};

/// Field always present on a compiled proposal form.
const BASE_REQUIRED_FIELDS: [&str; 1] = ["title"];

fn as_object(data: &Value) -> Option<&Map<String, Value>> {
    data.as_object()
}

fn section<'a>(data: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    as_object(data)?.get(key)?.as_object()
}

fn has_base_shape(data: &Value) -> bool {
    match as_object(data) {
        Some(obj) => {
            obj.get("allowProposals").map(Value::is_boolean) == Some(true)
                && obj.get("allowDecisions").map(Value::is_boolean) == Some(true)
        }
        None => false,
    }
}

fn has_advanced_sections(data: &Value) -> bool {
    section(data, "advancedVotingConfig").is_some()
        || section(data, "advancedProposalConfig").is_some()
}

fn has_base_sections(data: &Value) -> bool {
    section(data, "votingConfig").is_some() || section(data, "proposalConfig").is_some()
}

fn allow_decisions(data: &Value) -> bool {
    as_object(data)
        .and_then(|obj| obj.get("allowDecisions"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

fn instance_max_votes(data: &Value) -> u32 {
    section(data, "instanceData")
        .and_then(|inst| inst.get("maxVotesPerMember"))
        .and_then(Value::as_u64)
        .map(|n| n as u32)
        .unwrap_or(DEFAULT_MAX_VOTES_PER_MEMBER)
}

/// Shallow merge: every key of `overlay` wins over `base`.
fn merge_shallow(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        base.insert(key.clone(), value.clone());
    }
}

/// Set union keeping first-seen order, deduplicated.
fn union_fields(base: Vec<String>, extra: &[String]) -> Vec<String> {
    let mut merged = base;
    for field in extra {
        if !merged.iter().any(|f| f == field) {
            merged.push(field.clone());
        }
    }
    merged
}

fn string_list(section: &Map<String, Value>, key: &str) -> Vec<String> {
    section
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn base_voting_config(data: &Value) -> VotingConfig {
    VotingConfig {
        allow_decisions: allow_decisions(data),
        max_votes_per_member: instance_max_votes(data),
        additional_config: section(data, "votingConfig").cloned(),
    }
}

fn base_proposal_config(data: &Value) -> ProposalConfig {
    let base = section(data, "proposalConfig");

    let required = base
        .map(|s| string_list(s, "requiredFields"))
        .filter(|fields| !fields.is_empty())
        .unwrap_or_else(|| BASE_REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect());
    let optional = base.map(|s| string_list(s, "optionalFields")).unwrap_or_default();
    let constraints = base
        .and_then(|s| s.get("fieldConstraints"))
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    ProposalConfig {
        required_fields: required,
        optional_fields: optional,
        field_constraints: constraints,
    }
}

/// Baseline dialect; also the fallback for unrecognized schema types.
pub struct DefaultSchemaHandler;

impl SchemaHandler for DefaultSchemaHandler {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Default
    }

    fn matches(&self, data: &Value) -> bool {
        has_base_shape(data)
    }

    fn extract_voting_config(&self, data: &Value) -> VotingConfig {
        base_voting_config(data)
    }

    fn extract_proposal_config(&self, data: &Value) -> ProposalConfig {
        base_proposal_config(data)
    }
}

/// Minimal dialect: the capability pair plus instance overrides, nothing
/// else.
pub struct SimpleSchemaHandler;

impl SchemaHandler for SimpleSchemaHandler {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Simple
    }

    fn matches(&self, data: &Value) -> bool {
        has_base_shape(data) && !has_base_sections(data) && !has_advanced_sections(data)
    }

    fn accepts(&self, data: &Value) -> bool {
        has_base_shape(data)
    }

    fn extract_voting_config(&self, data: &Value) -> VotingConfig {
        VotingConfig {
            additional_config: None,
            ..base_voting_config(data)
        }
    }

    fn extract_proposal_config(&self, _data: &Value) -> ProposalConfig {
        ProposalConfig {
            required_fields: BASE_REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            optional_fields: Vec::new(),
            field_constraints: Map::new(),
        }
    }
}

/// Dialect with per-organization overrides layered on the base config.
pub struct AdvancedSchemaHandler;

impl SchemaHandler for AdvancedSchemaHandler {
    fn kind(&self) -> SchemaKind {
        SchemaKind::Advanced
    }

    fn matches(&self, data: &Value) -> bool {
        has_base_shape(data) && has_advanced_sections(data)
    }

    fn accepts(&self, data: &Value) -> bool {
        has_base_shape(data)
    }

    fn extract_voting_config(&self, data: &Value) -> VotingConfig {
        let mut config = base_voting_config(data);

        if let Some(overrides) = section(data, "advancedVotingConfig") {
            let mut merged = config.additional_config.take().unwrap_or_default();
            merge_shallow(&mut merged, overrides);
            config.additional_config = Some(merged);
        }

        config
    }

    fn extract_proposal_config(&self, data: &Value) -> ProposalConfig {
        let mut config = base_proposal_config(data);

        if let Some(overrides) = section(data, "advancedProposalConfig") {
            config.required_fields =
                union_fields(config.required_fields, &string_list(overrides, "requiredFields"));
            config.optional_fields =
                union_fields(config.optional_fields, &string_list(overrides, "optionalFields"));
            if let Some(constraints) = overrides.get("fieldConstraints").and_then(Value::as_object) {
                merge_shallow(&mut config.field_constraints, constraints);
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_payload() -> Value {
        json!({
            "allowProposals": true,
            "allowDecisions": true,
            "instanceData": { "maxVotesPerMember": 4 }
        })
    }

    #[test]
    fn simple_matches_bare_capability_pair() {
        assert!(SimpleSchemaHandler.matches(&base_payload()));
        assert!(DefaultSchemaHandler.matches(&base_payload()));
        assert!(!AdvancedSchemaHandler.matches(&base_payload()));
    }

    #[test]
    fn simple_rejects_payload_with_config_sections() {
        let mut payload = base_payload();
        payload["votingConfig"] = json!({ "quorum": 10 });
        assert!(!SimpleSchemaHandler.matches(&payload));
        assert!(DefaultSchemaHandler.matches(&payload));
    }

    #[test]
    fn advanced_inference_requires_an_advanced_section() {
        let mut payload = base_payload();
        payload["advancedVotingConfig"] = json!({ "weighting": "quadratic" });
        assert!(AdvancedSchemaHandler.matches(&payload));
    }

    #[test]
    fn advanced_accepts_base_shape_without_override_sections() {
        assert!(AdvancedSchemaHandler.accepts(&base_payload()));
        assert!(SimpleSchemaHandler.accepts(&base_payload()));
    }

    #[test]
    fn predicates_reject_non_objects_and_missing_booleans() {
        assert!(!DefaultSchemaHandler.matches(&json!("nope")));
        assert!(!DefaultSchemaHandler.matches(&json!({ "allowProposals": true })));
        assert!(!DefaultSchemaHandler.matches(&json!({
            "allowProposals": "yes",
            "allowDecisions": true
        })));
    }

    #[test]
    fn voting_config_reads_instance_override() {
        let config = DefaultSchemaHandler.extract_voting_config(&base_payload());
        assert!(config.allow_decisions);
        assert_eq!(config.max_votes_per_member, 4);
    }

    #[test]
    fn voting_config_falls_back_to_canonical_default() {
        let payload = json!({ "allowProposals": false, "allowDecisions": false });
        let config = SimpleSchemaHandler.extract_voting_config(&payload);
        assert_eq!(config.max_votes_per_member, DEFAULT_MAX_VOTES_PER_MEMBER);
        assert!(!config.allow_decisions);
    }

    #[test]
    fn advanced_voting_overrides_win_on_merge() {
        let mut payload = base_payload();
        payload["votingConfig"] = json!({ "quorum": 10, "weighting": "linear" });
        payload["advancedVotingConfig"] = json!({ "weighting": "quadratic" });

        let config = AdvancedSchemaHandler.extract_voting_config(&payload);
        let extra = config.additional_config.unwrap();
        assert_eq!(extra["quorum"], 10);
        assert_eq!(extra["weighting"], "quadratic");
    }

    #[test]
    fn proposal_config_defaults_to_title_required() {
        let config = SimpleSchemaHandler.extract_proposal_config(&base_payload());
        assert_eq!(config.required_fields, ["title"]);
        assert!(config.optional_fields.is_empty());
        assert!(config.field_constraints.is_empty());
    }

    #[test]
    fn advanced_proposal_fields_union_as_deduplicated_sets() {
        let mut payload = base_payload();
        payload["proposalConfig"] = json!({
            "requiredFields": ["title", "budget"],
            "optionalFields": ["attachments"]
        });
        payload["advancedProposalConfig"] = json!({
            "requiredFields": ["budget", "timeline"],
            "optionalFields": ["attachments", "links"]
        });

        let config = AdvancedSchemaHandler.extract_proposal_config(&payload);
        assert_eq!(config.required_fields, ["title", "budget", "timeline"]);
        assert_eq!(config.optional_fields, ["attachments", "links"]);
    }

    #[test]
    fn advanced_constraints_merge_shallow_with_dialect_winning() {
        let mut payload = base_payload();
        payload["proposalConfig"] = json!({
            "fieldConstraints": { "title": { "maxLength": 80 }, "budget": { "min": 0 } }
        });
        payload["advancedProposalConfig"] = json!({
            "fieldConstraints": { "title": { "maxLength": 120 } }
        });

        let config = AdvancedSchemaHandler.extract_proposal_config(&payload);
        assert_eq!(config.field_constraints["title"]["maxLength"], 120);
        assert_eq!(config.field_constraints["budget"]["min"], 0);
    }
}
