//! Manual structural validation of decision-process configurations.
//!
//! Validates the known configuration shape without an external schema
//! engine. Every problem lands in the report keyed by field; nothing
//! panics on malformed input.

use serde_json::{Map, Value};

use crate::domain::schema::ValidationReport;
use crate::ports::ConfigStructureValidator;

/// Built-in [`ConfigStructureValidator`].
///
/// # Thread Safety
///
/// Stateless; `Send + Sync` and shareable across threads.
#[derive(Default)]
pub struct ProcessConfigValidator;

impl ProcessConfigValidator {
    pub fn new() -> Self {
        Self
    }

    fn check_required_bool(obj: &Map<String, Value>, field: &str, report: &mut ValidationReport) {
        match obj.get(field) {
            None => report.add_error(field, "is required"),
            Some(value) if !value.is_boolean() => report.add_error(field, "must be a boolean"),
            Some(_) => {}
        }
    }

    fn check_optional_object(obj: &Map<String, Value>, field: &str, report: &mut ValidationReport) {
        if let Some(value) = obj.get(field) {
            if !value.is_object() {
                report.add_error(field, "must be an object");
            }
        }
    }

    fn check_string_array(
        section: &Map<String, Value>,
        section_name: &str,
        field: &str,
        report: &mut ValidationReport,
    ) {
        let Some(value) = section.get(field) else {
            return;
        };
        let path = format!("{}.{}", section_name, field);
        match value.as_array() {
            None => report.add_error(path, "must be an array"),
            Some(items) if items.iter().any(|item| !item.is_string()) => {
                report.add_error(path, "must contain only strings");
            }
            Some(_) => {}
        }
    }

    fn check_proposal_section(
        obj: &Map<String, Value>,
        section_name: &str,
        report: &mut ValidationReport,
    ) {
        let Some(section) = obj.get(section_name).and_then(Value::as_object) else {
            return;
        };
        Self::check_string_array(section, section_name, "requiredFields", report);
        Self::check_string_array(section, section_name, "optionalFields", report);
        if let Some(constraints) = section.get("fieldConstraints") {
            if !constraints.is_object() {
                report.add_error(format!("{}.fieldConstraints", section_name), "must be an object");
            }
        }
    }
}

impl ConfigStructureValidator for ProcessConfigValidator {
    fn validate_structure(&self, data: &Value) -> ValidationReport {
        let mut report = ValidationReport::valid();

        let Some(obj) = data.as_object() else {
            report.add_error("root", "configuration must be a JSON object");
            return report;
        };

        Self::check_required_bool(obj, "allowProposals", &mut report);
        Self::check_required_bool(obj, "allowDecisions", &mut report);

        if let Some(schema_type) = obj.get("schemaType") {
            if !schema_type.is_string() {
                report.add_error("schemaType", "must be a string");
            }
        }

        Self::check_optional_object(obj, "instanceData", &mut report);
        if let Some(instance) = obj.get("instanceData").and_then(Value::as_object) {
            if let Some(max) = instance.get("maxVotesPerMember") {
                match max.as_u64() {
                    Some(n) if n >= 1 => {}
                    _ => report.add_error(
                        "instanceData.maxVotesPerMember",
                        "must be a positive integer",
                    ),
                }
            }
        }

        Self::check_optional_object(obj, "votingConfig", &mut report);
        Self::check_optional_object(obj, "advancedVotingConfig", &mut report);
        Self::check_optional_object(obj, "proposalConfig", &mut report);
        Self::check_optional_object(obj, "advancedProposalConfig", &mut report);
        Self::check_proposal_section(obj, "proposalConfig", &mut report);
        Self::check_proposal_section(obj, "advancedProposalConfig", &mut report);

        report
    }
}
