//! Configuration structure validator port.
//!
//! The schema registry runs every decision-process configuration through
//! a structural validation pass that is independent of the dialect type
//! predicates. The pass is pluggable so a full JSON-Schema engine can be
//! swapped in; the built-in adapter validates the known shape manually.

use serde_json::Value;

use crate::domain::schema::ValidationReport;

/// Port for structural validation of raw configuration blobs.
///
/// Implementations never panic on malformed input: every problem is
/// reported through the returned [`ValidationReport`] keyed by field so
/// a UI can attach messages to the right input.
pub trait ConfigStructureValidator: Send + Sync {
    /// Validate the structure of a configuration document.
    fn validate_structure(&self, data: &Value) -> ValidationReport;
}
