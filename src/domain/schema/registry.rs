//! Schema registry: dialect classification and config extraction.
//!
//! The platform historically resolved dialects through a string-keyed
//! handler map mutated at import time. Here the dialect set is a closed
//! sum type dispatched by `match`, and the registry is an explicit
//! object built once at startup and injected into the services that
//! need it. Adding a dialect means adding a variant, which the compiler
//! then enforces exhaustively.

use std::sync::Arc;

use serde_json::Value;

use crate::ports::ConfigStructureValidator;

use super::config::{ProposalConfig, ValidationReport, VotingConfig};
use super::dialects::{AdvancedSchemaHandler, DefaultSchemaHandler, SimpleSchemaHandler};

/// Reported type when neither an explicit field nor any predicate
/// identifies the payload.
pub const UNKNOWN_SCHEMA_TYPE: &str = "unknown";

/// The closed set of schema dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Default,
    Simple,
    Advanced,
}

impl SchemaKind {
    /// Predicate evaluation order for inference: most specific first,
    /// so a payload satisfying both `advanced` and `simple` infers as
    /// `advanced`.
    pub const DETECTION_ORDER: [SchemaKind; 3] =
        [SchemaKind::Advanced, SchemaKind::Simple, SchemaKind::Default];

    /// The wire name of this dialect.
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaKind::Default => "default",
            SchemaKind::Simple => "simple",
            SchemaKind::Advanced => "advanced",
        }
    }

    /// Resolves a wire name to a dialect, if it is one we know.
    pub fn from_type_name(name: &str) -> Option<SchemaKind> {
        match name {
            "default" => Some(SchemaKind::Default),
            "simple" => Some(SchemaKind::Simple),
            "advanced" => Some(SchemaKind::Advanced),
            _ => None,
        }
    }
}

/// One dialect's classification and extraction behavior.
pub trait SchemaHandler: Send + Sync {
    /// The dialect this handler implements.
    fn kind(&self) -> SchemaKind;

    /// Inference predicate: does this payload unambiguously look like
    /// this dialect? Used only when no explicit `schemaType` is given.
    fn matches(&self, data: &Value) -> bool;

    /// Acceptance predicate: is this payload valid as this dialect?
    ///
    /// Broader than [`matches`](Self::matches): dialect override
    /// sections are optional at runtime, so a payload carrying only the
    /// base shape is acceptable to every dialect.
    fn accepts(&self, data: &Value) -> bool {
        self.matches(data)
    }

    /// Derives the voting configuration from a matching payload.
    fn extract_voting_config(&self, data: &Value) -> VotingConfig;

    /// Derives the proposal form configuration from a matching payload.
    fn extract_proposal_config(&self, data: &Value) -> ProposalConfig;
}

/// Outcome of classifying and validating a configuration blob.
///
/// Malformed input is reported here, never panicked on; the caller
/// decides whether invalidity is fatal.
#[derive(Debug, Clone)]
pub struct ProcessedSchema {
    /// The detected type name, verbatim when explicit.
    pub schema_type: String,
    pub is_valid: bool,
    pub validation: ValidationReport,
    pub voting_config: Option<VotingConfig>,
    pub proposal_config: Option<ProposalConfig>,
}

impl ProcessedSchema {
    fn invalid(schema_type: String, validation: ValidationReport) -> Self {
        Self {
            schema_type,
            is_valid: false,
            validation,
            voting_config: None,
            proposal_config: None,
        }
    }
}

/// Dialect registry, read-only after construction.
pub struct SchemaRegistry {
    structure_validator: Arc<dyn ConfigStructureValidator>,
    default_handler: DefaultSchemaHandler,
    simple_handler: SimpleSchemaHandler,
    advanced_handler: AdvancedSchemaHandler,
}

impl SchemaRegistry {
    /// Builds the registry with the given structural validator.
    pub fn new(structure_validator: Arc<dyn ConfigStructureValidator>) -> Self {
        Self {
            structure_validator,
            default_handler: DefaultSchemaHandler,
            simple_handler: SimpleSchemaHandler,
            advanced_handler: AdvancedSchemaHandler,
        }
    }

    fn handler_for(&self, kind: SchemaKind) -> &dyn SchemaHandler {
        match kind {
            SchemaKind::Default => &self.default_handler,
            SchemaKind::Simple => &self.simple_handler,
            SchemaKind::Advanced => &self.advanced_handler,
        }
    }

    /// Classifies a payload.
    ///
    /// An explicit `schemaType` field wins verbatim, with no validation
    /// at this step; otherwise each dialect's predicate is tried most
    /// specific first. Returns [`UNKNOWN_SCHEMA_TYPE`] when nothing
    /// matches.
    pub fn detect_schema_type(&self, data: &Value) -> String {
        if let Some(explicit) = data.get("schemaType").and_then(Value::as_str) {
            return explicit.to_string();
        }

        for kind in SchemaKind::DETECTION_ORDER {
            if self.handler_for(kind).matches(data) {
                return kind.as_str().to_string();
            }
        }

        UNKNOWN_SCHEMA_TYPE.to_string()
    }

    /// Classifies, validates, and extracts configuration from a payload.
    ///
    /// Unrecognized type names fall back to the default dialect. Both the
    /// structural pass and the dialect predicate must pass before any
    /// extraction happens.
    pub fn process_schema(&self, data: &Value) -> ProcessedSchema {
        let schema_type = self.detect_schema_type(data);
        let kind = SchemaKind::from_type_name(&schema_type).unwrap_or(SchemaKind::Default);
        let handler = self.handler_for(kind);

        let mut validation = self.structure_validator.validate_structure(data);
        if validation.is_valid() && !handler.accepts(data) {
            validation.add_error(
                "schemaType",
                format!(
                    "configuration does not satisfy the '{}' dialect",
                    handler.kind().as_str()
                ),
            );
        }

        if !validation.is_valid() {
            tracing::debug!(schema_type = %schema_type, "schema validation failed");
            return ProcessedSchema::invalid(schema_type, validation);
        }

        ProcessedSchema {
            schema_type,
            is_valid: true,
            validation,
            voting_config: Some(handler.extract_voting_config(data)),
            proposal_config: Some(handler.extract_proposal_config(data)),
        }
    }
}
