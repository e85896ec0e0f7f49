//! Decision-process schema dialects: classification, validation, and
//! config extraction.

mod config;
mod dialects;
mod registry;

pub use config::{
    InstanceVotingOverrides, ProcessSchemaInput, ProposalConfig, ValidationReport, VotingConfig,
    DEFAULT_MAX_VOTES_PER_MEMBER,
};
pub use dialects::{AdvancedSchemaHandler, DefaultSchemaHandler, SimpleSchemaHandler};
pub use registry::{ProcessedSchema, SchemaHandler, SchemaKind, SchemaRegistry, UNKNOWN_SCHEMA_TYPE};
