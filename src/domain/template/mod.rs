//! Proposal and rubric template compilation.

mod compiler;
mod document;

pub use compiler::{
    compile_proposal_template, compile_rubric_template, FieldDescriptor, REQUIRED_SYSTEM_FIELDS,
    SYSTEM_FIELD_KEYS,
};
pub use document::{FieldFormat, PropertySchema, TemplateDocument};
