//! Template compilation into renderable field descriptors.
//!
//! The compiler is deterministic and pure with respect to its input so
//! it can run on every render and inside tests without touching the
//! network or the database.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashSet;

use super::document::{FieldFormat, PropertySchema, TemplateDocument};

/// Keys the platform treats as system-managed on proposal forms.
pub static SYSTEM_FIELD_KEYS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["title"]));

/// System fields a proposal template must declare.
pub const REQUIRED_SYSTEM_FIELDS: [&str; 1] = ["title"];

/// Compiled form field, the only shape the renderer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub key: String,
    pub format: FieldFormat,
    pub is_system: bool,
    pub schema: PropertySchema,
}

#[derive(Clone, Copy, PartialEq)]
enum TemplateVariant {
    Proposal,
    Rubric,
}

/// Compiles a proposal template.
///
/// A missing required system field is diagnosed but non-fatal; the
/// compiled output proceeds with whatever properties exist.
pub fn compile_proposal_template(template: &TemplateDocument) -> Vec<FieldDescriptor> {
    for key in REQUIRED_SYSTEM_FIELDS {
        if !template.properties.contains_key(key) {
            tracing::warn!(field = key, "proposal template is missing a system field");
        }
    }
    compile(template, TemplateVariant::Proposal)
}

/// Compiles a rubric template. Rubrics have no system fields.
pub fn compile_rubric_template(template: &TemplateDocument) -> Vec<FieldDescriptor> {
    compile(template, TemplateVariant::Rubric)
}

fn compile(template: &TemplateDocument, variant: TemplateVariant) -> Vec<FieldDescriptor> {
    ordered_keys(template)
        .into_iter()
        .map(|key| {
            let property = PropertySchema::from_value(&template.properties[&key]);
            FieldDescriptor {
                format: property.format.unwrap_or_default(),
                is_system: variant == TemplateVariant::Proposal
                    && SYSTEM_FIELD_KEYS.contains(key.as_str()),
                schema: property,
                key,
            }
        })
        .collect()
}

/// Rendering order: explicit `x-field-order` entries that exist in
/// `properties` first, then every remaining property in declaration
/// order. Each declared property appears exactly once.
fn ordered_keys(template: &TemplateDocument) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut keys = Vec::with_capacity(template.properties.len());

    for key in &template.field_order {
        if template.properties.contains_key(key) && seen.insert(key.as_str()) {
            keys.push(key.clone());
        }
    }

    for key in template.properties.keys() {
        if seen.insert(key.as_str()) {
            keys.push(key.clone());
        }
    }

    keys
}
