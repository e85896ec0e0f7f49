//! Typed view over proposal/rubric template documents.
//!
//! Templates are JSON-Schema documents with two vendor extensions: a
//! root-level `x-field-order` array and a per-property `x-format`
//! string. Both are optional and modeled explicitly here instead of
//! being looked up stringly at render time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

/// Rendering format of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldFormat {
    ShortText,
    LongText,
    Dropdown,
}

impl FieldFormat {
    /// The wire name of this format.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldFormat::ShortText => "short-text",
            FieldFormat::LongText => "long-text",
            FieldFormat::Dropdown => "dropdown",
        }
    }
}

impl Default for FieldFormat {
    fn default() -> Self {
        FieldFormat::ShortText
    }
}

impl fmt::Display for FieldFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for FieldFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldFormat {
    /// Total: unrecognized or non-string extension values fall back to
    /// the short-text default rather than failing the whole template.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(match value.as_str() {
            Some("long-text") => FieldFormat::LongText,
            Some("dropdown") => FieldFormat::Dropdown,
            _ => FieldFormat::ShortText,
        })
    }
}

/// One property of a template, with its format extension lifted out.
///
/// `schema` keeps the remaining JSON-Schema keys (type, enum, maxLength,
/// ...) untouched for the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "x-format", default, skip_serializing_if = "Option::is_none")]
    pub format: Option<FieldFormat>,

    #[serde(flatten)]
    pub schema: Map<String, Value>,
}

impl PropertySchema {
    /// Parses a raw property value, degrading to an empty schema when
    /// the value is not an object.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// A proposal or rubric template document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Declared form fields, in declaration order.
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Explicit rendering order; keys not listed here follow in
    /// declaration order.
    #[serde(rename = "x-field-order", default, skip_serializing_if = "Vec::is_empty")]
    pub field_order: Vec<String>,

    /// Remaining root-level schema keys, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TemplateDocument {
    /// Parses a stored template, degrading to an empty document when
    /// the value is not an object.
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}
