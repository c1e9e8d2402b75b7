//! Raw text to document tree.
//!
//! Both JSON and YAML land in the same `serde_json::Value` tree. Object keys
//! keep document order (`preserve_order`), which the operation enumerator
//! relies on.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ParseError;

/// Concrete serialization of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Yaml => f.write_str("YAML"),
        }
    }
}

/// Format declared by whoever fetched the text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatHint {
    /// Sniff the first non-whitespace character.
    #[default]
    Auto,
    Json,
    Yaml,
}

impl FormatHint {
    /// Pick a concrete format for `input`.
    pub fn detect(self, input: &str) -> DocumentFormat {
        match self {
            Self::Json => DocumentFormat::Json,
            Self::Yaml => DocumentFormat::Yaml,
            Self::Auto => match input.trim_start().chars().next() {
                Some('{') | Some('[') => DocumentFormat::Json,
                _ => DocumentFormat::Yaml,
            },
        }
    }
}

impl FromStr for FormatHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("unknown document format: {other}")),
        }
    }
}

/// Parse raw text into a document tree.
///
/// The root must be an object; anything else cannot describe operations.
pub fn parse_document(input: &str, hint: FormatHint) -> Result<Value, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let root: Value = match hint.detect(input) {
        DocumentFormat::Json => serde_json::from_str(input).map_err(ParseError::from_json)?,
        DocumentFormat::Yaml => serde_yaml::from_str(input).map_err(ParseError::from_yaml)?,
    };

    if !root.is_object() {
        return Err(ParseError::NotAnObject(kind_of(&root)));
    }

    Ok(root)
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
