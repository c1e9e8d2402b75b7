//! Reversible `METHOD::path` identifiers.
//!
//! `GET /users/{id}/posts` encodes to `GET::users__---id__posts`:
//! path segments are joined with [`PATH_SEPARATOR`], parameter segments are
//! prefixed with [`PARAM_MARKER`], and the method is split off with
//! [`METHOD_DIVIDER`].
//!
//! Encoding drops every character outside `[A-Za-z0-9_-]`, so decoding is
//! only a left inverse of [`encode`]. Literal `__` inside a path segment (or
//! a run of three or more underscores, which is collapsed to two) decodes
//! as a segment boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::IdentifierFormatError;

/// Separates the method from the encoded path.
pub const METHOD_DIVIDER: &str = "::";

/// Replaces `/` between path segments.
pub const PATH_SEPARATOR: &str = "__";

/// Prefixes a `{name}` parameter segment.
pub const PARAM_MARKER: &str = "---";

/// A decoded identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedIdentifier {
    pub method: String,
    pub path: String,
}

/// Encode a method and a path template into an identifier.
pub fn encode(method: &str, path: &str) -> String {
    let encoded_path = path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_segment)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(PATH_SEPARATOR);

    let collapsed = collapse_underscores(&encoded_path);
    format!(
        "{}{}{}",
        method.to_uppercase(),
        METHOD_DIVIDER,
        trim_edges(&collapsed)
    )
}

/// Split an identifier back into method and path template.
pub fn decode(id: &str) -> Result<DecodedIdentifier, IdentifierFormatError> {
    let (method, encoded_path) = id
        .split_once(METHOD_DIVIDER)
        .ok_or_else(|| IdentifierFormatError::MissingDivider(id.to_string()))?;

    if method.is_empty() {
        return Err(IdentifierFormatError::EmptyMethod(id.to_string()));
    }

    Ok(DecodedIdentifier {
        method: method.to_string(),
        path: decode_path(encoded_path),
    })
}

/// Whether `id` decodes to an uppercase method and a non-empty path.
pub fn is_valid(id: &str) -> bool {
    match decode(id) {
        Ok(decoded) => is_method_token(&decoded.method) && !decoded.path.is_empty(),
        Err(_) => false,
    }
}

fn is_method_token(method: &str) -> bool {
    !method.is_empty() && method.chars().all(|c| c.is_ascii_uppercase())
}

fn encode_segment(segment: &str) -> String {
    match segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    {
        Some(name) if !name.is_empty() => format!("{PARAM_MARKER}{}", sanitize(name)),
        _ => sanitize(segment),
    }
}

fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Collapse runs of three or more underscores to exactly two.
fn collapse_underscores(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0;
    for ch in text.chars() {
        if ch == '_' {
            run += 1;
            if run <= 2 {
                out.push(ch);
            }
        } else {
            run = 0;
            out.push(ch);
        }
    }
    out
}

/// Trim stray `_`/`-` from both ends, keeping a leading parameter marker.
fn trim_edges(text: &str) -> &str {
    let text = text.trim_end_matches(['_', '-']);
    if text.starts_with(PARAM_MARKER) {
        text
    } else {
        text.trim_start_matches(['_', '-'])
    }
}

fn decode_path(encoded: &str) -> String {
    if encoded.is_empty() {
        return "/".to_string();
    }
    let mut path = String::with_capacity(encoded.len() + 8);
    for segment in encoded.split(PATH_SEPARATOR) {
        path.push('/');
        match segment.strip_prefix(PARAM_MARKER) {
            Some(name) => {
                path.push('{');
                path.push_str(name);
                path.push('}');
            }
            None => path.push_str(segment),
        }
    }
    path
}

/// An identifier known to satisfy [`is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolIdentifier(String);

impl ToolIdentifier {
    /// Encode a method and path template. Methods are uppercased; a method
    /// containing anything other than ASCII letters yields an error.
    pub fn encode(method: &str, path: &str) -> Result<Self, IdentifierFormatError> {
        Self::parse(&encode(method, path))
    }

    /// Accept an existing identifier string.
    pub fn parse(id: &str) -> Result<Self, IdentifierFormatError> {
        let decoded = decode(id)?;
        if !is_method_token(&decoded.method) {
            return Err(IdentifierFormatError::InvalidMethod(id.to_string()));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn method(&self) -> &str {
        self.0
            .split_once(METHOD_DIVIDER)
            .map(|(method, _)| method)
            .unwrap_or(&self.0)
    }

    /// The decoded path template.
    pub fn path(&self) -> String {
        let encoded = self
            .0
            .split_once(METHOD_DIVIDER)
            .map(|(_, path)| path)
            .unwrap_or_default();
        decode_path(encoded)
    }
}

impl fmt::Display for ToolIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ToolIdentifier {
    type Error = IdentifierFormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ToolIdentifier> for String {
    fn from(id: ToolIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for ToolIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
