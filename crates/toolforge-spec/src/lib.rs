//! OpenAPI document loading.
//!
//! Reads YAML/JSON documents, inlines every internal `$ref` (cutting cycles
//! and replacing broken pointers with marked fallback schemas), and flattens
//! `paths` into a list of operation records.

pub mod document;
pub mod error;
pub mod loader;
pub mod model;
pub mod operations;
pub mod resolver;

pub use document::{parse_document, DocumentFormat, FormatHint};
pub use error::ParseError;
pub use loader::{load_document, LoadOptions, ResolvedDocument};
pub use model::{HttpMethod, OperationRecord, Parameter, ParameterLocation};
pub use operations::{collect_tags, enumerate_operations};
pub use resolver::{
    count_fallbacks, fallback_kind, is_fallback, resolve, FallbackKind, ReferenceWarning,
    Resolution, ResolveOptions, ResolveStats, FALLBACK_KEY, REF_KEY,
};
