//! Turns OpenAPI documents into tool descriptors.
//!
//! Loads a document (see [`toolforge_spec`]), derives a reversible
//! identifier and a bounded display name for every operation (see
//! [`toolforge_naming`]), and assembles the input schema a tool host needs.

pub mod catalog;
pub mod error;
pub mod stats;

pub use catalog::{ToolCatalog, ToolDescriptor};
pub use error::ToolforgeError;
pub use stats::CatalogStats;

use toolforge_spec::{LoadOptions, ResolvedDocument};
use toolforge_telemetry::log_document_loaded;

/// Load a document from already-fetched text.
pub fn load(text: &str, options: LoadOptions) -> Result<ResolvedDocument, ToolforgeError> {
    let doc = toolforge_spec::load_document(text, options)?;
    log_document_loaded!(
        title = doc.title().unwrap_or_default(),
        operations = doc.operations().len(),
        warnings = doc.warnings().len()
    );
    Ok(doc)
}
