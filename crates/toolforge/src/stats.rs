use std::collections::BTreeMap;

use serde::Serialize;

use toolforge_spec::{count_fallbacks, HttpMethod, OperationRecord, ResolvedDocument};

/// Summary counts over a resolved document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub operations: usize,
    /// Keyed in method priority order.
    pub by_method: BTreeMap<HttpMethod, usize>,
    pub by_tag: BTreeMap<String, usize>,
    pub untagged: usize,
    pub deprecated: usize,
    /// Operations whose parameters or body contain a fallback schema.
    pub with_fallbacks: usize,
    pub reference_warnings: usize,
}

impl CatalogStats {
    pub fn compute(doc: &ResolvedDocument) -> Self {
        let mut stats = Self {
            operations: doc.operations().len(),
            reference_warnings: doc.warnings().len(),
            ..Self::default()
        };

        for op in doc.operations() {
            *stats.by_method.entry(op.method).or_default() += 1;
            if op.tags.is_empty() {
                stats.untagged += 1;
            }
            for tag in &op.tags {
                *stats.by_tag.entry(tag.clone()).or_default() += 1;
            }
            if op.deprecated {
                stats.deprecated += 1;
            }
            if has_fallback(op) {
                stats.with_fallbacks += 1;
            }
        }

        stats
    }
}

fn has_fallback(op: &OperationRecord) -> bool {
    op.parameters.iter().any(|p| count_fallbacks(&p.schema) > 0)
        || op.request_body.as_ref().is_some_and(|b| count_fallbacks(b) > 0)
}
