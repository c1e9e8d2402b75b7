use serde_json::Value;

use crate::document::{parse_document, FormatHint};
use crate::error::ParseError;
use crate::model::OperationRecord;
use crate::operations::{collect_tags, enumerate_operations};
use crate::resolver::{resolve, ReferenceWarning, ResolveOptions, ResolveStats};

/// Options for [`load_document`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOptions {
    pub format: FormatHint,
    pub resolve: ResolveOptions,
}

/// A parsed document with every internal `$ref` inlined and its operations
/// enumerated.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    root: Value,
    operations: Vec<OperationRecord>,
    tags: Vec<String>,
    warnings: Vec<ReferenceWarning>,
    stats: ResolveStats,
}

impl ResolvedDocument {
    /// The resolved tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Operations in path order, then method priority order.
    pub fn operations(&self) -> &[OperationRecord] {
        &self.operations
    }

    /// Declared and used tags, sorted.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn warnings(&self) -> &[ReferenceWarning] {
        &self.warnings
    }

    pub fn resolve_stats(&self) -> ResolveStats {
        self.stats
    }

    /// `info.title`, if declared.
    pub fn title(&self) -> Option<&str> {
        self.root.pointer("/info/title").and_then(|v| v.as_str())
    }

    /// `info.version`, if declared.
    pub fn version(&self) -> Option<&str> {
        self.root.pointer("/info/version").and_then(|v| v.as_str())
    }
}

/// Parse, resolve, and enumerate a document in one go.
///
/// Only malformed text is an error; broken references become fallback nodes
/// and show up in [`ResolvedDocument::warnings`].
pub fn load_document(input: &str, options: LoadOptions) -> Result<ResolvedDocument, ParseError> {
    let parsed = parse_document(input, options.format)?;
    let resolution = resolve(&parsed, options.resolve);
    let operations = enumerate_operations(&resolution.value);
    let tags = collect_tags(&resolution.value, &operations);

    tracing::debug!(
        operations = operations.len(),
        tags = tags.len(),
        warnings = resolution.warnings.len(),
        "document loaded"
    );

    Ok(ResolvedDocument {
        root: resolution.value,
        operations,
        tags,
        warnings: resolution.warnings,
        stats: resolution.stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HttpMethod;
    use crate::resolver::{count_fallbacks, fallback_kind, FallbackKind};

    const PETSTORE: &str = r##"
openapi: "3.0.3"
info:
  title: Petstore
  version: "1.2.0"
tags:
  - name: pets
paths:
  /pets:
    get:
      operationId: listPets
      tags: [pets]
      parameters:
        - $ref: '#/components/parameters/Limit'
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
    post:
      operationId: createPet
      tags: [pets]
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
  /pets/{petId}:
    parameters:
      - name: petId
        in: path
        schema:
          type: string
    get:
      operationId: showPetById
      tags: [pets, lookup]
components:
  parameters:
    Limit:
      name: limit
      in: query
      schema:
        type: integer
        maximum: 100
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
        name:
          type: string
        owner:
          $ref: '#/components/schemas/Owner'
    Owner:
      type: object
      properties:
        pets:
          type: array
          items:
            $ref: '#/components/schemas/Pet'
"##;

    #[test]
    fn load_petstore() {
        let doc = load_document(PETSTORE, LoadOptions::default()).unwrap();
        assert_eq!(doc.title(), Some("Petstore"));
        assert_eq!(doc.version(), Some("1.2.0"));

        let ops = doc.operations();
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].operation_id.as_deref(), Some("listPets"));
        assert_eq!(ops[1].method, HttpMethod::Post);
        assert_eq!(ops[2].path, "/pets/{petId}");

        // Parameter reference inlined
        assert_eq!(ops[0].parameters[0].name, "limit");
        assert_eq!(ops[0].parameters[0].schema["maximum"], 100);

        // Pet -> Owner -> Pet is cut at the second Pet
        let body = ops[1].request_body.as_ref().unwrap();
        let nested = &body["properties"]["owner"]["properties"]["pets"]["items"];
        assert_eq!(fallback_kind(nested), Some(FallbackKind::Circular));

        assert_eq!(doc.tags(), ["lookup", "pets"]);
        assert!(doc
            .warnings()
            .iter()
            .all(|w| w.kind == FallbackKind::Circular));
    }

    #[test]
    fn load_json_document() {
        let json = r##"{"openapi": "3.1.0", "paths": {"/h": {"get": {"operationId": "health"}}}}"##;
        let doc = load_document(json, LoadOptions::default()).unwrap();
        assert_eq!(doc.operations().len(), 1);
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn one_broken_reference_among_ten() {
        let mut yaml = String::from(
            "openapi: \"3.0.0\"\ninfo:\n  title: T\n  version: \"1\"\npaths:\n",
        );
        for i in 0..10 {
            let target = if i == 4 { "Missing" } else { "Item" };
            yaml.push_str(&format!(
                "  /items{i}:\n    post:\n      requestBody:\n        content:\n          application/json:\n            schema:\n              $ref: '#/components/schemas/{target}'\n"
            ));
        }
        yaml.push_str("components:\n  schemas:\n    Item:\n      type: object\n");

        let doc = load_document(&yaml, LoadOptions::default()).unwrap();
        let ops = doc.operations();
        assert_eq!(ops.len(), 10);

        let broken: Vec<_> = ops
            .iter()
            .filter(|op| count_fallbacks(op.request_body.as_ref().unwrap()) > 0)
            .collect();
        assert_eq!(broken.len(), 1);
        assert_eq!(broken[0].path, "/items4");
        assert_eq!(doc.warnings().len(), 1);
        assert_eq!(doc.warnings()[0].kind, FallbackKind::Missing);
    }

    #[test]
    fn concurrent_load_matches_sequential() {
        let seq = load_document(PETSTORE, LoadOptions::default()).unwrap();
        let con = load_document(
            PETSTORE,
            LoadOptions {
                resolve: ResolveOptions { concurrent: true },
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(seq.root(), con.root());
        assert_eq!(seq.operations(), con.operations());
        assert_eq!(seq.warnings(), con.warnings());
    }

    #[test]
    fn malformed_text_is_an_error() {
        assert!(load_document("{ not json", LoadOptions::default()).is_err());
    }
}
