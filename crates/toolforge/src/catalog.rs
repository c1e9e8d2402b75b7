//! Tool descriptors assembled from a resolved document.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{json, Map, Value};

use toolforge_naming::{abbreviate_with, NamingOptions, ToolIdentifier, MAX_NAME_LEN};
use toolforge_spec::{HttpMethod, OperationRecord, ResolvedDocument};
use toolforge_telemetry::{log_catalog_built, log_name_collision};

use crate::error::ToolforgeError;

/// Property name carrying the request body in an input schema.
pub const BODY_PROPERTY: &str = "body";

/// Extension key recording where a parameter travels.
pub const LOCATION_KEY: &str = "x-location";

/// Everything a tool host needs to expose one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDescriptor {
    pub id: ToolIdentifier,
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Object schema over all parameters plus the request body.
    pub input_schema: Value,
    pub tags: Vec<String>,
    pub deprecated: bool,
}

/// One tool per operation, in enumeration order, with unique names.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ToolCatalog {
    tools: Vec<ToolDescriptor>,
}

impl ToolCatalog {
    pub fn build(doc: &ResolvedDocument, options: &NamingOptions) -> Result<Self, ToolforgeError> {
        let mut taken = HashSet::new();
        let mut tools = Vec::with_capacity(doc.operations().len());

        for op in doc.operations() {
            let id = ToolIdentifier::encode(op.method.as_str(), &op.path)?;
            let base = display_name(op, &id, options)?;
            let name = unique_name(&base, &mut taken, options);
            if name != base {
                log_name_collision!(name = %base, renamed = %name, id = %id);
            }

            tools.push(ToolDescriptor {
                name,
                method: op.method,
                path: op.path.clone(),
                description: describe(op),
                input_schema: input_schema(op),
                tags: op.tags.clone(),
                deprecated: op.deprecated,
                id,
            });
        }

        log_catalog_built!(tools = tools.len());
        Ok(Self { tools })
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    /// Look a tool up by display name.
    pub fn find(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Look a tool up by identifier.
    pub fn find_by_id(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.id.as_str() == id)
    }
}

/// Name from `operationId`, else `summary`, else the identifier itself.
fn display_name(
    op: &OperationRecord,
    id: &ToolIdentifier,
    options: &NamingOptions,
) -> Result<String, ToolforgeError> {
    let sources = [op.operation_id.as_deref(), op.summary.as_deref()];
    for source in sources.into_iter().flatten() {
        let name = abbreviate_with(source, options)?;
        if !name.is_empty() {
            return Ok(name);
        }
    }
    Ok(abbreviate_with(id.as_str(), options)?)
}

/// Append `_2`, `_3`, ... until the name is unused.
fn unique_name(base: &str, taken: &mut HashSet<String>, options: &NamingOptions) -> String {
    if taken.insert(base.to_string()) {
        return base.to_string();
    }
    let mut n = 2usize;
    loop {
        let suffix = format!("_{n}");
        let stem = if options.disable_abbreviation {
            base
        } else {
            let keep = MAX_NAME_LEN.saturating_sub(suffix.len()).min(base.len());
            base[..keep].trim_end_matches('_')
        };
        let candidate = format!("{stem}{suffix}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

fn describe(op: &OperationRecord) -> Option<String> {
    match (&op.summary, &op.description) {
        (Some(summary), Some(description)) if summary != description => {
            Some(format!("{summary}\n\n{description}"))
        }
        (Some(text), _) | (None, Some(text)) => Some(text.clone()),
        (None, None) => None,
    }
}

fn input_schema(op: &OperationRecord) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &op.parameters {
        let mut schema = param.schema.clone();
        if let Value::Object(obj) = &mut schema {
            if let Some(description) = &param.description {
                obj.entry("description")
                    .or_insert_with(|| Value::String(description.clone()));
            }
            obj.insert(LOCATION_KEY.to_string(), json!(param.location));
        }

        let key = if properties.contains_key(&param.name) {
            format!("{}_{}", param.location.as_str(), param.name)
        } else {
            param.name.clone()
        };
        if param.required {
            required.push(Value::String(key.clone()));
        }
        properties.insert(key, schema);
    }

    if let Some(body) = &op.request_body {
        properties.insert(BODY_PROPERTY.to_string(), body.clone());
        if op.request_body_required {
            required.push(Value::String(BODY_PROPERTY.to_string()));
        }
    }

    let mut schema = json!({
        "type": "object",
        "properties": properties,
    });
    if !required.is_empty() {
        schema["required"] = Value::Array(required);
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolforge_spec::{load_document, LoadOptions};

    fn catalog(yaml: &str, options: &NamingOptions) -> ToolCatalog {
        let doc = load_document(yaml, LoadOptions::default()).unwrap();
        ToolCatalog::build(&doc, options).unwrap()
    }

    const USERS: &str = r##"
openapi: "3.0.3"
info:
  title: Users
  version: "1"
paths:
  /users/{id}:
    parameters:
      - name: id
        in: path
        description: User id
        schema:
          type: string
    get:
      operationId: getUserServiceController
      summary: Fetch a user
      tags: [users]
    put:
      operationId: updateUser
      parameters:
        - name: dryRun
          in: query
          schema:
            type: boolean
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/User'
  /health:
    get:
      summary: Health check
  /:
    get: {}
components:
  schemas:
    User:
      type: object
      properties:
        name:
          type: string
"##;

    #[test]
    fn builds_one_tool_per_operation() {
        let catalog = catalog(USERS, &NamingOptions::default());
        let names: Vec<_> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["get_user", "update_user", "health_check", "get"]);

        let first = &catalog.tools()[0];
        assert_eq!(first.id.as_str(), "GET::users__---id");
        assert_eq!(first.description.as_deref(), Some("Fetch a user"));
        assert_eq!(first.tags, vec!["users"]);
    }

    #[test]
    fn input_schema_merges_parameters_and_body() {
        let catalog = catalog(USERS, &NamingOptions::default());
        let update = catalog.find("update_user").unwrap();
        let schema = &update.input_schema;
        assert_eq!(schema["properties"]["id"]["x-location"], "path");
        assert_eq!(schema["properties"]["id"]["description"], "User id");
        assert_eq!(schema["properties"]["dryRun"]["type"], "boolean");
        assert_eq!(schema["properties"]["body"]["properties"]["name"]["type"], "string");
        assert_eq!(schema["required"], json!(["id", "body"]));
    }

    #[test]
    fn namespace_applies_to_every_name() {
        let options = NamingOptions::new().with_namespace("acme");
        let catalog = catalog(USERS, &options);
        assert!(catalog.tools().iter().all(|t| t.name.starts_with("acme_")));
    }

    #[test]
    fn colliding_names_are_suffixed() {
        let yaml = r#"
paths:
  /a:
    get:
      operationId: listItems
  /b:
    get:
      operationId: list_items
  /c:
    get:
      operationId: ListItemsController
"#;
        let catalog = catalog(yaml, &NamingOptions::default());
        let names: Vec<_> = catalog.tools().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["list_items", "list_items_2", "list_items_3"]);
    }

    #[test]
    fn suffixed_names_stay_bounded() {
        let long = "segment".repeat(12);
        let yaml = format!(
            "paths:\n  /a:\n    get:\n      operationId: {long}\n  /b:\n    get:\n      operationId: {long}\n"
        );
        let catalog = catalog(&yaml, &NamingOptions::default());
        let second = &catalog.tools()[1];
        assert!(second.name.len() <= MAX_NAME_LEN);
        assert!(second.name.ends_with("_2"));
    }

    #[test]
    fn ids_are_reversible() {
        let catalog = catalog(USERS, &NamingOptions::default());
        for tool in catalog.tools() {
            assert_eq!(tool.id.method(), tool.method.as_str());
            assert_eq!(tool.id.path(), tool.path);
        }
        assert!(catalog.find_by_id("PUT::users__---id").is_some());
    }

    #[test]
    fn operation_without_body_or_params() {
        let catalog = catalog(USERS, &NamingOptions::default());
        let health = catalog.find("health_check").unwrap();
        assert_eq!(health.input_schema, json!({"type": "object", "properties": {}}));
    }
}
