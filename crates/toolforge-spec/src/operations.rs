//! Flatten a resolved document's `paths` into operation records.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use crate::model::{HttpMethod, OperationRecord, Parameter, ParameterLocation};
use crate::resolver::{is_fallback, FALLBACK_KEY};

/// Enumerate every operation of a resolved document.
///
/// Paths are visited in document order and, within a path, methods in
/// [`HttpMethod::ALL`] order. Malformed entries are skipped with a warning.
pub fn enumerate_operations(root: &Value) -> Vec<OperationRecord> {
    let mut operations = Vec::new();

    let Some(paths) = root.get("paths").and_then(|v| v.as_object()) else {
        return operations; // No paths is valid (empty API)
    };

    for (path, path_item) in paths {
        let Some(path_obj) = path_item.as_object() else {
            tracing::warn!(path = %path, "path item is not an object, skipping");
            continue;
        };

        // Path-level parameters (inherited by all operations)
        let path_params = parse_parameters(path_obj, path);

        for method in HttpMethod::ALL {
            let Some(op_value) = method_entry(path_obj, method) else {
                continue;
            };
            let Some(op_obj) = op_value.as_object() else {
                tracing::warn!(path = %path, method = %method, "operation is not an object, skipping");
                continue;
            };

            let parameters = merge_parameters(path_params.clone(), parse_parameters(op_obj, path));
            let (request_body, request_body_required) = parse_request_body(op_obj);

            operations.push(OperationRecord {
                path: path.clone(),
                method,
                operation_id: string_field(op_obj, "operationId"),
                summary: string_field(op_obj, "summary"),
                description: string_field(op_obj, "description"),
                parameters,
                request_body,
                request_body_required,
                tags: parse_tags(op_obj),
                deprecated: op_obj
                    .get("deprecated")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false),
            });
        }
    }

    operations
}

/// Union of the document's declared tags and every tag used by an operation.
pub fn collect_tags(root: &Value, operations: &[OperationRecord]) -> Vec<String> {
    let declared = root
        .get("tags")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|tag| tag.get("name").and_then(|n| n.as_str()))
        .map(str::to_string);

    let used = operations.iter().flat_map(|op| op.tags.iter().cloned());

    declared.chain(used).collect::<BTreeSet<_>>().into_iter().collect()
}

fn method_entry(path_obj: &Map<String, Value>, method: HttpMethod) -> Option<&Value> {
    path_obj.get(method.key()).or_else(|| {
        path_obj
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(method.key()))
            .map(|(_, value)| value)
    })
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_tags(op_obj: &Map<String, Value>) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in op_obj
        .get("tags")
        .and_then(|v| v.as_array())
        .into_iter()
        .flatten()
        .filter_map(|v| v.as_str())
    {
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Operation-level parameters replace path-level ones with the same
/// (name, location); the rest are appended.
fn merge_parameters(mut inherited: Vec<Parameter>, own: Vec<Parameter>) -> Vec<Parameter> {
    for param in own {
        match inherited
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(slot) => *slot = param,
            None => inherited.push(param),
        }
    }
    inherited
}

/// Parse parameters from a path item or operation object.
fn parse_parameters(obj: &Map<String, Value>, path: &str) -> Vec<Parameter> {
    obj.get("parameters")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|item| parse_parameter(item, path)).collect())
        .unwrap_or_default()
}

fn parse_parameter(item: &Value, path: &str) -> Option<Parameter> {
    if is_fallback(item) {
        return Some(fallback_parameter(item));
    }
    let param_obj = item.as_object()?;
    let Some(name) = param_obj.get("name").and_then(|v| v.as_str()) else {
        tracing::warn!(path = %path, "parameter without a name, skipping");
        return None;
    };
    let location = match param_obj
        .get("in")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .parse::<ParameterLocation>()
    {
        Ok(location) => location,
        Err(e) => {
            tracing::warn!(path = %path, parameter = %name, error = %e, "skipping parameter");
            return None;
        }
    };

    let required = location == ParameterLocation::Path
        || param_obj
            .get("required")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

    let schema = param_obj
        .get("schema")
        .cloned()
        .or_else(|| content_schema(param_obj))
        .unwrap_or_else(|| json!({"type": "string"}));

    Some(Parameter {
        name: name.to_string(),
        location,
        required,
        description: string_field(param_obj, "description"),
        schema,
    })
}

/// Stand-in for a parameter whose `$ref` could not be resolved.
///
/// Named after the last segment of the pointer and sent as an optional query
/// parameter; the fallback node itself becomes the schema so the marker stays
/// visible on the operation.
fn fallback_parameter(node: &Value) -> Parameter {
    let name = node
        .get(FALLBACK_KEY)
        .and_then(|marker| marker.get("pointer"))
        .and_then(|p| p.as_str())
        .and_then(|p| p.rsplit(['/', '#']).find(|segment| !segment.is_empty()))
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .unwrap_or_else(|| "parameter".to_string());

    Parameter {
        name,
        location: ParameterLocation::Query,
        required: false,
        description: node
            .get("description")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        schema: node.clone(),
    }
}

/// OpenAPI 3.x allows `content` instead of `schema` for complex parameters.
fn content_schema(param_obj: &Map<String, Value>) -> Option<Value> {
    param_obj
        .get("content")?
        .as_object()?
        .values()
        .find_map(|media| media.get("schema").cloned())
}

/// Pick the request body schema: `application/json`, then any JSON-flavoured
/// media type, then whatever is declared first.
fn parse_request_body(op_obj: &Map<String, Value>) -> (Option<Value>, bool) {
    let Some(body) = op_obj.get("requestBody") else {
        return (None, false);
    };
    if is_fallback(body) {
        return (Some(body.clone()), false);
    }

    let required = body
        .get("required")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);

    let Some(content) = body.get("content").and_then(|v| v.as_object()) else {
        return (None, required);
    };

    let media = content
        .get("application/json")
        .or_else(|| {
            content
                .iter()
                .find(|(media_type, _)| media_type.contains("json"))
                .map(|(_, media)| media)
        })
        .or_else(|| content.values().next());

    let schema = media.map(|m| m.get("schema").cloned().unwrap_or_else(|| json!({})));
    (schema, required)
}
