//! `$ref` resolution.
//!
//! Every internal pointer (`#/...`) is replaced by a copy of its resolved
//! target. Pointers that cannot be followed, point outside the document, or
//! re-enter their own expansion become *fallback nodes*: open-ended object
//! schemas tagged with [`FALLBACK_KEY`]. None of these are errors.
//!
//! Every pointer is expanded at most once. Before the tree is walked, each
//! internal pointer is resolved in document order and the result memoized;
//! the walk itself (sequential or fanned out over threads) then only copies
//! memoized values, so both modes produce the same tree.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::num::NonZeroUsize;
use std::thread;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Key marking a pointer node.
pub const REF_KEY: &str = "$ref";

/// Key marking a synthesized fallback node.
pub const FALLBACK_KEY: &str = "x-ref-fallback";

/// Why a pointer was replaced by a fallback node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackKind {
    /// A segment of an internal pointer does not exist.
    Missing,
    /// The pointer re-entered its own expansion.
    Circular,
    /// The pointer leaves the document (file or URL).
    External,
}

/// A non-fatal resolution problem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ReferenceWarning {
    pub pointer: String,
    pub kind: FallbackKind,
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions {
    /// Resolve independent subtrees on worker threads.
    pub concurrent: bool,
}

/// Diagnostic counters. Under concurrent resolution these may vary from run
/// to run (two workers can race on the same pointer); the resolved value
/// does not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolveStats {
    /// Pointer nodes encountered.
    pub pointers: usize,
    /// Pointers answered from the memo cache.
    pub cache_hits: usize,
    /// Fallback nodes synthesized.
    pub fallbacks: usize,
}

impl ResolveStats {
    fn merge(&mut self, other: ResolveStats) {
        self.pointers += other.pointers;
        self.cache_hits += other.cache_hits;
        self.fallbacks += other.fallbacks;
    }
}

/// Output of [`resolve`].
#[derive(Debug, Clone)]
pub struct Resolution {
    pub value: Value,
    /// Distinct warnings, ordered by pointer then kind.
    pub warnings: Vec<ReferenceWarning>,
    pub stats: ResolveStats,
}

/// Resolve every pointer in `root` against `root` itself.
pub fn resolve(root: &Value, options: ResolveOptions) -> Resolution {
    let resolver = Resolver::new(root);
    let mut branch = Branch::default();
    resolver.expand_all(&mut branch);

    let value = if options.concurrent {
        let (value, walked) = resolver.resolve_concurrent();
        branch.absorb(walked);
        value
    } else {
        resolver.resolve_value(root, &mut branch)
    };

    for warning in &branch.warnings {
        tracing::warn!(pointer = %warning.pointer, kind = ?warning.kind, "{}", warning.message);
    }

    tracing::debug!(
        pointers = branch.stats.pointers,
        cache_hits = branch.stats.cache_hits,
        fallbacks = branch.stats.fallbacks,
        "references resolved"
    );

    Resolution {
        value,
        warnings: branch.warnings.into_iter().collect(),
        stats: branch.stats,
    }
}

/// Whether `value` is a fallback node synthesized by the resolver.
pub fn is_fallback(value: &Value) -> bool {
    fallback_kind(value).is_some()
}

/// The failure kind recorded on a fallback node.
pub fn fallback_kind(value: &Value) -> Option<FallbackKind> {
    let marker = value.get(FALLBACK_KEY)?.get("kind")?;
    serde_json::from_value(marker.clone()).ok()
}

/// Count fallback nodes anywhere under `value`.
pub fn count_fallbacks(value: &Value) -> usize {
    match value {
        Value::Object(map) if map.contains_key(FALLBACK_KEY) => 1,
        Value::Object(map) => map.values().map(count_fallbacks).sum(),
        Value::Array(items) => items.iter().map(count_fallbacks).sum(),
        _ => 0,
    }
}

fn fallback_node(pointer: &str, kind: FallbackKind, message: &str) -> Value {
    json!({
        "type": "object",
        "additionalProperties": true,
        "description": message,
        FALLBACK_KEY: {
            "kind": kind,
            "pointer": pointer,
        }
    })
}

/// Whether a pointer addresses the current document.
pub fn is_internal(pointer: &str) -> bool {
    pointer == "#" || pointer.starts_with("#/")
}

/// Walk `root` along an internal pointer.
///
/// On failure returns the first segment that could not be followed.
pub fn lookup<'a>(root: &'a Value, pointer: &str) -> Result<&'a Value, String> {
    let Some(path) = pointer.strip_prefix('#') else {
        return Err(pointer.to_string());
    };
    if path.is_empty() {
        return Ok(root);
    }
    let path = path.strip_prefix('/').ok_or_else(|| path.to_string())?;

    let mut current = root;
    for segment in path.split('/') {
        let unescaped = segment.replace("~1", "/").replace("~0", "~");
        let next = match current {
            Value::Object(map) => map.get(&unescaped),
            Value::Array(items) => unescaped.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        };
        current = next.ok_or(unescaped)?;
    }
    Ok(current)
}

/// Every `$ref` string under `value`, in document order.
fn collect_pointers<'v>(value: &'v Value, out: &mut Vec<&'v str>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(pointer)) = map.get(REF_KEY) {
                out.push(pointer);
            }
            for child in map.values() {
                collect_pointers(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_pointers(item, out);
            }
        }
        _ => {}
    }
}

/// Per-branch traversal state. Each worker owns one.
#[derive(Default)]
struct Branch {
    /// Pointers whose expansion encloses the current node.
    resolving: HashSet<String>,
    warnings: BTreeSet<ReferenceWarning>,
    stats: ResolveStats,
}

impl Branch {
    fn fallback(&mut self, pointer: &str, kind: FallbackKind, message: String) -> Value {
        tracing::debug!(pointer = %pointer, kind = ?kind, "{}", message);
        let node = fallback_node(pointer, kind, &message);
        self.stats.fallbacks += 1;
        self.warnings.insert(ReferenceWarning {
            pointer: pointer.to_string(),
            kind,
            message,
        });
        node
    }

    fn absorb(&mut self, other: Branch) {
        self.warnings.extend(other.warnings);
        self.stats.merge(other.stats);
    }
}

struct Resolver<'a> {
    root: &'a Value,
    cache: RwLock<HashMap<String, Value>>,
}

impl<'a> Resolver<'a> {
    fn new(root: &'a Value) -> Self {
        Self {
            root,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Expand every internal pointer once, in document order.
    fn expand_all(&self, branch: &mut Branch) {
        let mut pointers = Vec::new();
        collect_pointers(self.root, &mut pointers);

        let mut seen = HashSet::new();
        for pointer in pointers {
            if !is_internal(pointer) || !seen.insert(pointer) {
                continue;
            }
            if !self.cache.read().contains_key(pointer) {
                self.resolve_pointer(pointer, branch);
            }
        }
    }

    fn resolve_value(&self, value: &Value, branch: &mut Branch) -> Value {
        match value {
            Value::Object(map) => {
                if let Some(Value::String(pointer)) = map.get(REF_KEY) {
                    let target = self.resolve_pointer(pointer, branch);
                    return self.overlay_siblings(target, map, branch);
                }
                let mut resolved = Map::with_capacity(map.len());
                for (key, val) in map {
                    resolved.insert(key.clone(), self.resolve_value(val, branch));
                }
                Value::Object(resolved)
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.resolve_value(item, branch))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Keys next to `$ref` override the corresponding keys of an object target.
    fn overlay_siblings(
        &self,
        target: Value,
        pointer_node: &Map<String, Value>,
        branch: &mut Branch,
    ) -> Value {
        if pointer_node.len() == 1 || is_fallback(&target) {
            return target;
        }
        match target {
            Value::Object(mut map) => {
                for (key, val) in pointer_node {
                    if key != REF_KEY {
                        map.insert(key.clone(), self.resolve_value(val, branch));
                    }
                }
                Value::Object(map)
            }
            other => other,
        }
    }

    fn resolve_pointer(&self, pointer: &str, branch: &mut Branch) -> Value {
        branch.stats.pointers += 1;

        if !is_internal(pointer) {
            return branch.fallback(
                pointer,
                FallbackKind::External,
                format!("External reference '{pointer}' is not supported"),
            );
        }

        if branch.resolving.contains(pointer) {
            return branch.fallback(
                pointer,
                FallbackKind::Circular,
                format!("Circular reference '{pointer}'"),
            );
        }

        if let Some(value) = self.cache.read().get(pointer) {
            branch.stats.cache_hits += 1;
            return value.clone();
        }

        let target = match lookup(self.root, pointer) {
            Ok(target) => target,
            Err(segment) => {
                let node = branch.fallback(
                    pointer,
                    FallbackKind::Missing,
                    format!("Unresolved reference '{pointer}': segment '{segment}' not found"),
                );
                self.memoize(pointer, &node);
                return node;
            }
        };

        branch.resolving.insert(pointer.to_string());
        let resolved = self.resolve_value(target, branch);
        branch.resolving.remove(pointer);

        self.memoize(pointer, &resolved);
        resolved
    }

    fn memoize(&self, pointer: &str, value: &Value) {
        self.cache
            .write()
            .entry(pointer.to_string())
            .or_insert_with(|| value.clone());
    }

    /// Fan the document's second level out over scoped worker threads.
    ///
    /// Units are reassembled by position, so the result matches the
    /// sequential walk exactly.
    fn resolve_concurrent(&self) -> (Value, Branch) {
        let Some(root_map) = self.root.as_object() else {
            let mut branch = Branch::default();
            let value = self.resolve_value(self.root, &mut branch);
            return (value, branch);
        };

        let mut units: Vec<(&str, Option<&str>, &Value)> = Vec::new();
        for (key, value) in root_map {
            match value.as_object() {
                Some(map) if !map.contains_key(REF_KEY) && !map.is_empty() => {
                    for (child_key, child) in map {
                        units.push((key.as_str(), Some(child_key.as_str()), child));
                    }
                }
                _ => units.push((key.as_str(), None, value)),
            }
        }

        let workers = thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(units.len())
            .max(1);
        let chunk_size = units.len().div_ceil(workers).max(1);

        let results: Vec<Vec<(Value, Branch)>> = thread::scope(|scope| {
            let handles: Vec<_> = units
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|(_, _, value)| {
                                let mut branch = Branch::default();
                                let resolved = self.resolve_value(value, &mut branch);
                                (resolved, branch)
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(results) => results,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        let mut merged = Branch::default();
        let mut out = Map::with_capacity(root_map.len());
        for ((key, child_key, _), (value, branch)) in units.iter().zip(results.into_iter().flatten()) {
            merged.absorb(branch);
            match child_key {
                None => {
                    out.insert(key.to_string(), value);
                }
                Some(child_key) => {
                    let slot = out
                        .entry(key.to_string())
                        .or_insert_with(|| Value::Object(Map::new()));
                    if let Value::Object(map) = slot {
                        map.insert(child_key.to_string(), value);
                    }
                }
            }
        }
        (Value::Object(out), merged)
    }
}
