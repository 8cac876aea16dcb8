//! Signature-key search over schema-free JSON documents.
//!
//! Gameday documents have no stable shape: an array holds one object on one
//! day and several on the next, and nesting depth shifts with doubleheaders
//! and postponements. Records of interest are therefore found structurally:
//! a mapping that contains the *signature key* is a target. The walk stops
//! at a target and never looks at its children.
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A JSON mapping found by the walk.
pub type Record = Map<String, Value>;

/// Context carried down the walk. Ancestors refine it; it is never mutated
/// in place, so sibling branches cannot see each other's changes.
pub trait Scope: Clone {
    /// Scope in effect inside `record`, before its signature is checked.
    fn enter_record(&self, _record: &Record) -> Self {
        self.clone()
    }

    /// Scope for the value stored under `key` in the current mapping.
    /// Sequence elements inherit the scope of the sequence itself.
    fn enter_key(&self, _key: &str) -> Self {
        self.clone()
    }
}

impl Scope for () {}

/// Visit every maximal mapping containing `signature`, passing the scope
/// accumulated on the path down to it.
pub fn walk<'a, S, F>(node: &'a Value, signature: &str, scope: &S, visit: &mut F)
where
    S: Scope,
    F: FnMut(&S, &'a Record),
{
    match node {
        Value::Object(record) => {
            let scope = scope.enter_record(record);
            if record.contains_key(signature) {
                visit(&scope, record);
                return;
            }
            for (key, child) in record {
                if is_container(child) {
                    walk(child, signature, &scope.enter_key(key), visit);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter().filter(|item| is_container(item)) {
                walk(item, signature, scope, visit);
            }
        }
        _ => {}
    }
}

/// Collect `transform` of every target, keyed by the key the transform
/// returns. Targets the transform rejects are skipped. An empty result means
/// the document holds no such records yet.
pub fn search<T, F>(node: &Value, signature: &str, mut transform: F) -> BTreeMap<String, T>
where
    F: FnMut(&Record) -> Option<(String, T)>,
{
    let mut found = BTreeMap::new();
    walk(node, signature, &(), &mut |_: &(), record: &Record| {
        if let Some((key, value)) = transform(record) {
            found.insert(key, value);
        }
    });
    found
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}
