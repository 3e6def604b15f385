//! Recursive removal of empty values.

use serde_json::Value;

/// `null`, `""`, `[]` and `{}`. Booleans and zero are kept.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Drops every mapping entry and list element that is empty after its own
/// children have been pruned. Scalars pass through unchanged.
///
/// The result never contains an empty value below the root, so pruning it
/// again returns it unchanged.
#[must_use]
pub fn prune(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, prune(v)))
                .filter(|(_, v)| !is_empty_value(v))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(prune)
                .filter(|v| !is_empty_value(v))
                .collect(),
        ),
        scalar => scalar,
    }
}
