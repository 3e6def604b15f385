//! Fail-soft lookup into arbitrary JSON trees.

use serde_json::Value;

/// Keys from the payload root to the product node.
pub(crate) const PRODUCT_PATH: [&str; 2] = ["pageData", "product"];

/// Walks `path` through nested objects starting at `value`.
///
/// Returns `None` as soon as a key is missing or the current value is not an
/// object. Never panics, so extractors can walk reshaped payloads freely.
#[must_use]
pub fn deep_get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |current, key| current.as_object()?.get(*key))
}

/// Looks up `keys` below the product node (`pageData.product`).
pub(crate) fn product_get<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    deep_get(payload, &PRODUCT_PATH).and_then(|product| deep_get(product, keys))
}

/// The product's SKU entries, or an empty slice when absent or not a list.
pub(crate) fn product_skus(payload: &Value) -> &[Value] {
    product_get(payload, &["skus"])
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Whether a loosely-typed flag counts as set.
///
/// `true`, non-zero numbers, non-empty strings and non-empty containers are
/// set; `null`, `false`, zero and empty values are not.
#[must_use]
pub fn flag_is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Renders a scalar as display text: strings verbatim, anything else as JSON.
pub(crate) fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn resolves_nested_path() {
        let v = json!({"a": {"b": {"c": 3}}});
        assert_eq!(deep_get(&v, &["a", "b", "c"]), Some(&json!(3)));
    }

    #[test]
    fn empty_path_returns_root() {
        let v = json!({"a": 1});
        assert_eq!(deep_get(&v, &[]), Some(&v));
    }

    #[test]
    fn missing_key_returns_none() {
        let v = json!({"a": {"b": 1}});
        assert!(deep_get(&v, &["a", "x"]).is_none());
    }

    #[test]
    fn non_object_step_returns_none() {
        let v = json!({"a": [1, 2, 3]});
        assert!(deep_get(&v, &["a", "0"]).is_none());
        assert!(deep_get(&json!("text"), &["a"]).is_none());
    }

    #[test]
    fn explicit_null_is_returned_not_defaulted() {
        let v = json!({"a": null});
        assert_eq!(deep_get(&v, &["a"]), Some(&Value::Null));
    }

    #[test]
    fn product_skus_tolerates_wrong_shape() {
        assert!(product_skus(&json!({"pageData": {"product": {"skus": {"x": 1}}}})).is_empty());
        assert_eq!(
            product_skus(&json!({"pageData": {"product": {"skus": [{}, {}]}}})).len(),
            2
        );
    }

    #[test]
    fn flag_truthiness_is_explicit() {
        assert!(flag_is_set(&json!(true)));
        assert!(flag_is_set(&json!(1)));
        assert!(flag_is_set(&json!("yes")));
        assert!(!flag_is_set(&json!(false)));
        assert!(!flag_is_set(&json!(0)));
        assert!(!flag_is_set(&json!("")));
        assert!(!flag_is_set(&json!([])));
        assert!(!flag_is_set(&Value::Null));
    }
}
