//! Review-summary resolution.
//!
//! The summary can sit at several depths depending on the page template.
//! Resolution tries fixed paths first, then scans the whole tree for
//! summary-shaped mappings, then reads two shallow product fields.

use serde_json::{Map, Value};

use super::path::{deep_get, flag_is_set, product_get};

/// Paths to a review-summary mapping, highest priority first.
const SUMMARY_PATHS: [&[&str]; 4] = [
    &["pageData", "product", "reviews", "reviewSummary"],
    &["pageData", "product", "reviewSummary"],
    &["reviews", "reviewSummary"],
    &["reviewSummary"],
];

const SUMMARY_KEY: &str = "reviewSummary";

/// Resolved rating facts; every field is absent when it failed to coerce.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingSummary {
    pub average_rating: Option<f64>,
    pub review_count: Option<i64>,
    /// Star bucket → review count, in payload order.
    pub histogram: Option<Map<String, Value>>,
    pub top_rated: Option<bool>,
}

/// Resolves the product's rating summary from `payload`.
#[must_use]
pub fn resolve_ratings(payload: &Value) -> RatingSummary {
    if let Some(summary) = SUMMARY_PATHS
        .iter()
        .find_map(|path| deep_get(payload, path).and_then(Value::as_object))
    {
        return coerce_summary(summary);
    }

    let mut candidates = Vec::new();
    collect_candidates(payload, &mut candidates);
    if let Some(best) = best_candidate(&candidates) {
        return coerce_summary(best);
    }

    let shallow = |key: &str| {
        product_get(payload, &["reviews", key])
            .filter(|v| flag_is_set(v))
            .or_else(|| product_get(payload, &[key]))
    };
    RatingSummary {
        average_rating: shallow("averageRating").and_then(coerce_float),
        review_count: shallow("reviewCount").and_then(coerce_int),
        histogram: None,
        top_rated: None,
    }
}

/// Depth-first pre-order walk collecting summary-shaped mappings.
///
/// A mapping's nested `reviewSummary` is pushed before the mapping itself
/// is considered, matching the order a reader scanning the document sees
/// them.
fn collect_candidates<'a>(value: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match value {
        Value::Object(map) => {
            if let Some(inner) = map.get(SUMMARY_KEY).and_then(Value::as_object) {
                out.push(inner);
            }
            if looks_like_summary(map) {
                out.push(map);
            }
            for child in map.values() {
                collect_candidates(child, out);
            }
        }
        Value::Array(items) => {
            for child in items {
                collect_candidates(child, out);
            }
        }
        _ => {}
    }
}

fn looks_like_summary(map: &Map<String, Value>) -> bool {
    map.contains_key("averageRating")
        && (map.contains_key("count") || map.contains_key("reviewCount"))
}

/// Candidate with the largest parsable count; the first one wins a tie.
/// A candidate whose count does not parse or is negative is never chosen.
fn best_candidate<'a>(candidates: &[&'a Map<String, Value>]) -> Option<&'a Map<String, Value>> {
    let mut best: Option<(&Map<String, Value>, i64)> = None;
    for &candidate in candidates {
        let Some(count) = raw_count(candidate)
            .and_then(coerce_int)
            .filter(|c| *c >= 0)
        else {
            continue;
        };
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((candidate, count)),
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// `count` when the key exists (even if null), else `reviewCount`.
fn raw_count(summary: &Map<String, Value>) -> Option<&Value> {
    match summary.get("count") {
        Some(v) => Some(v),
        None => summary.get("reviewCount"),
    }
}

fn coerce_summary(summary: &Map<String, Value>) -> RatingSummary {
    RatingSummary {
        average_rating: summary.get("averageRating").and_then(coerce_float),
        review_count: raw_count(summary).and_then(coerce_int),
        histogram: summary
            .get("ratingHistogram")
            .and_then(Value::as_object)
            .and_then(coerce_histogram),
        top_rated: summary.get("topRated").and_then(Value::as_bool),
    }
}

/// Every bucket must coerce or the whole histogram is dropped.
fn coerce_histogram(raw: &Map<String, Value>) -> Option<Map<String, Value>> {
    raw.iter()
        .map(|(k, v)| coerce_int(v).map(|n| (k.clone(), Value::from(n))))
        .collect()
}

/// Integer view of a loosely-typed count: integers, truncated floats,
/// integer strings and booleans.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Float view of a loosely-typed rating: numbers, numeric strings and
/// booleans.
pub(crate) fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(f64::from(u8::from(*b))),
        _ => None,
    }
}

#[cfg(test)]
#[path = "ratings_test.rs"]
mod tests;
