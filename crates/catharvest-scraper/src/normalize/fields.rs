//! Per-field extractors over the raw product payload.
//!
//! Every extractor takes the whole payload, tries the known shape variants
//! in a fixed order, and returns an empty/absent value rather than failing
//! when nothing matches.

use serde::Serialize;
use serde_json::{Map, Value};

use super::path::{deep_get, flag_is_set, product_get, value_to_text};
use super::url::absolutize_url;

/// Brand used in the composed name when the payload names none.
pub const DEFAULT_BRAND: &str = "REI Co-op";

/// Lines of `longDescription` kept when it is the only feature source.
const MAX_DESCRIPTION_FEATURES: usize = 15;

/// Characters stripped from both ends of each `longDescription` line.
const BULLET_CHARS: &[char] = &['•', '-', ' ', '\n', '\r', '\t'];

/// One breadcrumb entry with a non-empty name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: Option<String>,
    pub canonical: Value,
}

/// Page title's first `" | "` segment, else `"<brand> <product title>"`.
#[must_use]
pub fn extract_name(payload: &Value) -> Option<String> {
    if let Some(title) = deep_get(payload, &["title"]).and_then(Value::as_str) {
        if let Some((first, _)) = title.split_once(" | ") {
            return Some(first.trim().to_owned());
        }
    }

    let brand = product_get(payload, &["brand", "name"])
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_BRAND);

    product_get(payload, &["title"])
        .filter(|t| flag_is_set(t))
        .map(|t| format!("{brand} {}", value_to_text(t)).trim().to_owned())
}

/// The product `styleId`, as text.
#[must_use]
pub fn extract_product_id(payload: &Value) -> Option<String> {
    product_get(payload, &["styleId"])
        .filter(|v| !v.is_null())
        .map(value_to_text)
}

/// Top-level `description`, else the Open-Graph description; trimmed.
#[must_use]
pub fn extract_description(payload: &Value) -> Option<String> {
    deep_get(payload, &["description"])
        .and_then(Value::as_str)
        .or_else(|| deep_get(payload, &["openGraphProperties", "og:description"]).and_then(Value::as_str))
        .map(|s| s.trim().to_owned())
}

/// Open-Graph URL, else the product `canonicalUrl`; absolutized.
#[must_use]
pub fn extract_canonical_url(payload: &Value, base_url: &str) -> Option<String> {
    deep_get(payload, &["openGraphProperties", "og:url"])
        .and_then(Value::as_str)
        .or_else(|| product_get(payload, &["canonicalUrl"]).and_then(Value::as_str))
        .map(|url| absolutize_url(url, base_url))
}

/// `breadcrumbs[].item` entries that carry a non-empty name.
#[must_use]
pub fn extract_breadcrumbs(payload: &Value, base_url: &str) -> Vec<Breadcrumb> {
    let Some(crumbs) = product_get(payload, &["breadcrumbs"]).and_then(Value::as_array) else {
        return Vec::new();
    };

    crumbs
        .iter()
        .filter_map(|crumb| crumb.get("item")?.as_object())
        .filter_map(|item| {
            let name = item.get("name")?.as_str().filter(|n| !n.is_empty())?;
            Some(Breadcrumb {
                name: name.to_owned(),
                url: item
                    .get("url")
                    .and_then(Value::as_str)
                    .map(|u| absolutize_url(u, base_url)),
                canonical: item.get("canonical").cloned().unwrap_or(Value::Null),
            })
        })
        .collect()
}

/// Category names in breadcrumb order.
#[must_use]
pub fn categories(breadcrumbs: &[Breadcrumb]) -> Vec<String> {
    breadcrumbs.iter().map(|b| b.name.clone()).collect()
}

/// `(taxCat, taxCatRoot)` passed through as found.
#[must_use]
pub fn extract_taxonomy(payload: &Value) -> (Value, Value) {
    let get = |key: &str| product_get(payload, &[key]).cloned().unwrap_or(Value::Null);
    (get("taxCat"), get("taxCatRoot"))
}

/// Copy of the product `brand` mapping with `link` and `logoUrl` absolutized.
///
/// Missing or empty brand gives an empty mapping; a brand that is present
/// but not a mapping gives `None`.
#[must_use]
pub fn extract_brand(payload: &Value, base_url: &str) -> Option<Map<String, Value>> {
    let brand = match product_get(payload, &["brand"]) {
        Some(v) if flag_is_set(v) => v,
        _ => return Some(Map::new()),
    };
    let mut out = brand.as_object()?.clone();
    for key in ["link", "logoUrl"] {
        if let Some(Value::String(url)) = out.get_mut(key) {
            *url = absolutize_url(url, base_url);
        }
    }
    Some(out)
}

/// Color labels, title-cased when shouted, deduplicated in first-seen order.
///
/// Each entry uses `displayLabel`, falling back to `name` when the label is
/// missing or empty. Only exact duplicates after normalization collapse, so
/// `"BLUE"` and `"Blue"` merge but `"blue"` stays separate.
#[must_use]
pub fn extract_colors(payload: &Value) -> Vec<String> {
    let Some(colors) = product_get(payload, &["colors"]).and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut out: Vec<String> = Vec::new();
    for color in colors {
        let label = color
            .get("displayLabel")
            .filter(|v| flag_is_set(v))
            .or_else(|| color.get("name"))
            .and_then(Value::as_str);
        let Some(label) = label else { continue };

        let normalized = if is_all_upper(label) {
            title_case(label.trim())
        } else {
            label.trim().to_owned()
        };
        if !out.contains(&normalized) {
            out.push(normalized);
        }
    }
    out
}

/// `sizesV2`, else `sizes`; every element rendered as text.
#[must_use]
pub fn extract_sizes(payload: &Value) -> Vec<String> {
    let sizes = product_get(payload, &["sizesV2"])
        .filter(|v| flag_is_set(v))
        .or_else(|| product_get(payload, &["sizes"]).filter(|v| flag_is_set(v)));

    match sizes {
        Some(Value::Array(items)) => items.iter().map(value_to_text).collect(),
        _ => Vec::new(),
    }
}

/// First non-empty list among `features`, `bullets`, `highlights`; else the
/// lines of `longDescription` with bullet markers stripped, at most 15.
#[must_use]
pub fn extract_features(payload: &Value) -> Vec<String> {
    for key in ["features", "bullets", "highlights"] {
        if let Some(items) = product_get(payload, &[key])
            .and_then(Value::as_array)
            .filter(|a| !a.is_empty())
        {
            return items
                .iter()
                .map(|item| value_to_text(item).trim().to_owned())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    let Some(long_desc) = product_get(payload, &["longDescription"])
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
    else {
        return Vec::new();
    };

    long_desc
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_matches(BULLET_CHARS).to_owned())
        .take(MAX_DESCRIPTION_FEATURES)
        .collect()
}

/// Specification name → value pairs.
///
/// Sources, first non-empty result wins: `specs` as a mapping, `specs` as a
/// list of `{name, value}` rows, `attributes` as a list of
/// `{name|label, value|text}` rows.
#[must_use]
pub fn extract_specs(payload: &Value) -> Map<String, Value> {
    let specs = product_get(payload, &["specs"]);

    if let Some(map) = specs.and_then(Value::as_object) {
        let out: Map<String, Value> = map
            .iter()
            .map(|(k, v)| (k.trim().to_owned(), Value::String(spec_text(v))))
            .collect();
        if !out.is_empty() {
            return out;
        }
    }

    if let Some(rows) = specs.and_then(Value::as_array) {
        let out = rows_to_specs(rows, &["name"], &["value"]);
        if !out.is_empty() {
            return out;
        }
    }

    if let Some(rows) = product_get(payload, &["attributes"]).and_then(Value::as_array) {
        return rows_to_specs(rows, &["name", "label"], &["value", "text"]);
    }

    Map::new()
}

/// Hero image URL, absolutized.
#[must_use]
pub fn extract_featured_image(payload: &Value, base_url: &str) -> Option<String> {
    product_get(payload, &["displayOptions", "featuredImage", "heroImageUrl"])
        .and_then(Value::as_str)
        .map(|url| absolutize_url(url, base_url))
}

/// Full image list with URLs absolutized.
#[must_use]
pub fn extract_images(payload: &Value, base_url: &str) -> Option<Vec<Value>> {
    product_get(payload, &["images"])
        .and_then(Value::as_array)
        .map(|items| absolutize_media(items, base_url))
}

/// Video list with URLs absolutized.
#[must_use]
pub fn extract_videos(payload: &Value, base_url: &str) -> Option<Vec<Value>> {
    product_get(payload, &["videos"])
        .and_then(Value::as_array)
        .map(|items| absolutize_media(items, base_url))
}

/// Absolutizes bare string entries and `*url`-named fields of object entries.
fn absolutize_media(items: &[Value], base_url: &str) -> Vec<Value> {
    items
        .iter()
        .map(|item| match item {
            Value::String(url) => Value::String(absolutize_url(url, base_url)),
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| {
                        let v = match v {
                            Value::String(url) if k.to_ascii_lowercase().ends_with("url") => {
                                Value::String(absolutize_url(url, base_url))
                            }
                            other => other.clone(),
                        };
                        (k.clone(), v)
                    })
                    .collect(),
            ),
            other => other.clone(),
        })
        .collect()
}

fn rows_to_specs(rows: &[Value], name_keys: &[&str], value_keys: &[&str]) -> Map<String, Value> {
    let first_set = |row: &Value, keys: &[&str]| -> Option<String> {
        keys.iter()
            .filter_map(|k| row.get(*k))
            .find(|v| flag_is_set(v))
            .map(|v| value_to_text(v).trim().to_owned())
    };

    let mut out = Map::new();
    for row in rows {
        if let (Some(name), Some(value)) = (first_set(row, name_keys), first_set(row, value_keys)) {
            out.insert(name, Value::String(value));
        }
    }
    out
}

fn spec_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => value_to_text(other).trim().to_owned(),
    }
}

/// At least one cased character and no lowercase ones.
fn is_all_upper(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Uppercases the first letter of each alphabetic run and lowercases the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
#[path = "fields_test.rs"]
mod tests;
