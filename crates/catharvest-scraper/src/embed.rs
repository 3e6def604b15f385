//! Locates the JSON product payload embedded in a rendered page.

use regex::Regex;
use serde_json::Value;

use crate::error::ScraperError;
use crate::normalize::path::{deep_get, PRODUCT_PATH};

/// Parses the contents of the `<script id="{element_id}">` element in
/// `content`.
///
/// Rendered content that carries no such element but is itself a JSON
/// product payload (an object with a `pageData.product` node) is parsed
/// whole. Any other JSON body, such as an error or challenge response, counts
/// as a missing payload.
///
/// # Errors
///
/// - [`ScraperError::PayloadNotFound`] if neither form is present.
/// - [`ScraperError::Deserialize`] if the located text is not valid JSON.
pub fn extract_embedded_payload(content: &str, element_id: &str) -> Result<Value, ScraperError> {
    let not_found = || ScraperError::PayloadNotFound {
        element_id: element_id.to_owned(),
    };

    let pattern = format!(
        r#"(?is)<script\b[^>]*\sid\s*=\s*["']{}["'][^>]*>(.*?)</script>"#,
        regex::escape(element_id)
    );
    let script_re = Regex::new(&pattern).map_err(|_| not_found())?;

    if let Some(m) = script_re.captures(content).and_then(|cap| cap.get(1)) {
        return serde_json::from_str(m.as_str().trim()).map_err(|e| ScraperError::Deserialize {
            context: format!("embedded payload \"{element_id}\""),
            source: e,
        });
    }

    let trimmed = content.trim();
    if !trimmed.starts_with('{') {
        return Err(not_found());
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) if deep_get(&value, &PRODUCT_PATH).is_some_and(Value::is_object) => Ok(value),
        _ => Err(not_found()),
    }
}
