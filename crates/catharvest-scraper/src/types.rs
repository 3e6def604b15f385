//! Response types for the paginated search-listing endpoint.
//!
//! ## Observed shape
//!
//! ```json
//! {"searchResults": {"results": [{"prodId": "2045", "...": "..."}]}}
//! ```
//!
//! `prodId` is usually a string but numeric values also appear; either form is
//! kept as text. Items with a missing, `null`, or empty identifier are dropped
//! before the page is counted, so a page of only blank identifiers is an
//! empty page.

use serde::Deserialize;
use serde_json::Value;

/// Top-level body of one listing page.
#[derive(Debug, Default, Deserialize)]
pub struct ListingPayload {
    #[serde(rename = "searchResults", default)]
    pub search_results: Option<SearchResults>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub results: Option<Vec<SearchResultItem>>,
}

/// One search hit. Only the identifier is retained.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResultItem {
    #[serde(rename = "prodId", default)]
    pub prod_id: Option<Value>,
}

impl SearchResultItem {
    /// The identifier as a string, or `None` when it is absent or blank.
    #[must_use]
    pub fn identifier(&self) -> Option<String> {
        match self.prod_id.as_ref()? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl ListingPayload {
    /// Identifiers in page order, blanks removed.
    #[must_use]
    pub fn identifiers(&self) -> Vec<String> {
        self.search_results
            .as_ref()
            .and_then(|r| r.results.as_ref())
            .map(|items| items.iter().filter_map(SearchResultItem::identifier).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ListingPayload {
        serde_json::from_str(body).expect("valid listing JSON")
    }

    #[test]
    fn extracts_string_and_numeric_identifiers() {
        let payload = parse(r#"{"searchResults":{"results":[{"prodId":"2045"},{"prodId":1783}]}}"#);
        assert_eq!(payload.identifiers(), vec!["2045", "1783"]);
    }

    #[test]
    fn drops_blank_and_missing_identifiers() {
        let payload = parse(
            r#"{"searchResults":{"results":[{"prodId":null},{"prodId":""},{"name":"x"},{"prodId":"9"}]}}"#,
        );
        assert_eq!(payload.identifiers(), vec!["9"]);
    }

    #[test]
    fn all_null_identifiers_yield_empty_page() {
        let payload = parse(r#"{"searchResults":{"results":[{"prodId":null},{"prodId":null}]}}"#);
        assert!(payload.identifiers().is_empty());
    }

    #[test]
    fn missing_search_results_is_empty() {
        assert!(parse("{}").identifiers().is_empty());
        assert!(parse(r#"{"searchResults":{}}"#).identifiers().is_empty());
        assert!(parse(r#"{"searchResults":{"results":null}}"#)
            .identifiers()
            .is_empty());
    }
}
