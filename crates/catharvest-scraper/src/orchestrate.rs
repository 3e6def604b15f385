//! Per-identifier extraction: render, locate payload, normalize.

use catharvest_core::{ExtractConfig, TransportConfig};
use reqwest::Client;
use serde_json::Value;

use crate::client::{build_http_client, get_text, ACCEPT_HTML};
use crate::embed::extract_embedded_payload;
use crate::error::ScraperError;
use crate::normalize::normalize_document;
use crate::rate_limit::{jitter, RetryPolicy};

/// Turns a product identifier into rendered page content (HTML or raw JSON).
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    /// # Errors
    ///
    /// Any failure to obtain content for `identifier`. The orchestrator logs
    /// it and moves on to the next identifier.
    async fn render(&mut self, identifier: &str) -> Result<String, ScraperError>;
}

/// Renders a product page with a plain HTTP GET of the product URL.
///
/// Suitable when the page ships its payload in the initial HTML; a browser
/// session can stand in through [`PageRenderer`] when it does not.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
    policy: RetryPolicy,
    extract: ExtractConfig,
}

impl HttpRenderer {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(transport: &TransportConfig, extract: &ExtractConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            client: build_http_client(transport)?,
            policy: RetryPolicy::from_transport(transport),
            extract: extract.clone(),
        })
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&mut self, identifier: &str) -> Result<String, ScraperError> {
        let url = self.extract.product_url(identifier);
        reqwest::Url::parse(&url).map_err(|e| ScraperError::InvalidUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        get_text(&self.client, &self.policy, &url, ACCEPT_HTML).await
    }
}

/// Locates the embedded payload in `content` and normalizes it.
///
/// # Errors
///
/// Propagates [`extract_embedded_payload`] failures.
pub fn normalize_rendered(
    content: &str,
    element_id: &str,
    base_url: &str,
) -> Result<Value, ScraperError> {
    let payload = extract_embedded_payload(content, element_id)?;
    Ok(normalize_document(&payload, base_url))
}

/// Documents produced by one extraction run, in identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub documents: Vec<Value>,
    /// Identifiers that produced no document.
    pub failed: Vec<String>,
}

/// Renders and normalizes every identifier in order, one at a time.
///
/// A failure on one identifier is logged and skipped; it never aborts the
/// run. A random delay from the configured item-delay window separates
/// consecutive items.
pub async fn extract_documents<R: PageRenderer>(
    renderer: &mut R,
    identifiers: &[String],
    config: &ExtractConfig,
    base_url: &str,
) -> ExtractionReport {
    let total = identifiers.len();
    let mut report = ExtractionReport::default();

    for (index, identifier) in identifiers.iter().enumerate() {
        if index > 0 {
            let delay = jitter(config.item_delay_min_ms, config.item_delay_max_ms);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        let result = match renderer.render(identifier).await {
            Ok(content) => normalize_rendered(&content, &config.payload_element_id, base_url),
            Err(e) => Err(e),
        };

        match result {
            Ok(document) => {
                tracing::info!(item = index + 1, total, identifier = %identifier, "product extracted");
                report.documents.push(document);
            }
            Err(e) => {
                tracing::warn!(item = index + 1, total, identifier = %identifier, error = %e, "product skipped");
                report.failed.push(identifier.clone());
            }
        }
    }

    tracing::info!(
        extracted = report.documents.len(),
        failed = report.failed.len(),
        "extraction finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    /// Serves canned content per identifier and records render order.
    struct FakeRenderer {
        pages: HashMap<String, Result<String, String>>,
        rendered: Vec<String>,
    }

    impl FakeRenderer {
        fn new(pages: &[(&str, Result<&str, &str>)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(id, page)| {
                        ((*id).to_owned(), page.map(str::to_owned).map_err(str::to_owned))
                    })
                    .collect(),
                rendered: Vec::new(),
            }
        }
    }

    impl PageRenderer for FakeRenderer {
        async fn render(&mut self, identifier: &str) -> Result<String, ScraperError> {
            self.rendered.push(identifier.to_owned());
            match self.pages.get(identifier) {
                Some(Ok(content)) => Ok(content.clone()),
                Some(Err(reason)) => Err(ScraperError::Render {
                    identifier: identifier.to_owned(),
                    reason: reason.clone(),
                }),
                None => Err(ScraperError::Render {
                    identifier: identifier.to_owned(),
                    reason: "unknown".to_owned(),
                }),
            }
        }
    }

    fn config() -> ExtractConfig {
        ExtractConfig {
            item_delay_min_ms: 0,
            item_delay_max_ms: 0,
            ..ExtractConfig::default()
        }
    }

    const PAGE_A: &str =
        r#"<html><script id="modelData">{"pageData":{"product":{"styleId":"A"}}}</script></html>"#;
    const PAGE_C: &str = r#"{"pageData":{"product":{"styleId":"C"}}}"#;

    #[tokio::test]
    async fn failures_are_skipped_and_order_kept() {
        let mut renderer = FakeRenderer::new(&[
            ("A", Ok(PAGE_A)),
            ("B", Err("browser crashed")),
            ("C", Ok(PAGE_C)),
            ("D", Ok("<html>no payload</html>")),
            ("E", Ok(r#"{"error":"Access Denied","status":403}"#)),
        ]);
        let ids: Vec<String> = ["A", "B", "C", "D", "E"].iter().map(|s| (*s).to_owned()).collect();

        let report = extract_documents(&mut renderer, &ids, &config(), "https://www.rei.com").await;

        assert_eq!(renderer.rendered, ids);
        assert_eq!(report.documents.len(), 2);
        assert_eq!(report.documents[0]["productId"], json!("A"));
        assert_eq!(report.documents[1]["productId"], json!("C"));
        assert_eq!(
            report.failed,
            vec!["B".to_owned(), "D".to_owned(), "E".to_owned()]
        );
    }

    #[tokio::test]
    async fn no_identifiers_gives_empty_report() {
        let mut renderer = FakeRenderer::new(&[]);
        let report = extract_documents(&mut renderer, &[], &config(), "https://www.rei.com").await;
        assert_eq!(report, ExtractionReport::default());
        assert!(renderer.rendered.is_empty());
    }

    #[test]
    fn normalize_rendered_uses_configured_element() {
        let html = r#"<script id="productJson">{"pageData":{"product":{"styleId":7}}}</script>"#;
        let doc = normalize_rendered(html, "productJson", "https://www.rei.com").unwrap();
        assert_eq!(doc["productId"], json!("7"));
        assert!(normalize_rendered(html, "modelData", "https://www.rei.com").is_err());
    }
}
