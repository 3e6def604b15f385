//! Integration tests for `HttpRenderer` and the extraction loop over HTTP.

use catharvest_core::{ExtractConfig, TransportConfig};
use catharvest_scraper::{extract_documents, HttpRenderer, PageRenderer, ScraperError};
use serde_json::json;
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn extract_config(server: &MockServer) -> ExtractConfig {
    ExtractConfig {
        product_url_template: format!("{}/product/{{id}}", server.uri()),
        item_delay_min_ms: 0,
        item_delay_max_ms: 0,
        ..ExtractConfig::default()
    }
}

fn no_retries() -> TransportConfig {
    TransportConfig {
        max_retries: 0,
        backoff_factor_secs: 0.0,
        ..TransportConfig::default()
    }
}

fn product_page(style_id: &str) -> String {
    let payload = json!({
        "title": format!("Product {style_id} | REI Co-op"),
        "pageData": {"product": {
            "styleId": style_id,
            "images": [{"url": "/media/x.jpg"}],
            "skus": [{"sellable": true}]
        }}
    });
    format!(r#"<html><head><script id="modelData" type="application/json">{payload}</script></head></html>"#)
}

#[tokio::test]
async fn renders_templated_product_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/204512"))
        .and(header_exists("accept"))
        .respond_with(ResponseTemplate::new(200).set_body_string(product_page("204512")))
        .expect(1)
        .mount(&server)
        .await;

    let mut renderer = HttpRenderer::new(&no_retries(), &extract_config(&server)).unwrap();
    let html = renderer.render("204512").await.unwrap();
    assert!(html.contains("modelData"));
}

#[tokio::test]
async fn render_reports_non_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let mut renderer = HttpRenderer::new(&no_retries(), &extract_config(&server)).unwrap();
    let err = renderer.render("1").await.unwrap_err();
    assert!(matches!(err, ScraperError::UnexpectedStatus { status: 403, .. }));
}

#[tokio::test]
async fn extraction_normalizes_and_skips_failures() {
    let server = MockServer::start().await;
    for id in ["100", "300"] {
        Mock::given(method("GET"))
            .and(path(format!("/product/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(product_page(id)))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/product/200"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>no payload</html>"))
        .mount(&server)
        .await;

    let config = extract_config(&server);
    let mut renderer = HttpRenderer::new(&no_retries(), &config).unwrap();
    let ids: Vec<String> = ["100", "200", "300", "400"].iter().map(|s| (*s).to_owned()).collect();

    let report = extract_documents(&mut renderer, &ids, &config, "https://www.rei.com").await;

    assert_eq!(report.failed, vec!["200".to_owned(), "400".to_owned()]);
    assert_eq!(report.documents.len(), 2);
    let first = &report.documents[0];
    assert_eq!(first["productId"], json!("100"));
    assert_eq!(first["productName"], json!("Product 100"));
    assert_eq!(first["media"]["allImages"][0]["url"], json!("https://www.rei.com/media/x.jpg"));
    assert_eq!(first["availability"], json!("In stock — Most options available."));
    assert_eq!(first["skus"], json!([{"sellable": true}]));
}
