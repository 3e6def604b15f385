//! Integration tests for `ListingClient::fetch_page` and `harvest_identifiers`
//! against a local `wiremock` server.

use std::time::Duration;

use catharvest_core::{HarvestConfig, TransportConfig};
use catharvest_scraper::{harvest_identifiers, ListingClient, ScraperError, StopReason};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/c/womens-t-shirts";

fn harvest_config(server: &MockServer) -> HarvestConfig {
    HarvestConfig {
        listing_url_template: format!("{}{LISTING_PATH}?json=true&page={{page}}", server.uri()),
        base_url: server.uri(),
        jitter_min_ms: 0,
        jitter_max_ms: 0,
        ..HarvestConfig::default()
    }
}

/// Transport with fast, zero-backoff retries.
fn transport(max_retries: u32) -> TransportConfig {
    TransportConfig {
        max_retries,
        backoff_factor_secs: 0.0,
        ..TransportConfig::default()
    }
}

fn listing_body(ids: &[&str]) -> serde_json::Value {
    let results: Vec<_> = ids.iter().map(|id| json!({"prodId": id, "title": "x"})).collect();
    json!({"searchResults": {"results": results}})
}

async fn mount_page(server: &MockServer, page: u32, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(template)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// fetch_page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_page_returns_identifiers_in_page_order() {
    let server = MockServer::start().await;
    let body = json!({"searchResults": {"results": [
        {"prodId": "204512"},
        {"prodId": 188_001},
        {"prodId": null},
        {"prodId": ""},
        {"title": "no id"}
    ]}});
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(&body)).await;

    let client = ListingClient::new(&transport(0), &harvest_config(&server)).unwrap();
    assert_eq!(client.fetch_page(1).await, vec!["204512", "188001"]);
}

#[tokio::test]
async fn fetch_page_is_empty_on_not_found() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(404)).await;

    let client = ListingClient::new(&transport(3), &harvest_config(&server)).unwrap();
    assert!(client.fetch_page(1).await.is_empty());

    let err = client.try_fetch_page(1).await.unwrap_err();
    assert!(
        matches!(err, ScraperError::UnexpectedStatus { status: 404, .. }),
        "expected UnexpectedStatus, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_page_is_empty_on_malformed_body() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"),
    )
    .await;

    let client = ListingClient::new(&transport(0), &harvest_config(&server)).unwrap();
    assert!(client.fetch_page(1).await.is_empty());
    assert!(matches!(
        client.try_fetch_page(1).await.unwrap_err(),
        ScraperError::Deserialize { .. }
    ));
}

#[tokio::test]
async fn fetch_page_is_empty_when_results_missing() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(&json!({"searchResults": {}}))).await;

    let client = ListingClient::new(&transport(0), &harvest_config(&server)).unwrap();
    assert!(client.try_fetch_page(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_page_retries_retryable_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(&listing_body(&["42"]))).await;

    let client = ListingClient::new(&transport(2), &harvest_config(&server)).unwrap();
    assert_eq!(client.fetch_page(1).await, vec!["42"]);
}

#[tokio::test]
async fn fetch_page_gives_up_after_retries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let client = ListingClient::new(&transport(1), &harvest_config(&server)).unwrap();
    let err = client.try_fetch_page(1).await.unwrap_err();
    assert!(matches!(err, ScraperError::RetryableStatus { status: 429, .. }));
}

#[tokio::test]
async fn fetch_page_gives_up_when_server_stalls_past_read_timeout() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200)
            .set_body_json(&listing_body(&["late"]))
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let transport = TransportConfig {
        read_timeout_secs: 1,
        ..transport(0)
    };
    let client = ListingClient::new(&transport, &harvest_config(&server)).unwrap();
    let err = client.try_fetch_page(1).await.unwrap_err();
    assert!(matches!(err, ScraperError::Http(_)), "expected Http timeout, got: {err:?}");
}

#[tokio::test]
async fn response_within_read_timeout_succeeds() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200)
            .set_body_json(&listing_body(&["on-time"]))
            .set_delay(Duration::from_millis(200)),
    )
    .await;

    let transport = TransportConfig {
        read_timeout_secs: 2,
        ..transport(0)
    };
    let client = ListingClient::new(&transport, &harvest_config(&server)).unwrap();
    assert_eq!(client.fetch_page(1).await, vec!["on-time"]);
}

// ---------------------------------------------------------------------------
// harvest over HTTP
// ---------------------------------------------------------------------------

#[tokio::test]
async fn harvest_collects_target_across_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(&listing_body(&["a", "b", "c"]))).await;
    mount_page(&server, 2, ResponseTemplate::new(200).set_body_json(&listing_body(&["c", "d", "e"]))).await;
    mount_page(&server, 3, ResponseTemplate::new(200).set_body_json(&listing_body(&["f", "g"]))).await;
    // Unmatched pages fall through to wiremock's 404, i.e. empty pages.

    let config = HarvestConfig {
        target_count: 5,
        max_workers: 2,
        ..harvest_config(&server)
    };
    let client = ListingClient::new(&transport(0), &config).unwrap();

    let outcome = harvest_identifiers(&config, move |page| {
        let client = client.clone();
        async move { client.fetch_page(page).await }
    })
    .await
    .unwrap();

    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
    assert_eq!(outcome.identifiers.len(), 5);
    let mut sorted = outcome.identifiers.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), 5, "identifiers must be unique");
}

#[tokio::test]
async fn harvest_stops_on_empty_streak_when_catalog_runs_out() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_json(&listing_body(&["a", "b"]))).await;

    let config = HarvestConfig {
        target_count: 100,
        max_workers: 1,
        max_empty_pages: 3,
        ..harvest_config(&server)
    };
    let client = ListingClient::new(&transport(0), &config).unwrap();

    let outcome = harvest_identifiers(&config, move |page| {
        let client = client.clone();
        async move { client.fetch_page(page).await }
    })
    .await
    .unwrap();

    assert_eq!(outcome.stop_reason, StopReason::EmptyStreak);
    assert_eq!(outcome.identifiers, vec!["a", "b"]);
    assert_eq!(outcome.pages_completed, 4);
}
