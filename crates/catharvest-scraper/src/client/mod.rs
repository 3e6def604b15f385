//! HTTP client for the paginated search-listing endpoint.

mod request;

use std::time::Duration;

use catharvest_core::{HarvestConfig, TransportConfig};
use reqwest::Client;

use crate::error::ScraperError;
use crate::rate_limit::{jitter, RetryPolicy};
use crate::types::ListingPayload;

pub(crate) use request::{get_text, ACCEPT_HTML};

/// Builds the shared `reqwest::Client` with the configured connect and read
/// timeouts and `User-Agent`.
///
/// # Errors
///
/// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
/// cannot be constructed (e.g., invalid TLS config).
pub fn build_http_client(transport: &TransportConfig) -> Result<Client, ScraperError> {
    let client = Client::builder()
        .connect_timeout(Duration::from_secs(transport.connect_timeout_secs))
        .read_timeout(Duration::from_secs(transport.read_timeout_secs))
        .user_agent(transport.user_agent.as_str())
        .build()?;
    Ok(client)
}

/// Fetches one listing page at a time and reports the identifiers on it.
///
/// Transient failures (network errors, retryable statuses) are retried by
/// [`crate::rate_limit`]; whatever still fails after that is reported by
/// [`Self::fetch_page`] as a page with no identifiers. Cloning is cheap and
/// shares the connection pool.
#[derive(Debug, Clone)]
pub struct ListingClient {
    client: Client,
    policy: RetryPolicy,
    harvest: HarvestConfig,
}

impl ListingClient {
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the HTTP client cannot be built.
    pub fn new(transport: &TransportConfig, harvest: &HarvestConfig) -> Result<Self, ScraperError> {
        Ok(Self {
            client: build_http_client(transport)?,
            policy: RetryPolicy::from_transport(transport),
            harvest: harvest.clone(),
        })
    }

    /// Returns the identifiers on `page`, or an empty list on any failure.
    ///
    /// Never errors: network failures, non-200 responses and malformed bodies
    /// all collapse to "no identifiers", which the harvester counts toward its
    /// empty-page streak.
    pub async fn fetch_page(&self, page: u32) -> Vec<String> {
        match self.try_fetch_page(page).await {
            Ok(ids) => {
                tracing::debug!(page, count = ids.len(), "listing page fetched");
                ids
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "listing page failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Fetches and parses `page`, surfacing the failure cause.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: the templated URL does not parse.
    /// - [`ScraperError::RetryableStatus`] / [`ScraperError::Http`]: transient
    ///   failure that persisted through every retry.
    /// - [`ScraperError::UnexpectedStatus`]: any other non-200 status.
    /// - [`ScraperError::Deserialize`]: body is not a listing JSON document.
    pub async fn try_fetch_page(&self, page: u32) -> Result<Vec<String>, ScraperError> {
        let url = self.page_url(page)?;

        let delay = jitter(self.harvest.jitter_min_ms, self.harvest.jitter_max_ms);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let body = get_text(&self.client, &self.policy, &url, request::ACCEPT_JSON).await?;
        let payload =
            serde_json::from_str::<ListingPayload>(&body).map_err(|e| ScraperError::Deserialize {
                context: format!("listing page {page}"),
                source: e,
            })?;
        Ok(payload.identifiers())
    }

    /// Builds the URL for `page` from the listing template.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the substituted template is not
    /// an absolute URL.
    fn page_url(&self, page: u32) -> Result<String, ScraperError> {
        let raw = self.harvest.page_url(page);
        reqwest::Url::parse(&raw)
            .map(|u| u.to_string())
            .map_err(|e| ScraperError::InvalidUrl {
                url: raw,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
