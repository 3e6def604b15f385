//! Single-GET helper shared by the listing client and the HTTP renderer.

use reqwest::{Client, StatusCode};

use crate::error::ScraperError;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};

pub(crate) const ACCEPT_JSON: &str = "application/json,text/html;q=0.9,*/*;q=0.8";
pub(crate) const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Issues a GET for `url` and returns the body of a `200 OK` response.
///
/// Statuses listed in the policy are retried with backoff; any other non-200
/// status is returned as [`ScraperError::UnexpectedStatus`] without retrying.
pub(crate) async fn get_text(
    client: &Client,
    policy: &RetryPolicy,
    url: &str,
    accept: &str,
) -> Result<String, ScraperError> {
    retry_with_backoff(policy, || async move {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, accept)
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::CACHE_CONTROL, "max-age=0")
            .send()
            .await?;
        let status = response.status();

        if status != StatusCode::OK {
            let status = status.as_u16();
            let url = url.to_owned();
            return Err(if policy.is_retryable_status(status) {
                ScraperError::RetryableStatus { status, url }
            } else {
                ScraperError::UnexpectedStatus { status, url }
            });
        }

        Ok(response.text().await?)
    })
    .await
}
