//! Retry utilities for idempotent GET requests.
//!
//! Provides exponential backoff retry logic for transient HTTP errors: network
//! failures and the configured set of retryable status codes. Non-retriable
//! errors (other statuses, parse failures) are propagated immediately.

use std::future::Future;
use std::time::Duration;

use catharvest_core::TransportConfig;

use crate::error::ScraperError;

/// Longest single wait between attempts, regardless of the backoff factor.
const MAX_BACKOFF: Duration = Duration::from_secs(120);

/// Retry settings extracted from [`TransportConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub backoff_factor_secs: f64,
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    #[must_use]
    pub fn from_transport(config: &TransportConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor_secs: config.backoff_factor_secs,
            retry_statuses: config.retry_statuses.clone(),
        }
    }

    #[must_use]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Wait before retry number `retry` (1-based): `factor * 2^(retry-1)` seconds.
    #[must_use]
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let exponent = i32::try_from(retry.saturating_sub(1).min(30)).unwrap_or(30);
        let secs = self.backoff_factor_secs * 2f64.powi(exponent);
        if !secs.is_finite() || secs <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(secs).map_or(MAX_BACKOFF, |d| d.min(MAX_BACKOFF))
    }
}

/// Random pause in `[min_ms, max_ms]` used to desynchronise requests.
///
/// A `max_ms` of zero disables the pause.
pub(crate) fn jitter(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms == 0 {
        return Duration::ZERO;
    }
    let low = min_ms.min(max_ms);
    Duration::from_millis(rand::random_range(low..=max_ms))
}

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable errors:
/// - [`ScraperError::RetryableStatus`]: the server answered with one of the
///   configured retryable codes (429, 5xx by default).
/// - [`ScraperError::Http`]: network-level failure (connection reset, timeout, etc.).
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RetryableStatus { .. } | ScraperError::Http(_)
    )
}

/// Executes `operation` with exponential backoff retries on transient errors.
///
/// On a retriable error the function sleeps for [`RetryPolicy::backoff_for`]
/// and tries again, up to `max_retries` additional attempts after the first
/// try. If all retries are exhausted the last error is returned.
///
/// # Backoff schedule (example with `backoff_factor_secs = 0.5`)
///
/// | Attempt | Sleep before next attempt |
/// |---------|--------------------------|
/// | 0 (initial) | none |
/// | 1 (first retry) | 0.5 × 2^0 = 0.5 s |
/// | 2 (second retry) | 0.5 × 2^1 = 1 s |
/// | 3 (third retry) | 0.5 × 2^2 = 2 s |
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= policy.max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = policy.backoff_for(attempt);
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient request error, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
