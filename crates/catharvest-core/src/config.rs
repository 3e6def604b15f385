use std::str::FromStr;

use crate::app_config::{AppConfig, ExtractConfig, HarvestConfig, TransportConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are malformed or fail validation.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files. Use it when
/// the caller manages the environment itself.
///
/// # Errors
///
/// Returns `ConfigError` if values are malformed or fail validation.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables take the defaults of
/// [`HarvestConfig`], [`TransportConfig`] and [`ExtractConfig`].
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let harvest_defaults = HarvestConfig::default();
    let transport_defaults = TransportConfig::default();
    let extract_defaults = ExtractConfig::default();

    let harvest = HarvestConfig {
        target_count: parse_var(&lookup, "CATHARVEST_TARGET_COUNT", harvest_defaults.target_count)?,
        start_page: parse_var(&lookup, "CATHARVEST_START_PAGE", harvest_defaults.start_page)?,
        max_workers: parse_var(&lookup, "CATHARVEST_MAX_WORKERS", harvest_defaults.max_workers)?,
        max_empty_pages: parse_var(
            &lookup,
            "CATHARVEST_MAX_EMPTY_PAGES",
            harvest_defaults.max_empty_pages,
        )?,
        listing_url_template: or_default(
            "CATHARVEST_LISTING_URL_TEMPLATE",
            &harvest_defaults.listing_url_template,
        ),
        base_url: or_default("CATHARVEST_BASE_URL", &harvest_defaults.base_url)
            .trim_end_matches('/')
            .to_string(),
        jitter_min_ms: parse_var(&lookup, "CATHARVEST_JITTER_MIN_MS", harvest_defaults.jitter_min_ms)?,
        jitter_max_ms: parse_var(&lookup, "CATHARVEST_JITTER_MAX_MS", harvest_defaults.jitter_max_ms)?,
    };

    let retry_statuses = match lookup("CATHARVEST_RETRY_STATUSES") {
        Ok(raw) => parse_status_list(&raw)?,
        Err(_) => transport_defaults.retry_statuses.clone(),
    };

    let transport = TransportConfig {
        connect_timeout_secs: parse_var(
            &lookup,
            "CATHARVEST_CONNECT_TIMEOUT_SECS",
            transport_defaults.connect_timeout_secs,
        )?,
        read_timeout_secs: parse_var(
            &lookup,
            "CATHARVEST_READ_TIMEOUT_SECS",
            transport_defaults.read_timeout_secs,
        )?,
        user_agent: or_default("CATHARVEST_USER_AGENT", &transport_defaults.user_agent),
        retry_statuses,
        max_retries: parse_var(&lookup, "CATHARVEST_MAX_RETRIES", transport_defaults.max_retries)?,
        backoff_factor_secs: parse_var(
            &lookup,
            "CATHARVEST_BACKOFF_FACTOR_SECS",
            transport_defaults.backoff_factor_secs,
        )?,
    };

    let extract = ExtractConfig {
        product_url_template: or_default(
            "CATHARVEST_PRODUCT_URL_TEMPLATE",
            &extract_defaults.product_url_template,
        ),
        payload_element_id: or_default(
            "CATHARVEST_PAYLOAD_ELEMENT_ID",
            &extract_defaults.payload_element_id,
        ),
        item_delay_min_ms: parse_var(
            &lookup,
            "CATHARVEST_ITEM_DELAY_MIN_MS",
            extract_defaults.item_delay_min_ms,
        )?,
        item_delay_max_ms: parse_var(
            &lookup,
            "CATHARVEST_ITEM_DELAY_MAX_MS",
            extract_defaults.item_delay_max_ms,
        )?,
        ids_path: or_default("CATHARVEST_IDS_PATH", &extract_defaults.ids_path),
        output_path: or_default("CATHARVEST_OUTPUT_PATH", &extract_defaults.output_path),
    };

    harvest.validate()?;
    transport.validate()?;
    extract.validate()?;

    Ok(AppConfig {
        log_level: or_default("CATHARVEST_LOG_LEVEL", "info"),
        harvest,
        transport,
        extract,
    })
}

/// Parses `var` with [`FromStr`], falling back to `default` when it is unset.
fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Parses a comma-separated list of HTTP status codes such as `"429,503"`.
fn parse_status_list(raw: &str) -> Result<Vec<u16>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            let code = s.parse::<u16>().map_err(|e| ConfigError::InvalidEnvVar {
                var: "CATHARVEST_RETRY_STATUSES".to_string(),
                reason: format!("\"{s}\": {e}"),
            })?;
            if (100..=599).contains(&code) {
                Ok(code)
            } else {
                Err(ConfigError::InvalidEnvVar {
                    var: "CATHARVEST_RETRY_STATUSES".to_string(),
                    reason: format!("{code} is not an HTTP status code"),
                })
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
