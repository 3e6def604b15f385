use crate::ConfigError;

/// Placeholder substituted with the page number in
/// [`HarvestConfig::listing_url_template`].
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Placeholder substituted with the product identifier in
/// [`ExtractConfig::product_url_template`].
pub const ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_BASE_URL: &str = "https://www.rei.com";
pub const DEFAULT_LISTING_URL_TEMPLATE: &str =
    "https://www.rei.com/c/womens-t-shirts?json=true&page={page}";
pub const DEFAULT_PRODUCT_URL_TEMPLATE: &str = "https://www.rei.com/product/{id}";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139 Safari/537.36";
pub const DEFAULT_RETRY_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Controls the concurrent listing-page harvester.
#[derive(Debug, Clone, PartialEq)]
pub struct HarvestConfig {
    /// Number of unique identifiers to collect before stopping.
    pub target_count: usize,
    /// First page number requested.
    pub start_page: u32,
    /// Number of page fetches kept in flight.
    pub max_workers: usize,
    /// Consecutive empty pages tolerated before the harvest stops.
    pub max_empty_pages: u32,
    pub listing_url_template: String,
    /// Site root used to absolutize relative URLs in product payloads.
    pub base_url: String,
    /// Lower bound of the random delay before each page request.
    pub jitter_min_ms: u64,
    /// Upper bound of the random delay before each page request; `0` disables it.
    pub jitter_max_ms: u64,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            target_count: 90,
            start_page: 1,
            max_workers: 8,
            max_empty_pages: 3,
            listing_url_template: DEFAULT_LISTING_URL_TEMPLATE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            jitter_min_ms: 20,
            jitter_max_ms: 120,
        }
    }
}

impl HarvestConfig {
    /// Checks the invariants the harvester relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a zero pool size, zero target,
    /// zero empty-page threshold, a template without `{page}`, or inverted
    /// jitter bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_count == 0 {
            return Err(ConfigError::Validation(
                "target_count must be greater than zero".to_string(),
            ));
        }
        if self.max_workers == 0 {
            return Err(ConfigError::Validation(
                "max_workers must be greater than zero".to_string(),
            ));
        }
        if self.max_empty_pages == 0 {
            return Err(ConfigError::Validation(
                "max_empty_pages must be greater than zero".to_string(),
            ));
        }
        if !self.listing_url_template.contains(PAGE_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "listing_url_template must contain {PAGE_PLACEHOLDER}: {}",
                self.listing_url_template
            )));
        }
        if self.jitter_max_ms > 0 && self.jitter_min_ms > self.jitter_max_ms {
            return Err(ConfigError::Validation(format!(
                "jitter_min_ms ({}) exceeds jitter_max_ms ({})",
                self.jitter_min_ms, self.jitter_max_ms
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn page_url(&self, page: u32) -> String {
        self.listing_url_template
            .replace(PAGE_PLACEHOLDER, &page.to_string())
    }
}

/// HTTP client settings shared by the listing fetcher and the product renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportConfig {
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub user_agent: String,
    /// Status codes retried with backoff. Anything else non-2xx fails immediately.
    pub retry_statuses: Vec<u16>,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Wait before the n-th retry is `backoff_factor_secs * 2^(n-1)` seconds.
    pub backoff_factor_secs: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            read_timeout_secs: 20,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
            max_retries: 5,
            backoff_factor_secs: 0.5,
        }
    }
}

impl TransportConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the backoff factor is negative
    /// or not finite, or if either timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.backoff_factor_secs.is_finite() || self.backoff_factor_secs < 0.0 {
            return Err(ConfigError::Validation(format!(
                "backoff_factor_secs must be a non-negative number, got {}",
                self.backoff_factor_secs
            )));
        }
        if self.connect_timeout_secs == 0 || self.read_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request timeouts must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Settings for the per-identifier extraction pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    pub product_url_template: String,
    /// `id` attribute of the script element carrying the product payload.
    pub payload_element_id: String,
    pub item_delay_min_ms: u64,
    /// Upper bound of the pause between identifiers; `0` disables it.
    pub item_delay_max_ms: u64,
    pub ids_path: String,
    pub output_path: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            product_url_template: DEFAULT_PRODUCT_URL_TEMPLATE.to_string(),
            payload_element_id: "modelData".to_string(),
            item_delay_min_ms: 5_000,
            item_delay_max_ms: 8_000,
            ids_path: "product_ids.json".to_string(),
            output_path: "extracted_product_data.json".to_string(),
        }
    }
}

impl ExtractConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a template without `{id}`, an
    /// empty element id, or inverted delay bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.product_url_template.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "product_url_template must contain {ID_PLACEHOLDER}: {}",
                self.product_url_template
            )));
        }
        if self.payload_element_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "payload_element_id must not be empty".to_string(),
            ));
        }
        if self.item_delay_max_ms > 0 && self.item_delay_min_ms > self.item_delay_max_ms {
            return Err(ConfigError::Validation(format!(
                "item_delay_min_ms ({}) exceeds item_delay_max_ms ({})",
                self.item_delay_min_ms, self.item_delay_max_ms
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn product_url(&self, identifier: &str) -> String {
        self.product_url_template.replace(ID_PLACEHOLDER, identifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub log_level: String,
    pub harvest: HarvestConfig,
    pub transport: TransportConfig,
    pub extract: ExtractConfig,
}
