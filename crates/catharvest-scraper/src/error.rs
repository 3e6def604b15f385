use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("retryable HTTP status {status} from {url}")]
    RetryableStatus { status: u16, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("no embedded payload with element id \"{element_id}\"")]
    PayloadNotFound { element_id: String },

    #[error("rendering failed for {identifier}: {reason}")]
    Render { identifier: String, reason: String },
}
