pub mod client;
pub mod embed;
pub mod error;
pub mod harvest;
pub mod normalize;
pub mod orchestrate;
pub mod rate_limit;
pub mod types;

pub use client::{build_http_client, ListingClient};
pub use embed::extract_embedded_payload;
pub use error::ScraperError;
pub use harvest::{harvest_identifiers, HarvestOutcome, IdentifierSet, StopReason};
pub use normalize::normalize_document;
pub use orchestrate::{
    extract_documents, normalize_rendered, ExtractionReport, HttpRenderer, PageRenderer,
};
pub use rate_limit::RetryPolicy;
