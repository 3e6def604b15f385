//! Turns a raw embedded product payload into the canonical output document.

pub mod availability;
pub mod document;
pub mod fields;
pub mod path;
pub mod price;
pub mod prune;
pub mod ratings;
pub mod url;

pub use availability::{summarize_availability, Availability};
pub use document::normalize_document;
pub use path::{deep_get, flag_is_set};
pub use price::{summarize_prices, PriceSummary};
pub use prune::{is_empty_value, prune};
pub use ratings::{resolve_ratings, RatingSummary};
pub use url::absolutize_url;
