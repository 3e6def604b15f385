//! Configuration shared by the catharvest crates.

pub mod app_config;
pub mod config;

use thiserror::Error;

pub use app_config::{AppConfig, ExtractConfig, HarvestConfig, TransportConfig};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
