//! Catalog-Harvest: a concurrent catalog scraper
//!
//! This crate harvests a ranked catalog listing and its detail pages, extracts a
//! normalized record per item, and writes the result as a bulk-load document.

pub mod config;
pub mod harvest;
pub mod output;
pub mod record;

use thiserror::Error;

/// Main error type for Catalog-Harvest operations
///
/// Only run-level failures surface here. Per-page failures are absorbed by the
/// pipeline and reported through [`harvest::HarvestReport`].
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Catalog-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{harvest, HarvestReport, IndexCollector, Pipeline};
pub use output::BulkWriter;
pub use record::{Extraction, Field, FieldIssue, Record};
