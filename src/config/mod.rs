//! Configuration module for Catalog-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Running without a file uses the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use catalog_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Harvesting {}", config.catalog.listing_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CatalogConfig, Config, HttpConfig, OutputConfig, PipelineConfig, UserAgentConfig,
    DEFAULT_BULK_PATH, DEFAULT_LISTING_URL, DEFAULT_QUEUE_CAPACITY, DEFAULT_SITE_ORIGIN,
    DEFAULT_WORKER_COUNT,
};
pub use validation::{validate, MAX_WORKER_COUNT};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_or_default, parse_config,
};
