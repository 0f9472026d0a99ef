//! Output module for writing harvest results
//!
//! This module handles:
//! - Serializing records into the bulk-load document
//! - Reporting run statistics

mod bulk;
pub mod stats;

pub use bulk::{document_id, format_bulk, write_bulk, BulkWriter};
pub use stats::{format_summary, print_summary, RunSummary};

use thiserror::Error;

/// Errors that can occur while writing output
///
/// Any of these ends the run: the harvested records cannot be persisted.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
