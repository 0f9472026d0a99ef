//! Harvest module: collecting, fetching, and extracting catalog pages
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching behind the [`PageFetcher`] seam
//! - HTML parsing into queryable [`Document`]s
//! - Listing page collection and record extraction
//! - The concurrent worker [`Pipeline`]

mod document;
mod extractor;
mod fetcher;
mod index;
mod pipeline;

pub use document::{Document, ParseError};
pub use extractor::{
    clean_summary, clean_title, credit_group, extract_record, parse_cast, parse_country,
    parse_primary_credit, parse_release_date,
};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher};
pub use index::{detail_urls, IndexCollector};
pub use pipeline::{HarvestReport, PageError, PageFailure, Pipeline, PipelineSettings};

use crate::config::Config;
use crate::output::{BulkWriter, RunSummary};
use crate::HarvestError;
use std::sync::Arc;
use std::time::Instant;

/// Runs a complete harvest
///
/// This is the main entry point. It will:
/// 1. Build the HTTP client
/// 2. Collect detail-page URLs from the listing page
/// 3. Fetch and extract every page through the worker pool
/// 4. Write the bulk-load document, overwriting any previous file
///
/// Per-page failures are logged and counted. Only client construction and
/// the final write can fail the run.
pub async fn harvest(config: &Config) -> Result<RunSummary, HarvestError> {
    let started = Instant::now();

    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpFetcher::from_config(&config.user_agent, &config.http)?);

    let collector = IndexCollector::from_config(Arc::clone(&fetcher), &config.catalog)?;
    let urls = collector.collect_urls().await;
    if urls.is_empty() {
        tracing::warn!("No detail pages found on {}", config.catalog.listing_url);
    }
    let pages_queued = urls.len();

    let pipeline = Pipeline::new(fetcher, PipelineSettings::from(&config.pipeline));
    let report = pipeline.run(urls).await;

    let pages_skipped = report.failures.len();
    let incomplete_records = report.incomplete_count();
    let worker_panics = report.worker_panics;
    let records = report.into_records(config.pipeline.drop_incomplete);
    let elapsed = started.elapsed();

    let writer = BulkWriter::new(&config.output.bulk_path);
    writer.write(&records)?;
    tracing::info!(
        "Wrote {} records to {}",
        records.len(),
        writer.path().display()
    );

    Ok(RunSummary {
        records_written: records.len(),
        pages_queued,
        pages_skipped,
        incomplete_records,
        worker_panics,
        elapsed,
    })
}

/// Collects the listing page only, without fetching any detail page
pub async fn collect(config: &Config) -> Result<Vec<String>, HarvestError> {
    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(HttpFetcher::from_config(&config.user_agent, &config.http)?);
    let collector = IndexCollector::from_config(fetcher, &config.catalog)?;
    Ok(collector.collect_urls().await)
}
