//! Concurrent fetch/extract pipeline
//!
//! A fixed pool of workers consumes detail-page URLs from one bounded queue.
//! Each worker fetches, parses, and extracts a page, then sends the outcome
//! into a shared result channel:
//!
//! ```text
//! producer ──► [work queue] ──► worker 0..N ──► [result channel] ──► run()
//! ```
//!
//! The producer closes the queue after the last URL. The result channel closes
//! once every worker has dropped its sender, and `run` joins all workers before
//! returning, so callers only ever see the complete collection. No ordering is
//! guaranteed across workers.

use crate::config::PipelineConfig;
use crate::harvest::document::{Document, ParseError};
use crate::harvest::extractor::extract_record;
use crate::harvest::fetcher::{FetchError, PageFetcher};
use crate::record::{Extraction, Record};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Per-URL failure; the URL is skipped and the batch continues
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// A URL that produced no record
#[derive(Debug)]
pub struct PageFailure {
    pub url: String,
    pub error: PageError,
}

/// Everything one pipeline run produced
#[derive(Debug, Default)]
pub struct HarvestReport {
    /// One entry per successfully fetched and parsed page, in completion order
    pub extractions: Vec<Extraction>,

    /// URLs skipped because their page could not be fetched or parsed
    pub failures: Vec<PageFailure>,

    /// Workers that ended abnormally; the URL each was holding is lost
    pub worker_panics: usize,
}

impl HarvestReport {
    /// Number of extractions with at least one empty field
    pub fn incomplete_count(&self) -> usize {
        self.extractions.iter().filter(|e| !e.is_complete()).count()
    }

    /// All extracted records, complete or not
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.extractions.iter().map(|e| &e.record)
    }

    /// Records whose every field was extracted
    pub fn complete_records(&self) -> impl Iterator<Item = &Record> {
        self.extractions
            .iter()
            .filter(|e| e.is_complete())
            .map(|e| &e.record)
    }

    /// Consumes the report, optionally dropping incomplete records
    pub fn into_records(self, drop_incomplete: bool) -> Vec<Record> {
        self.extractions
            .into_iter()
            .filter(|e| !drop_incomplete || e.is_complete())
            .map(|e| e.record)
            .collect()
    }
}

/// Pool size and channel bound
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub worker_count: usize,
    pub queue_capacity: usize,
}

impl From<&PipelineConfig> for PipelineSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            worker_count: config.worker_count,
            queue_capacity: config.queue_capacity,
        }
    }
}

type Outcome = Result<Extraction, PageFailure>;

/// Bounded worker pool over a shared work queue
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn PageFetcher>, settings: PipelineSettings) -> Self {
        Self { fetcher, settings }
    }

    /// Pipeline with `worker_count` workers and a queue sized to match
    pub fn with_workers(fetcher: Arc<dyn PageFetcher>, worker_count: usize) -> Self {
        Self::new(
            fetcher,
            PipelineSettings {
                worker_count,
                queue_capacity: worker_count.max(1),
            },
        )
    }

    /// Effective pool size; zero is raised to one
    pub fn worker_count(&self) -> usize {
        self.settings.worker_count.max(1)
    }

    /// Processes every URL exactly once and returns the merged results
    ///
    /// Per-URL failures are collected in the report and never stop other
    /// workers. Returns only after all workers have finished.
    pub async fn run(&self, urls: Vec<String>) -> HarvestReport {
        let worker_count = self.worker_count();
        let capacity = self.settings.queue_capacity.max(1);
        let total = urls.len();

        tracing::info!(
            "Starting pipeline: {} URLs across {} workers",
            total,
            worker_count
        );

        let (work_tx, work_rx) = mpsc::channel::<String>(capacity);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (result_tx, mut result_rx) = mpsc::channel::<Outcome>(capacity);

        // Dropping the sender at the end closes the queue
        let producer = tokio::spawn(async move {
            for url in urls {
                if work_tx.send(url).await.is_err() {
                    break;
                }
            }
        });

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            workers.spawn(worker(
                id,
                Arc::clone(&self.fetcher),
                Arc::clone(&work_rx),
                result_tx.clone(),
            ));
        }
        drop(result_tx);

        let mut report = HarvestReport::default();
        while let Some(outcome) = result_rx.recv().await {
            match outcome {
                Ok(extraction) => {
                    if !extraction.is_complete() {
                        tracing::warn!(
                            "Incomplete record for {}: {}",
                            extraction.record.source_url,
                            extraction
                                .issues
                                .iter()
                                .map(ToString::to_string)
                                .collect::<Vec<_>>()
                                .join("; ")
                        );
                    }
                    report.extractions.push(extraction);
                }
                Err(failure) => {
                    tracing::warn!("Skipping {}: {}", failure.url, failure.error);
                    report.failures.push(failure);
                }
            }
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::error!("Worker ended abnormally: {}", e);
                report.worker_panics += 1;
            }
        }

        if let Err(e) = producer.await {
            tracing::error!("Work producer ended abnormally: {}", e);
        }

        tracing::info!(
            "Pipeline finished: {} of {} pages extracted, {} skipped",
            report.extractions.len(),
            total,
            report.failures.len()
        );

        report
    }
}

/// Pulls URLs until the queue is closed and drained
async fn worker(
    id: usize,
    fetcher: Arc<dyn PageFetcher>,
    queue: Arc<Mutex<mpsc::Receiver<String>>>,
    results: mpsc::Sender<Outcome>,
) {
    loop {
        let next = queue.lock().await.recv().await;
        let Some(url) = next else {
            break;
        };

        tracing::debug!("Worker {} processing {}", id, url);

        let outcome = match process_page(fetcher.as_ref(), &url).await {
            Ok(extraction) => Ok(extraction),
            Err(error) => Err(PageFailure { url, error }),
        };

        if results.send(outcome).await.is_err() {
            break;
        }
    }

    tracing::debug!("Worker {} done", id);
}

/// Fetch, parse, and extract one detail page
async fn process_page(fetcher: &dyn PageFetcher, url: &str) -> Result<Extraction, PageError> {
    let body = fetcher.fetch(url).await?;
    Ok(parse_and_extract(url, &body)?)
}

// The parsed tree is not Send, so it must never live across an await
fn parse_and_extract(url: &str, body: &str) -> Result<Extraction, ParseError> {
    let document = Document::parse(url, body)?;
    Ok(extract_record(url, &document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn detail_page(title: &str) -> String {
        format!(
            r#"<html><body>
            <div class="poster"><a><img src="https://img.example.com/{title}.jpg"></a></div>
            <div class="title_wrapper"><h1>{title}&nbsp;(2001)</h1>
              <div class="subtext">PG | 1h 40min | Drama, Comedy | 15 June 2001 (USA)</div>
            </div>
            <div class="summary_text">Summary of {title}.</div>
            <div class="credit_summary_item">Director: Jane Doe</div>
            <div class="credit_summary_item">Writers: John Roe</div>
            <div class="credit_summary_item">Stars: A, B, C | See full cast</div>
            </body></html>"#
        )
    }

    /// Serves a generated detail page for every URL except those in `failing`
    struct FakeFetcher {
        failing: HashSet<String>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeFetcher {
        fn new(failing: &[&str]) -> Self {
            Self {
                failing: failing.iter().map(|s| s.to_string()).collect(),
                calls: AtomicUsize::new(0),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(2)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(url) {
                return Err(FetchError::Unavailable {
                    url: url.to_string(),
                    reason: "simulated outage".to_string(),
                });
            }
            if url.ends_with("/empty/") {
                return Ok(String::new());
            }

            let id = url.trim_end_matches('/').rsplit('/').next().unwrap_or_default();
            Ok(detail_page(id))
        }
    }

    fn urls(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("https://www.example.com/title/tt{:07}/", i))
            .collect()
    }

    #[tokio::test]
    async fn test_all_urls_yield_records() {
        for workers in [1, 3, 7, 40] {
            let fetcher = Arc::new(FakeFetcher::new(&[]));
            let pipeline = Pipeline::with_workers(fetcher.clone(), workers);
            let report = pipeline.run(urls(25)).await;

            assert_eq!(report.extractions.len(), 25, "workers = {}", workers);
            assert!(report.failures.is_empty());
            assert_eq!(fetcher.calls.load(Ordering::SeqCst), 25);
        }
    }

    #[tokio::test]
    async fn test_records_are_fully_extracted() {
        let report = Pipeline::with_workers(Arc::new(FakeFetcher::new(&[])), 2)
            .run(urls(3))
            .await;

        assert_eq!(report.incomplete_count(), 0);
        for record in report.records() {
            assert_eq!(record.cast, vec!["A", "B", "C"]);
            assert_eq!(record.categories, vec!["Drama", "Comedy"]);
            assert_eq!(record.release_date, "2001-06-15");
            assert_eq!(record.country, "USA");
            assert_eq!(record.primary_credit, "Jane Doe");
        }
    }

    #[tokio::test]
    async fn test_source_urls_are_distinct() {
        let input = urls(30);
        let report = Pipeline::with_workers(Arc::new(FakeFetcher::new(&[])), 4)
            .run(input.clone())
            .await;

        let seen: HashSet<&str> = report.records().map(|r| r.source_url.as_str()).collect();
        let expected: HashSet<&str> = input.iter().map(String::as_str).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_isolated() {
        let input = urls(10);
        let fetcher = Arc::new(FakeFetcher::new(&[input[4].as_str()]));
        let report = Pipeline::with_workers(fetcher, 3).run(input.clone()).await;

        assert_eq!(report.extractions.len(), 9);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].url, input[4]);
        assert!(matches!(report.failures[0].error, PageError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_empty_document_is_skipped() {
        let mut input = urls(2);
        input.push("https://www.example.com/empty/".to_string());
        let report = Pipeline::with_workers(Arc::new(FakeFetcher::new(&[])), 2)
            .run(input)
            .await;

        assert_eq!(report.extractions.len(), 2);
        assert!(matches!(report.failures[0].error, PageError::Parse(_)));
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let fetcher = Arc::new(FakeFetcher::new(&[]));
        Pipeline::with_workers(fetcher.clone(), 4).run(urls(40)).await;

        assert!(fetcher.max_in_flight.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_zero_workers_is_raised_to_one() {
        let pipeline = Pipeline::new(
            Arc::new(FakeFetcher::new(&[])),
            PipelineSettings {
                worker_count: 0,
                queue_capacity: 0,
            },
        );
        assert_eq!(pipeline.worker_count(), 1);
        assert_eq!(pipeline.run(urls(5)).await.extractions.len(), 5);
    }

    #[tokio::test]
    async fn test_no_urls_terminates() {
        let report = Pipeline::with_workers(Arc::new(FakeFetcher::new(&[])), 8)
            .run(Vec::new())
            .await;
        assert!(report.extractions.is_empty());
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_into_records_drops_incomplete() {
        let mut report = Pipeline::with_workers(Arc::new(FakeFetcher::new(&[])), 2)
            .run(urls(3))
            .await;
        report.extractions[0].issues.push(crate::record::FieldIssue::new(
            crate::record::Field::ImageSrc,
            "poster image missing",
        ));

        assert_eq!(report.complete_records().count(), 2);
        assert_eq!(report.into_records(true).len(), 2);
    }
}
