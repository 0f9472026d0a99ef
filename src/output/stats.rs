//! Run statistics
//!
//! The summary printed to standard output when a harvest finishes.

use std::time::Duration;

/// Counts and timing of one harvest run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Records written to the bulk document
    pub records_written: usize,

    /// Detail-page URLs handed to the pipeline
    pub pages_queued: usize,

    /// URLs skipped after a fetch or parse failure
    pub pages_skipped: usize,

    /// Extracted records with at least one empty field
    pub incomplete_records: usize,

    /// Workers that ended abnormally
    pub worker_panics: usize,

    /// Wall-clock time from start until all pages were processed
    pub elapsed: Duration,
}

/// Formats the summary as printed at the end of a run
///
/// The first line is the record count and the last the elapsed time.
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = format!("{}\n", summary.records_written);

    if summary.pages_skipped > 0 || summary.incomplete_records > 0 {
        out.push_str(&format!(
            "  {} of {} pages skipped, {} records incomplete\n",
            summary.pages_skipped, summary.pages_queued, summary.incomplete_records
        ));
    }
    if summary.worker_panics > 0 {
        out.push_str(&format!("  {} workers ended abnormally\n", summary.worker_panics));
    }

    out.push_str(&format!("took {:.3?}", summary.elapsed));
    out
}

/// Prints the summary to standard output
pub fn print_summary(summary: &RunSummary) {
    println!("{}", format_summary(summary));
}
