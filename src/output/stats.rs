//! Statistics display for a finished crawl
//!
//! This module turns run counters into a human-readable summary.

use crate::crawler::StatsSnapshot;
use serde::Serialize;
use std::fmt::Write;
use std::time::Duration;

/// Summary of a finished crawl run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlSummary {
    /// Final counter values
    pub stats: StatsSnapshot,

    /// Pages for which a parser produced a value
    pub parsed_pages: u64,

    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl CrawlSummary {
    /// Percentage of processed pages that succeeded
    pub fn success_rate(&self) -> f64 {
        if self.stats.processed > 0 {
            (self.stats.succeeded as f64 / self.stats.processed as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.stats.processed as f64 / secs
        } else {
            0.0
        }
    }
}

/// Formats statistics for display
///
/// # Arguments
///
/// * `summary` - The run summary to display
pub fn format_statistics(summary: &CrawlSummary) -> String {
    let stats = &summary.stats;
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== Crawl Statistics ===\n");
    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Pages processed: {}", stats.processed);
    let _ = writeln!(out, "  Succeeded: {}", stats.succeeded);
    let _ = writeln!(out, "  Failed: {}", stats.failed);
    let _ = writeln!(out, "  Parsed: {}", summary.parsed_pages);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Duration: {:.1}s ({:.2} pages/sec)",
        summary.elapsed.as_secs_f64(),
        summary.pages_per_second()
    );
    let _ = writeln!(
        out,
        "Success Rate: {:.1}% ({} / {} pages successfully processed)",
        summary.success_rate(),
        stats.succeeded,
        stats.processed
    );

    out
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(summary: &CrawlSummary) {
    print!("{}", format_statistics(summary));
}
