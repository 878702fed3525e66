//! Output module for end-of-run reporting
//!
//! This module handles:
//! - Summarizing a finished run
//! - Printing crawl statistics

pub mod stats;

pub use stats::{format_statistics, print_statistics, CrawlSummary};
