//! Crawler module for concurrent page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - The deduplicating URL frontier
//! - The worker pool and per-page pipeline
//! - Run lifecycle, idle detection, and progress reporting
//! - Fetcher and parser contracts with default implementations

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod scheduler;
mod stats;

pub use coordinator::{
    Crawler, CrawlerOptions, DEFAULT_FETCHER_NAME, DEFAULT_IDLE_CHECK_INTERVAL, DEFAULT_MAX_URLS,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_QUEUE_SIZE, DEFAULT_WORKERS,
};
pub use fetcher::{
    build_http_client, default_headers, extract_links, FetchRequest, FetchResponse, Fetcher,
    HttpFetcher, HttpFetcherOptions, Link, DEFAULT_MAX_BODY_BYTES, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT,
};
pub use frontier::{Admission, Frontier};
pub use parser::{
    parse_document, DocumentParser, MatchType, PageDocument, Parser, ParserRegistry, ParserRule,
    SharedParser,
};
pub use scheduler::{Callback, PageOutcome};
pub use stats::{ActiveGuard, ActiveWorkers, CrawlStats, StatsSnapshot};
