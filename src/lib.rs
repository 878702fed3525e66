//! webcrawl: a concurrent, deduplicating web crawler
//!
//! This crate implements a bounded URL frontier driven by a fixed pool of
//! workers that fetch, optionally parse, and expand pages into new frontier
//! entries. Link following is policy controlled, fetched markup can be cached,
//! and a run stops on its own once no reachable work remains.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for crawl runs and per-page outcomes
///
/// Per-page variants (`InvalidUrl`, `Fetch`, `Parse`, `CacheWrite`) never abort
/// a run. Only `AlreadyRunning` and `Cancelled` are returned from a run itself.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl { url: String, source: UrlError },

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Failed to cache {key}: {source}")]
    CacheWrite { key: String, source: CacheError },

    #[error("Crawler is already running")]
    AlreadyRunning,

    #[error("Crawl was cancelled")]
    Cancelled,
}

/// Errors produced by fetchers
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Unexpected status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Unexpected content type for {url}: {content_type}")]
    UnexpectedContentType { url: String, content_type: String },

    #[error("Response from {url} exceeds limit of {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },

    #[error("{0}")]
    Other(String),
}

/// Errors produced by page parsers
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Message(String),

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Errors produced by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache backend error: {0}")]
    Backend(String),
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

    #[error("Invalid domain pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use cache::{Cache, MemoryCache, SqliteCache};
pub use config::Config;
pub use crawler::{
    CrawlStats, Crawler, CrawlerOptions, FetchRequest, FetchResponse, Fetcher, HttpFetcher,
    PageOutcome, Parser,
};
pub use crate::url::{normalize_url, resolve_link, FollowBehavior};
