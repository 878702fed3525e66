use crate::crawler::{
    CrawlerOptions, Fetcher, HttpFetcherOptions, DEFAULT_FETCHER_NAME, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_USER_AGENT,
};
use crate::crawler::{
    DocumentParser, MatchType, PageDocument, ParserRegistry, ParserRule, SharedParser,
    DEFAULT_MAX_URLS, DEFAULT_QUEUE_SIZE, DEFAULT_WORKERS,
};
use crate::url::FollowBehavior;
use crate::ConfigResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Main configuration structure for webcrawl
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// URLs the crawl starts from
    pub seeds: Vec<String>,

    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    pub cache: CacheConfig,

    /// Hosts handed to the document parser
    #[serde(rename = "parser")]
    pub parsers: Vec<ParserRuleConfig>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Soft cap on processed URLs
    pub max_urls: u64,

    /// Number of concurrent workers
    pub workers: usize,

    /// Per-worker pause after each page (milliseconds)
    pub request_delay_ms: u64,

    /// Frontier capacity; 0 uses the default
    pub queue_size: usize,

    /// Which discovered links are followed
    pub follow: FollowBehavior,

    /// Fetcher hint carried on each request
    pub fetcher: String,

    pub show_progress: bool,

    /// Seconds between progress reports; 0 uses the default
    pub progress_interval_secs: u64,

    pub idle_check_interval_ms: u64,

    /// Parse every page, not only hosts matched by a parser rule
    pub parse_all: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_urls: DEFAULT_MAX_URLS,
            workers: DEFAULT_WORKERS,
            request_delay_ms: 0,
            queue_size: DEFAULT_QUEUE_SIZE,
            follow: FollowBehavior::default(),
            fetcher: DEFAULT_FETCHER_NAME.to_string(),
            show_progress: true,
            progress_interval_secs: 30,
            idle_check_interval_ms: 1000,
            parse_all: true,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    pub timeout_secs: u64,

    /// User agent; a browser-like default is used when absent
    pub user_agent: Option<String>,

    pub max_body_bytes: usize,

    /// Extra headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            headers: HashMap::new(),
        }
    }
}

/// Page cache configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CacheConfig {
    /// Path to the SQLite cache; no cache when absent
    pub sqlite_path: Option<String>,
}

/// Rule selecting the document parser for matching hosts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ParserRuleConfig {
    /// Pattern compared against the page host
    pub pattern: String,

    /// How the pattern is compared
    #[serde(rename = "match", default = "default_match_type")]
    pub match_type: MatchType,

    /// Higher priorities are tried first
    #[serde(default)]
    pub priority: i32,
}

fn default_match_type() -> MatchType {
    MatchType::Glob
}

impl Config {
    /// Fetcher settings derived from the `[fetch]` section
    pub fn fetcher_options(&self) -> HttpFetcherOptions {
        let mut headers = HttpFetcherOptions::default().headers;
        headers.extend(self.fetch.headers.clone());

        HttpFetcherOptions {
            timeout: Duration::from_secs(self.fetch.timeout_secs),
            user_agent: self
                .fetch
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            headers,
            max_body_bytes: self.fetch.max_body_bytes,
        }
    }

    /// Crawler settings derived from the `[crawler]` section
    ///
    /// Parsers and the cache are left unset; the caller wires those in.
    pub fn crawler_options<T>(&self, fetcher: Arc<dyn Fetcher>) -> CrawlerOptions<T> {
        let crawler = &self.crawler;
        let mut options = CrawlerOptions::new(fetcher)
            .with_max_urls(crawler.max_urls)
            .with_workers(crawler.workers)
            .with_request_delay(Duration::from_millis(crawler.request_delay_ms))
            .with_queue_size(crawler.queue_size)
            .with_follow(crawler.follow)
            .with_fetcher_name(crawler.fetcher.clone())
            .with_idle_check_interval(Duration::from_millis(crawler.idle_check_interval_ms));

        if crawler.show_progress {
            options = options.with_progress(Duration::from_secs(crawler.progress_interval_secs));
        }

        options
    }

    /// Document parser dispatch built from the `[[parser]]` rules
    ///
    /// Exact rules become host entries, the others pattern rules. With
    /// `parse-all` the document parser is also the default.
    pub fn document_parsers(&self) -> ConfigResult<ParserRegistry<PageDocument>> {
        let parser: SharedParser<PageDocument> = Arc::new(DocumentParser);
        let mut registry = ParserRegistry::new();

        for rule in &self.parsers {
            registry = match rule.match_type {
                MatchType::Exact => registry.with_parser(rule.pattern.clone(), parser.clone()),
                _ => registry.with_rule(ParserRule::new(
                    rule.pattern.clone(),
                    rule.match_type,
                    rule.priority,
                    parser.clone(),
                )?),
            };
        }

        if self.crawler.parse_all {
            registry = registry.with_default(parser);
        }

        Ok(registry)
    }
}
