//! Worker loop and per-page processing
//!
//! Each worker repeatedly takes a URL from the frontier and runs it through
//! the page pipeline:
//! - Cache lookup, then fetch on a miss
//! - Best-effort cache write of fetched markup
//! - Parser dispatch by host
//! - Link resolution, callback, and admission of eligible links

use crate::crawler::coordinator::CrawlerOptions;
use crate::crawler::fetcher::{FetchRequest, FetchResponse};
use crate::crawler::frontier::{Admission, Frontier};
use crate::crawler::stats::{ActiveWorkers, CrawlStats};
use crate::url::{extract_host, filter_links, resolve_link};
use crate::{CacheError, CrawlError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Result of processing one page, handed to the crawl callback
#[derive(Debug)]
pub struct PageOutcome<T> {
    /// The request that produced this page
    pub request: FetchRequest,

    /// HTTP status, when the page came from the network
    pub status_code: Option<u16>,

    /// Resolved, deduplicated outbound links (before the follow policy)
    pub links: Vec<String>,

    /// Parser output, if a parser was selected and succeeded
    pub parsed: Option<T>,

    /// Fetch or parse error for this page
    pub error: Option<CrawlError>,
}

impl<T> PageOutcome<T> {
    pub fn url(&self) -> &str {
        &self.request.url
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Callback invoked once per processed page
pub type Callback<T> = Arc<dyn Fn(PageOutcome<T>) + Send + Sync>;

/// State shared by all tasks of a single run
pub(crate) struct RunContext<T> {
    pub frontier: Frontier,
    pub stats: Arc<CrawlStats>,
    pub active: ActiveWorkers,
    pub token: CancellationToken,
    pub options: Arc<CrawlerOptions<T>>,
    pub callback: Callback<T>,
}

/// Runs one worker until cancellation, closure, or the URL limit
///
/// # Loop
///
/// 1. Wait for the next URL
/// 2. Stop without processing if `processed >= max_urls`
/// 3. Mark active, release the frontier claim, process the page
/// 4. Sleep for the configured delay
pub(crate) async fn worker_loop<T: Send + 'static>(run: Arc<RunContext<T>>, worker_id: usize) {
    tracing::debug!(worker_id, "Worker started");

    while let Some(url) = run.frontier.next(&run.token).await {
        if run.stats.processed() >= run.options.max_urls {
            run.frontier.claimed();
            tracing::debug!(worker_id, "URL limit reached, stopping");
            break;
        }

        {
            // Active before the claim is released, so the idle check never
            // sees an empty queue with no active worker mid-handoff
            let _active = run.active.enter();
            run.frontier.claimed();
            process_url(&run, &url).await;
        }

        let delay = run.options.request_delay;
        if !delay.is_zero() {
            tokio::select! {
                _ = run.token.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    tracing::debug!(worker_id, "Worker stopped");
}

/// Processes a single URL
///
/// The callback is invoked exactly once for every URL that gets past host
/// extraction. Fetch failures count as failed; parse failures are reported
/// on the outcome but the page still counts as succeeded.
pub(crate) async fn process_url<T: Send + 'static>(run: &RunContext<T>, url: &str) {
    run.stats.increment_processed();
    let options = &run.options;

    let page = match Url::parse(url) {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(url, error = %e, "Skipping unparseable URL");
            return;
        }
    };
    let host = match extract_host(&page) {
        Some(host) => host,
        None => {
            tracing::warn!(url, "Skipping URL without host");
            return;
        }
    };

    let request = FetchRequest::new(url, options.fetcher_name.as_str());

    let response = match cached_page(run, url).await {
        Some(response) => response,
        None => {
            tracing::debug!(url, "Fetching");
            match options.fetcher.fetch(&request).await {
                Ok(response) => {
                    tracing::debug!(
                        url,
                        status = response.status_code,
                        fetched_at = ?response.timestamp,
                        "Fetched"
                    );
                    store_page(run, url, &response).await;
                    response
                }
                Err(e) => {
                    tracing::debug!(url, error = %e, "Fetch failed");
                    (run.callback)(PageOutcome {
                        request,
                        status_code: None,
                        links: Vec::new(),
                        parsed: None,
                        error: Some(CrawlError::Fetch(e)),
                    });
                    run.stats.increment_failed();
                    return;
                }
            }
        }
    };

    let mut parsed = None;
    let mut error = None;
    if let Some(parser) = options.parsers.select(&host) {
        tracing::info!(url, host = %host, "Parsing page");
        match parser.parse(&response).await {
            Ok(value) => parsed = Some(value),
            Err(e) => {
                tracing::error!(url, error = %e, "Parser failed");
                error = Some(CrawlError::Parse(e));
            }
        }
    }

    let base = match page.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    };
    let links: Vec<String> = response
        .links
        .iter()
        .filter_map(|link| resolve_link(&base, &link.url))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    (run.callback)(PageOutcome {
        request,
        status_code: response.status_code,
        links: links.clone(),
        parsed,
        error,
    });

    for link in filter_links(&page, &links, options.follow) {
        if run.stats.processed() >= options.max_urls {
            break;
        }
        match run.frontier.try_admit(&link) {
            Admission::Dropped => tracing::debug!(url = %link, "Frontier full, dropping link"),
            Admission::Invalid => tracing::debug!(url = %link, "Discarding invalid link"),
            Admission::Admitted | Admission::Duplicate => {}
        }
    }

    run.stats.increment_succeeded();
}

/// Looks up `url` in the cache and synthesizes a markup-only response
async fn cached_page<T>(run: &RunContext<T>, url: &str) -> Option<FetchResponse> {
    let cache = run.options.cache.as_ref()?;
    match cache.get(url).await {
        Ok(bytes) => {
            tracing::debug!(url, "Cache hit");
            Some(FetchResponse::from_cache(
                url,
                String::from_utf8_lossy(&bytes).into_owned(),
            ))
        }
        Err(CacheError::NotFound(_)) => None,
        Err(e) => {
            tracing::warn!(url, error = %e, "Cache lookup failed, fetching");
            None
        }
    }
}

/// Stores fetched markup; failures are logged and ignored
async fn store_page<T>(run: &RunContext<T>, url: &str, response: &FetchResponse) {
    let Some(cache) = run.options.cache.as_ref() else {
        return;
    };
    if response.html.is_empty() {
        return;
    }
    if let Err(source) = cache.set(url, response.html.as_bytes()).await {
        let error = CrawlError::CacheWrite {
            key: url.to_string(),
            source,
        };
        tracing::warn!(error = %error, "Cache write failed");
    }
}
