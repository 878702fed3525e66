//! Crawl orchestration
//!
//! This module owns the lifecycle of a crawl run:
//! - Guarding against concurrent runs on the same crawler
//! - Spawning the worker pool, progress reporter, and idle monitor
//! - Seeding the frontier
//! - Shutting everything down once the run is over

use crate::cache::Cache;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::ParserRegistry;
use crate::crawler::scheduler::{worker_loop, PageOutcome, RunContext};
use crate::crawler::stats::{ActiveWorkers, CrawlStats};
use crate::url::FollowBehavior;
use crate::CrawlError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default number of URLs processed per run
pub const DEFAULT_MAX_URLS: u64 = 100;

/// Default worker count
pub const DEFAULT_WORKERS: usize = 5;

/// Default frontier capacity
pub const DEFAULT_QUEUE_SIZE: usize = 10_000;

/// Default interval between progress reports
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(30);

/// Default interval between idle checks
pub const DEFAULT_IDLE_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Fetcher hint carried on requests when none is configured
pub const DEFAULT_FETCHER_NAME: &str = "http";

/// Settings for a [`Crawler`]
///
/// Built from a fetcher with [`CrawlerOptions::new`] and adjusted with the
/// `with_*` methods. Zero values for the queue size, worker count, and
/// intervals fall back to the defaults.
pub struct CrawlerOptions<T> {
    /// Soft cap on processed URLs; may be exceeded by up to `workers`
    pub max_urls: u64,

    /// Number of worker tasks
    pub workers: usize,

    /// Pause after each page, per worker
    pub request_delay: Duration,

    /// Frontier capacity
    pub queue_size: usize,

    /// Which discovered links are followed
    pub follow: FollowBehavior,

    /// Parser dispatch
    pub parsers: ParserRegistry<T>,

    /// Optional page cache
    pub cache: Option<Arc<dyn Cache>>,

    /// Page fetcher
    pub fetcher: Arc<dyn Fetcher>,

    /// Fetcher hint carried on each request
    pub fetcher_name: String,

    /// Whether the progress reporter runs
    pub show_progress: bool,

    pub progress_interval: Duration,

    pub idle_check_interval: Duration,
}

impl<T> CrawlerOptions<T> {
    /// Creates options with default settings around `fetcher`
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            max_urls: DEFAULT_MAX_URLS,
            workers: DEFAULT_WORKERS,
            request_delay: Duration::ZERO,
            queue_size: DEFAULT_QUEUE_SIZE,
            follow: FollowBehavior::default(),
            parsers: ParserRegistry::new(),
            cache: None,
            fetcher,
            fetcher_name: DEFAULT_FETCHER_NAME.to_string(),
            show_progress: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            idle_check_interval: DEFAULT_IDLE_CHECK_INTERVAL,
        }
    }

    pub fn with_max_urls(mut self, max_urls: u64) -> Self {
        self.max_urls = max_urls;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_queue_size(mut self, queue_size: usize) -> Self {
        self.queue_size = queue_size;
        self
    }

    pub fn with_follow(mut self, follow: FollowBehavior) -> Self {
        self.follow = follow;
        self
    }

    pub fn with_parsers(mut self, parsers: ParserRegistry<T>) -> Self {
        self.parsers = parsers;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_fetcher_name(mut self, name: impl Into<String>) -> Self {
        self.fetcher_name = name.into();
        self
    }

    /// Enables progress logging every `interval` (zero uses the default)
    pub fn with_progress(mut self, interval: Duration) -> Self {
        self.show_progress = true;
        self.progress_interval = interval;
        self
    }

    pub fn with_idle_check_interval(mut self, interval: Duration) -> Self {
        self.idle_check_interval = interval;
        self
    }

    /// Replaces zero values with defaults
    fn normalized(mut self) -> Self {
        if self.queue_size == 0 {
            self.queue_size = DEFAULT_QUEUE_SIZE;
        }
        if self.workers == 0 {
            self.workers = DEFAULT_WORKERS;
        }
        if self.progress_interval.is_zero() {
            self.progress_interval = DEFAULT_PROGRESS_INTERVAL;
        }
        if self.idle_check_interval.is_zero() {
            self.idle_check_interval = DEFAULT_IDLE_CHECK_INTERVAL;
        }
        self
    }
}

/// Concurrent crawler producing parser outputs of type `T`
///
/// A crawler can be reused for several runs, one at a time. Each run starts
/// with an empty frontier and fresh statistics.
pub struct Crawler<T> {
    options: Arc<CrawlerOptions<T>>,
    running: AtomicBool,
    stats: RwLock<Arc<CrawlStats>>,
}

/// Clears the running flag when a run ends, however it ends
struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<T: Send + 'static> Crawler<T> {
    pub fn new(options: CrawlerOptions<T>) -> Self {
        Self {
            options: Arc::new(options.normalized()),
            running: AtomicBool::new(false),
            stats: RwLock::new(Arc::new(CrawlStats::new())),
        }
    }

    pub fn options(&self) -> &CrawlerOptions<T> {
        &self.options
    }

    /// Statistics of the current run, or of the last one once it ended
    pub fn stats(&self) -> Arc<CrawlStats> {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Crawls from `seeds` until no work remains or the URL limit is hit
    ///
    /// See [`Crawler::crawl_with_cancellation`].
    pub async fn crawl<S, F>(&self, seeds: &[S], callback: F) -> crate::Result<()>
    where
        S: AsRef<str>,
        F: Fn(PageOutcome<T>) + Send + Sync + 'static,
    {
        self.crawl_with_cancellation(seeds, callback, &CancellationToken::new())
            .await
    }

    /// Crawls from `seeds`, stopping early when `token` is cancelled
    ///
    /// # Run Flow
    ///
    /// 1. Publish fresh statistics and create the frontier
    /// 2. Spawn workers and the progress reporter
    /// 3. Admit seeds (invalid seeds are logged and skipped)
    /// 4. Start the idle monitor
    /// 5. Wait for the workers, then cancel and close the frontier
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The run finished, including runs with no valid seeds
    /// * `Err(CrawlError::AlreadyRunning)` - Another run is in progress
    /// * `Err(CrawlError::Cancelled)` - Cancelled before seeding completed
    ///
    /// Per-page failures never end the run; they reach `callback` instead.
    pub async fn crawl_with_cancellation<S, F>(
        &self,
        seeds: &[S],
        callback: F,
        token: &CancellationToken,
    ) -> crate::Result<()>
    where
        S: AsRef<str>,
        F: Fn(PageOutcome<T>) + Send + Sync + 'static,
    {
        let _guard = RunGuard::acquire(&self.running).ok_or(CrawlError::AlreadyRunning)?;

        let stats = Arc::new(CrawlStats::new());
        *self.stats.write().unwrap_or_else(PoisonError::into_inner) = stats.clone();

        let run = Arc::new(RunContext {
            frontier: Frontier::new(self.options.queue_size),
            stats,
            active: ActiveWorkers::new(),
            token: token.child_token(),
            options: self.options.clone(),
            callback: Arc::new(callback),
        });

        tracing::info!(
            workers = self.options.workers,
            max_urls = self.options.max_urls,
            follow = %self.options.follow,
            "Starting crawl"
        );

        let workers: Vec<JoinHandle<()>> = (0..self.options.workers)
            .map(|worker_id| tokio::spawn(worker_loop(run.clone(), worker_id)))
            .collect();

        let mut background = Vec::new();
        if self.options.show_progress {
            background.push(tokio::spawn(progress_reporter(run.clone())));
        }

        let mut admitted = 0usize;
        for seed in seeds {
            let seed = seed.as_ref();
            match run.frontier.admit_blocking(seed, &run.token).await {
                Ok(admission) if admission.is_admitted() => admitted += 1,
                Ok(admission) => tracing::debug!(seed, ?admission, "Seed not queued"),
                Err(CrawlError::Cancelled) => {
                    tracing::info!("Crawl cancelled while seeding");
                    shutdown(&run, workers, background).await;
                    return Err(CrawlError::Cancelled);
                }
                Err(e) => tracing::warn!(seed, error = %e, "Skipping invalid seed"),
            }
        }

        if admitted == 0 {
            tracing::warn!("No valid seeds, nothing to crawl");
            shutdown(&run, workers, background).await;
            return Ok(());
        }

        tracing::info!(seeds = admitted, "Seeded frontier");
        // Started after seeding so a slow seed list cannot look idle
        background.push(tokio::spawn(idle_monitor(run.clone())));

        join_all(workers).await;
        shutdown(&run, Vec::new(), background).await;

        let snapshot = run.stats.snapshot();
        tracing::info!(
            processed = snapshot.processed,
            succeeded = snapshot.succeeded,
            failed = snapshot.failed,
            discovered = run.frontier.seen_count(),
            "Crawl finished"
        );

        Ok(())
    }
}

/// Cancels the run, closes the frontier, and waits for every task
async fn shutdown<T>(
    run: &RunContext<T>,
    workers: Vec<JoinHandle<()>>,
    background: Vec<JoinHandle<()>>,
) {
    run.token.cancel();
    run.frontier.close().await;
    join_all(workers).await;
    join_all(background).await;
}

async fn join_all(handles: Vec<JoinHandle<()>>) {
    for handle in handles {
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "Crawl task panicked");
        }
    }
}

/// Cancels the run once the frontier is empty and no worker is active
async fn idle_monitor<T>(run: Arc<RunContext<T>>) {
    let mut interval = tokio::time::interval(run.options.idle_check_interval);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = run.token.cancelled() => break,
            _ = interval.tick() => {
                if run.frontier.pending() == 0 && run.active.count() == 0 {
                    tracing::info!("No more work available, stopping crawl");
                    run.token.cancel();
                    break;
                }
            }
        }
    }
}

/// Logs run counters at a fixed interval
async fn progress_reporter<T>(run: Arc<RunContext<T>>) {
    let mut interval = tokio::time::interval(run.options.progress_interval);
    interval.tick().await;

    loop {
        tokio::select! {
            _ = run.token.cancelled() => break,
            _ = interval.tick() => {
                let snapshot = run.stats.snapshot();
                tracing::info!(
                    processed = snapshot.processed,
                    succeeded = snapshot.succeeded,
                    failed = snapshot.failed,
                    queued = run.frontier.pending(),
                    active = run.active.count(),
                    "Progress"
                );
            }
        }
    }
}
