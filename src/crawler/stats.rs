//! Run counters shared by the workers

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Per-run page counters
///
/// Each counter is updated independently; a reader may observe them
/// mid-update relative to one another.
#[derive(Debug, Default)]
pub struct CrawlStats {
    processed: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`CrawlStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_processed(&self) -> u64 {
        self.processed.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn increment_succeeded(&self) {
        self.succeeded.fetch_add(1, Ordering::SeqCst);
    }

    pub fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    /// URLs dequeued and started, including those that later failed
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }

    pub fn succeeded(&self) -> u64 {
        self.succeeded.load(Ordering::SeqCst)
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            processed: self.processed(),
            succeeded: self.succeeded(),
            failed: self.failed(),
        }
    }
}

/// Number of workers currently processing a URL
#[derive(Debug, Default)]
pub struct ActiveWorkers(AtomicUsize);

impl ActiveWorkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a worker active until the returned guard is dropped
    pub fn enter(&self) -> ActiveGuard<'_> {
        self.0.fetch_add(1, Ordering::SeqCst);
        ActiveGuard(&self.0)
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Decrements the active-worker count on drop
pub struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
