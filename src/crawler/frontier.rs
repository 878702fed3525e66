//! Frontier of URLs waiting to be crawled
//!
//! The frontier combines a global "seen" set with a bounded FIFO queue.
//! Admission is a single atomic insert-if-absent on the seen set, so a
//! normalized URL enters the queue at most once per run.

use crate::url::normalize_str;
use crate::CrawlError;
use dashmap::DashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Newly seen and queued
    Admitted,
    /// Already seen during this run
    Duplicate,
    /// Newly seen but the queue had no room (or was closed)
    Dropped,
    /// Failed normalization
    Invalid,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// Deduplicating, bounded URL queue shared by all workers
///
/// `pending` counts entries that were pushed but not yet claimed by a
/// worker. It is raised before a push and lowered only once a worker has
/// marked itself active, so `pending == 0 && active == 0` means no work is
/// in flight anywhere.
pub struct Frontier {
    seen: DashSet<String>,
    sender: mpsc::Sender<String>,
    receiver: Mutex<mpsc::Receiver<String>>,
    pending: AtomicUsize,
    capacity: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum number of queued URLs (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            seen: DashSet::new(),
            sender,
            receiver: Mutex::new(receiver),
            pending: AtomicUsize::new(0),
            capacity,
        }
    }

    /// Admits a seed URL, waiting for queue space if needed
    ///
    /// # Returns
    ///
    /// * `Ok(Admission)` - `Admitted`, `Duplicate`, or `Dropped` if the queue was closed
    /// * `Err(CrawlError::InvalidUrl)` - The URL failed normalization
    /// * `Err(CrawlError::Cancelled)` - The token fired before space was available
    pub async fn admit_blocking(
        &self,
        raw: &str,
        token: &CancellationToken,
    ) -> Result<Admission, CrawlError> {
        if token.is_cancelled() {
            return Err(CrawlError::Cancelled);
        }

        let key = normalize_str(raw).map_err(|source| CrawlError::InvalidUrl {
            url: raw.to_string(),
            source,
        })?;

        if !self.seen.insert(key.clone()) {
            return Ok(Admission::Duplicate);
        }

        self.pending.fetch_add(1, Ordering::SeqCst);
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                Err(CrawlError::Cancelled)
            }
            sent = self.sender.send(key) => match sent {
                Ok(()) => Ok(Admission::Admitted),
                Err(_) => {
                    self.pending.fetch_sub(1, Ordering::SeqCst);
                    Ok(Admission::Dropped)
                }
            },
        }
    }

    /// Admits a discovered URL without waiting
    ///
    /// A URL that does not fit is dropped but stays in the seen set, so it
    /// will not be offered again during this run.
    pub fn try_admit(&self, raw: &str) -> Admission {
        let key = match normalize_str(raw) {
            Ok(key) => key,
            Err(_) => return Admission::Invalid,
        };

        if !self.seen.insert(key.clone()) {
            return Admission::Duplicate;
        }

        self.pending.fetch_add(1, Ordering::SeqCst);
        match self.sender.try_send(key) {
            Ok(()) => Admission::Admitted,
            Err(_) => {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                Admission::Dropped
            }
        }
    }

    /// Waits for the next queued URL
    ///
    /// Returns `None` once the token is cancelled or the queue is closed and
    /// drained. The caller must call [`Frontier::claimed`] for every URL it
    /// receives.
    pub async fn next(&self, token: &CancellationToken) -> Option<String> {
        let mut receiver = tokio::select! {
            biased;
            _ = token.cancelled() => return None,
            guard = self.receiver.lock() => guard,
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            item = receiver.recv() => item,
        }
    }

    /// Marks a dequeued URL as taken by a worker
    pub fn claimed(&self) {
        // Saturate rather than wrap if called without a matching push
        let _ = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }

    /// Number of URLs pushed but not yet claimed
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Number of distinct normalized URLs offered during this run
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Closes the queue; buffered URLs can still be drained
    pub async fn close(&self) {
        self.receiver.lock().await.close();
    }
}
