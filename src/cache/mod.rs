//! Page cache backends
//!
//! Caches map a raw URL string to the markup fetched for it. The crawler
//! consults the cache before fetching and stores every non-empty page it
//! fetches. Two backends are provided:
//! - `MemoryCache` for a single process lifetime
//! - `SqliteCache` for reuse across runs

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

use crate::CacheError;
use async_trait::async_trait;

/// Key/value store for fetched markup
///
/// Implementations are shared by all workers and must be thread-safe.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the stored bytes for `key`
    ///
    /// A missing key is reported as `CacheError::NotFound`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError>;
}
