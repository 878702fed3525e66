//! SQLite cache implementation
//!
//! This module provides a SQLite-backed implementation of the Cache trait,
//! so fetched pages survive across runs.

use crate::cache::schema::initialize_schema;
use crate::cache::Cache;
use crate::CacheError;
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// SQLite cache backend
///
/// Queries run on tokio's blocking pool so disk I/O never stalls a worker.
pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
    /// Opens (or creates) a cache database
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteCache)` - Successfully opened/created database
    /// * `Err(CacheError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates an in-memory cache
    pub fn new_in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Number of cached pages
    pub fn len(&self) -> Result<u64, CacheError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        lock_connection(&self.conn)
    }

    /// Runs `query` against the connection on the blocking pool
    async fn with_connection<R, F>(&self, query: F) -> Result<R, CacheError>
    where
        R: Send + 'static,
        F: FnOnce(&Connection) -> Result<R, CacheError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = lock_connection(&conn)?;
            query(&guard)
        })
        .await
        .map_err(|e| CacheError::Backend(format!("cache task failed: {}", e)))?
    }
}

fn lock_connection(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, CacheError> {
    conn.lock().map_err(|_| CacheError::Backend("cache connection lock poisoned".to_string()))
}

#[async_trait]
impl Cache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let key = key.to_string();
        self.with_connection(move |conn| {
            conn.query_row(
                "SELECT body FROM pages WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| CacheError::NotFound(key.clone()))
        })
        .await
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
        let key = key.to_string();
        let value = value.to_vec();
        let now = Utc::now().to_rfc3339();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO pages (key, body, stored_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET body = excluded.body, stored_at = excluded.stored_at",
                params![key, value, now],
            )?;
            Ok(())
        })
        .await
    }
}
