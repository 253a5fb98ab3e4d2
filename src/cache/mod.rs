pub mod memory;

use async_trait::async_trait;

use crate::core::SearchPage;

pub use memory::MemoryPageCache;

/// Trait for response-page cache implementations
#[async_trait]
pub trait PageCache: Send + Sync {
    /// Get a cached page by request key
    async fn get(&self, key: &str) -> Option<SearchPage>;

    /// Save a page under a request key
    async fn put(&self, key: &str, page: &SearchPage);

    /// Drop expired entries, returning how many were removed
    async fn purge_expired(&self) -> u64;

    /// Get cache statistics
    async fn stats(&self) -> CacheStats;
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub entries: u64,
    pub hits: u64,
    pub misses: u64,
    pub oldest_entry: Option<chrono::DateTime<chrono::Utc>>,
    pub newest_entry: Option<chrono::DateTime<chrono::Utc>>,
}
