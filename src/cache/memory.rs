use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::cache::{CacheStats, PageCache};
use crate::core::SearchPage;

struct Entry {
    page: SearchPage,
    expires_at: Instant,
    cached_at: DateTime<Utc>,
}

struct CacheState {
    entries: HashMap<String, Entry>,
    /// Recency order, least recently used first
    order: Vec<String>,
    hits: u64,
    misses: u64,
}

/// In-memory TTL cache for response pages with LRU capacity eviction
pub struct MemoryPageCache {
    state: Mutex<CacheState>,
    capacity: usize,
    ttl: Duration,
}

impl MemoryPageCache {
    pub const DEFAULT_CAPACITY: usize = 256;
    /// Matches the trending-list freshness window of the backing service
    pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: Vec::new(),
                hits: 0,
                misses: 0,
            }),
            capacity: capacity.max(1),
            ttl,
        }
    }
}

impl Default for MemoryPageCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY, Self::DEFAULT_TTL)
    }
}

impl CacheState {
    fn drop_expired(&mut self, now: Instant) -> u64 {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        self.order.retain(|key| self.entries.contains_key(key));
        (before - self.entries.len()) as u64
    }

    fn touch(&mut self, key: &str) {
        self.order.retain(|k| k != key);
        self.order.push(key.to_string());
    }
}

#[async_trait]
impl PageCache for MemoryPageCache {
    async fn get(&self, key: &str) -> Option<SearchPage> {
        let mut state = self.state.lock().unwrap();
        state.drop_expired(Instant::now());
        let hit = state.entries.get(key).map(|entry| entry.page.clone());
        match hit {
            Some(page) => {
                state.hits += 1;
                state.touch(key);
                Some(page)
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    async fn put(&self, key: &str, page: &SearchPage) {
        let mut state = self.state.lock().unwrap();
        let now = Instant::now();
        state.drop_expired(now);
        state.entries.insert(
            key.to_string(),
            Entry {
                page: page.clone(),
                expires_at: now + self.ttl,
                cached_at: Utc::now(),
            },
        );
        state.touch(key);

        // Evict least recently used beyond capacity
        while state.entries.len() > self.capacity {
            let evicted = state.order.remove(0);
            state.entries.remove(&evicted);
            tracing::debug!("cache evicted {}", evicted);
        }
    }

    async fn purge_expired(&self) -> u64 {
        let mut state = self.state.lock().unwrap();
        state.drop_expired(Instant::now())
    }

    async fn stats(&self) -> CacheStats {
        let state = self.state.lock().unwrap();
        CacheStats {
            entries: state.entries.len() as u64,
            hits: state.hits,
            misses: state.misses,
            oldest_entry: state.entries.values().map(|e| e.cached_at).min(),
            newest_entry: state.entries.values().map(|e| e.cached_at).max(),
        }
    }
}
