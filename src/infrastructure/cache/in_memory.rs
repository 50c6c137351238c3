//! In-memory search cache with TTL staleness and threshold-triggered sweeps

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::cache::{Clock, SearchCache, SearchCacheKey, SystemClock};
use crate::domain::knowledge_base::SearchResult;

/// Configuration for the in-memory search cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum age an entry may reach and still be served
    pub ttl: Duration,
    /// Entry count above which a write triggers a stale-entry sweep
    pub high_water_mark: usize,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            high_water_mark: 100,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_high_water_mark(mut self, high_water_mark: usize) -> Self {
        self.high_water_mark = high_water_mark;
        self
    }
}

/// Entries are immutable once written; a put replaces the whole entry
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<SearchResult>,
    created_at: DateTime<Utc>,
}

/// Process-local search cache
///
/// Not LRU and not size-bounded: the high-water mark only decides when
/// stale entries are swept. A poisoned lock turns every read into a miss
/// and every write into a no-op.
#[derive(Debug)]
pub struct InMemorySearchCache {
    entries: RwLock<HashMap<SearchCacheKey, CacheEntry>>,
    clock: Arc<dyn Clock>,
    config: InMemoryCacheConfig,
}

impl InMemorySearchCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: InMemoryCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
            config,
        }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }

    fn is_stale(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        match (now - entry.created_at).to_std() {
            Ok(age) => age > self.config.ttl,
            // Entry stamped in the future (clock went backwards): still fresh
            Err(_) => false,
        }
    }

    fn sweep_stale(&self, entries: &mut HashMap<SearchCacheKey, CacheEntry>, now: DateTime<Utc>) {
        let before = entries.len();
        entries.retain(|_, entry| !self.is_stale(entry, now));

        debug!(
            removed = before - entries.len(),
            remaining = entries.len(),
            "Swept stale search cache entries"
        );
    }
}

impl Default for InMemorySearchCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchCache for InMemorySearchCache {
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchResult>> {
        let now = self.clock.now();

        {
            let entries = self.entries.read().ok()?;
            let entry = entries.get(key)?;

            if !self.is_stale(entry, now) {
                return Some(entry.data.clone());
            }
        }

        // Stale: discard it so the next put starts clean
        if let Ok(mut entries) = self.entries.write() {
            if entries.get(key).is_some_and(|e| self.is_stale(e, now)) {
                entries.remove(key);
            }
        }

        None
    }

    fn put(&self, key: SearchCacheKey, results: Vec<SearchResult>) {
        let now = self.clock.now();

        let Ok(mut entries) = self.entries.write() else {
            return;
        };

        entries.insert(
            key,
            CacheEntry {
                data: results,
                created_at: now,
            },
        );

        if entries.len() > self.config.high_water_mark {
            self.sweep_stale(&mut entries, now);
        }
    }

    fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
