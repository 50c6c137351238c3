//! Search cache trait definition

use std::fmt::Debug;

use super::SearchCacheKey;
use crate::domain::knowledge_base::SearchResult;

/// Short-lived memo of search results
///
/// Operations never fail: an implementation that cannot read or write must
/// behave as a miss, never return data older than its TTL.
pub trait SearchCache: Send + Sync + Debug {
    /// Cached results for the key, if present and not stale
    fn get(&self, key: &SearchCacheKey) -> Option<Vec<SearchResult>>;

    /// Store results under the key, replacing any previous entry
    fn put(&self, key: SearchCacheKey, results: Vec<SearchResult>);

    /// Number of entries currently held, stale ones included
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry
    fn clear(&self);
}
