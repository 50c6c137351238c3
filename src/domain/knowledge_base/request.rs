//! Knowledge base search request

use crate::domain::cache::{CategoryScope, SearchCacheKey};
use crate::domain::vector_index::MetadataFilter;

/// Default number of results for a plain knowledge base search
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Metadata field the category filter applies to
pub const CATEGORY_FIELD: &str = "category";

/// A search against the knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Raw query text, before enhancement
    pub query: String,
    /// Optional exact-match category filter
    pub category: Option<String>,
    /// Upper bound on returned results
    pub limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            category: None,
            limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_category(mut self, category: Option<impl Into<String>>) -> Self {
        self.category = category.map(Into::into);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Cache key built from the raw query, category scope and limit
    pub fn cache_key(&self) -> SearchCacheKey {
        SearchCacheKey::new(
            self.query.clone(),
            CategoryScope::from(self.category.clone()),
            self.limit,
        )
    }

    /// Exact-match index filter for the category, if one was given
    pub fn metadata_filter(&self) -> Option<MetadataFilter> {
        self.category
            .as_deref()
            .map(|category| MetadataFilter::eq(CATEGORY_FIELD, category))
    }
}
