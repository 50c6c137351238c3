//! Search cache keys

use std::fmt;

/// Category component of a cache key
///
/// `All` is an explicit sentinel for "no filter" so it can never collide
/// with a category literally named "all".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CategoryScope {
    All,
    Only(String),
}

impl From<Option<String>> for CategoryScope {
    fn from(category: Option<String>) -> Self {
        category.map_or(Self::All, Self::Only)
    }
}

impl fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(category) => write!(f, "{}", category),
        }
    }
}

/// Composite key identifying one logical search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchCacheKey {
    query: String,
    category: CategoryScope,
    limit: usize,
}

impl SearchCacheKey {
    pub fn new(query: impl Into<String>, category: CategoryScope, limit: usize) -> Self {
        Self {
            query: query.into(),
            category,
            limit,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> &CategoryScope {
        &self.category
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Human-readable form for logs; equality and hashing use the structured fields
impl fmt::Display for SearchCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}|{}", self.query, self.category, self.limit)
    }
}
