//! Infrastructure services

mod derived_search;
mod knowledge_search_service;

pub use derived_search::{DerivedSearchConfig, DEFAULT_DERIVED_LIMIT};
pub use knowledge_search_service::{
    KnowledgeSearchConfig, KnowledgeSearchService, DEFAULT_UPSTREAM_TIMEOUT,
};

#[cfg(test)]
pub(crate) use knowledge_search_service::test_support;
