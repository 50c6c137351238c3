//! Domain layer - Core business logic and entities

pub mod cache;
pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod vector_index;

pub use cache::{CategoryScope, Clock, ManualClock, SearchCache, SearchCacheKey, SystemClock};
pub use embedding::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};
pub use error::DomainError;
pub use knowledge_base::{
    EnhancementRule, EnhancerRules, MatchMode, QueryEnhancer, SearchRequest, SearchResult,
};
pub use vector_index::{IndexMatch, IndexQuery, MetadataFilter, VectorIndexProvider};
