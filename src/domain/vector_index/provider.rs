//! Vector index provider trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::{IndexMatch, IndexQuery};
use crate::domain::DomainError;

/// Read-only access to a managed vector index
///
/// Implementations translate [`IndexQuery`] into the backend's query API and
/// return matches in the backend's ranking order.
#[async_trait]
pub trait VectorIndexProvider: Send + Sync + Debug {
    /// Get the provider type name
    fn provider_type(&self) -> &'static str;

    /// Name of the index queries are sent to
    fn index_name(&self) -> &str;

    /// Run a nearest-neighbour query
    async fn query(&self, query: IndexQuery) -> Result<Vec<IndexMatch>, DomainError>;
}
