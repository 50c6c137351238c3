//! Knowledge search service - cached, enhanced semantic search over the vector index

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::derived_search::DerivedSearchConfig;
use crate::domain::cache::SearchCache;
use crate::domain::embedding::{EmbeddingProvider, EmbeddingRequest};
use crate::domain::knowledge_base::{QueryEnhancer, SearchRequest, SearchResult};
use crate::domain::vector_index::{IndexQuery, VectorIndexProvider};
use crate::domain::DomainError;
use crate::infrastructure::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::infrastructure::observability::{
    record_cache_lookup, record_search_outcome, record_upstream_call, SearchOutcome,
    UpstreamStage,
};

/// Default bound on each upstream call
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the knowledge search service
#[derive(Debug, Clone)]
pub struct KnowledgeSearchConfig {
    /// Embedding model used for every query
    pub embedding_model: String,
    /// Upper bound on a single embedding or index call
    pub upstream_timeout: Duration,
    /// Vector index namespace, the index default when `None`
    pub namespace: Option<String>,
    pub derived: DerivedSearchConfig,
}

impl Default for KnowledgeSearchConfig {
    fn default() -> Self {
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            namespace: None,
            derived: DerivedSearchConfig::default(),
        }
    }
}

impl KnowledgeSearchConfig {
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|n| !n.is_empty());
        self
    }

    pub fn with_derived(mut self, derived: DerivedSearchConfig) -> Self {
        self.derived = derived;
        self
    }
}

/// Orchestrates cache lookup, query enhancement, embedding and index query
///
/// Results are cached under the raw query, so the enhancer can change
/// without invalidating keys. Failed searches are never cached.
pub struct KnowledgeSearchService {
    embedding: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndexProvider>,
    cache: Arc<dyn SearchCache>,
    enhancer: QueryEnhancer,
    config: KnowledgeSearchConfig,
}

impl std::fmt::Debug for KnowledgeSearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeSearchService")
            .field("embedding", &self.embedding.provider_name())
            .field("index", &self.index.index_name())
            .field("cached_entries", &self.cache.len())
            .field("config", &self.config)
            .finish()
    }
}

impl KnowledgeSearchService {
    pub fn new(
        embedding: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndexProvider>,
        cache: Arc<dyn SearchCache>,
    ) -> Self {
        Self {
            embedding,
            index,
            cache,
            enhancer: QueryEnhancer::default(),
            config: KnowledgeSearchConfig::default(),
        }
    }

    pub fn with_enhancer(mut self, enhancer: QueryEnhancer) -> Self {
        self.enhancer = enhancer;
        self
    }

    pub fn with_config(mut self, config: KnowledgeSearchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &KnowledgeSearchConfig {
        &self.config
    }

    pub fn enhancer(&self) -> &QueryEnhancer {
        &self.enhancer
    }

    pub fn cache(&self) -> &Arc<dyn SearchCache> {
        &self.cache
    }

    pub fn index_name(&self) -> &str {
        self.index.index_name()
    }

    pub fn embedding_provider(&self) -> &str {
        self.embedding.provider_name()
    }

    /// Fail-soft search: upstream failures are logged and yield no results
    pub async fn search(
        &self,
        query: &str,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<SearchResult> {
        let mut request = SearchRequest::new(query).with_category(category);

        if let Some(limit) = limit {
            request = request.with_limit(limit);
        }

        self.try_search(&request).await.unwrap_or_else(|e| {
            warn!(query, error = %e, "Knowledge search failed, returning no results");
            Vec::new()
        })
    }

    /// Search that reports upstream failures instead of hiding them
    ///
    /// `Ok(vec![])` means the index found nothing; `Err` means it could not
    /// be asked.
    pub async fn try_search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if request.limit == 0 {
            return Ok(Vec::new());
        }

        let key = request.cache_key();

        if let Some(results) = self.cache.get(&key) {
            debug!(key = %key, count = results.len(), "Knowledge search cache hit");
            record_cache_lookup(true);
            record_search_outcome(SearchOutcome::Hit);
            return Ok(results);
        }

        debug!(key = %key, "Knowledge search cache miss");
        record_cache_lookup(false);

        match self.fetch(request).await {
            Ok(results) => {
                record_search_outcome(if results.is_empty() {
                    SearchOutcome::Empty
                } else {
                    SearchOutcome::Fetched
                });
                self.cache.put(key, results.clone());
                Ok(results)
            }
            Err(e) => {
                record_search_outcome(SearchOutcome::Failed);
                Err(e)
            }
        }
    }

    /// Live search that neither reads nor fills the cache
    ///
    /// Used to check connectivity: every call reaches both upstreams.
    pub async fn probe(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, DomainError> {
        if request.limit == 0 {
            return Ok(Vec::new());
        }

        self.fetch(request).await
    }

    async fn fetch(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, DomainError> {
        let enhanced = self.enhancer.enhance(&request.query);
        debug!(original = %request.query, enhanced = %enhanced, "Enhanced knowledge query");

        let vector = self.embed(enhanced).await?;

        let query = IndexQuery::new(vector, request.limit)
            .with_filter(request.metadata_filter())
            .with_namespace(self.config.namespace.clone());

        let matches = self.query_index(query).await?;

        Ok(matches
            .iter()
            .take(request.limit)
            .map(SearchResult::from_match)
            .collect())
    }

    async fn embed(&self, text: String) -> Result<Vec<f32>, DomainError> {
        let request = EmbeddingRequest::single(self.config.embedding_model.as_str(), text);

        let started = Instant::now();
        let outcome = self
            .bounded("embedding", self.embedding.embed(request))
            .await;
        record_upstream_call(UpstreamStage::Embedding, started.elapsed(), outcome.is_ok());

        let response = outcome.inspect_err(|e| warn!(error = %e, "Embedding request failed"))?;

        response.into_first_vector().ok_or_else(|| {
            DomainError::provider(
                self.embedding.provider_name(),
                "Embedding response contained no vectors",
            )
        })
    }

    async fn query_index(
        &self,
        query: IndexQuery,
    ) -> Result<Vec<crate::domain::vector_index::IndexMatch>, DomainError> {
        let started = Instant::now();
        let outcome = self.bounded("vector query", self.index.query(query)).await;
        record_upstream_call(UpstreamStage::VectorQuery, started.elapsed(), outcome.is_ok());

        outcome.inspect_err(|e| {
            warn!(index = %self.index.index_name(), error = %e, "Vector index query failed")
        })
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, DomainError>>,
    ) -> Result<T, DomainError> {
        let limit = self.config.upstream_timeout;

        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| DomainError::timeout(operation, limit))?
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::domain::embedding::MockEmbeddingProvider;
    use crate::domain::vector_index::MetadataFilter;

    #[tokio::test]
    async fn test_end_to_end_enhanced_query() {
        let h = harness(vec![doc("a", "Finding winners", 0.8)]);

        let results = h.service.search("how to find winning products", None, None).await;

        assert_eq!(results.len(), 1);
        assert_eq!(
            h.embedding.inputs(),
            vec![
                "how to find winning products product research strategy method finding organic dropshipping ecommerce"
                    .to_string()
            ]
        );

        let queries = h.index.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].top_k, 5);
        assert!(queries[0].filter.is_none());
        assert!(queries[0].include_metadata);
    }

    #[tokio::test]
    async fn test_repeat_search_is_served_from_cache() {
        let h = harness(vec![doc("a", "Finding winners", 0.8)]);

        let first = h.service.search("how to find winning products", None, None).await;
        let second = h.service.search("how to find winning products", None, None).await;

        assert_eq!(first, second);
        assert_eq!(h.embedding.call_count(), 1);
        assert_eq!(h.index.query_count(), 1);
    }

    #[tokio::test]
    async fn test_cache_expires_after_ttl() {
        let h = harness(vec![doc("a", "Finding winners", 0.8)]);

        h.service.search("store setup", None, None).await;
        h.clock.advance(Duration::from_secs(299));
        h.service.search("store setup", None, None).await;
        assert_eq!(h.embedding.call_count(), 1);

        h.clock.advance(Duration::from_secs(2));
        h.service.search("store setup", None, None).await;
        assert_eq!(h.embedding.call_count(), 2);
        assert_eq!(h.index.query_count(), 2);
    }

    #[tokio::test]
    async fn test_cache_key_discriminates_category_and_limit() {
        let h = harness(vec![doc("a", "A", 0.9), doc("b", "B", 0.8)]);

        h.service.search("suppliers", None, Some(5)).await;
        h.service.search("suppliers", Some("Books"), Some(5)).await;
        h.service.search("suppliers", None, Some(2)).await;
        h.service.search("Suppliers", None, Some(5)).await;

        assert_eq!(h.index.query_count(), 4);
    }

    #[tokio::test]
    async fn test_probe_bypasses_cache() {
        let h = harness(vec![doc("a", "A", 0.9)]);
        let request = SearchRequest::new("product research").with_limit(5);

        assert_eq!(h.service.try_search(&request).await.unwrap().len(), 1);
        assert_eq!(h.service.probe(&request).await.unwrap().len(), 1);
        assert_eq!(h.index.query_count(), 2);

        h.index.set_should_fail(true);

        assert!(h.service.probe(&request).await.is_err());
        assert_eq!(h.index.query_count(), 3);
        assert_eq!(h.service.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_categories_do_not_share_cached_results() {
        let h = harness(vec![doc("b", "Book chapter", 0.9)]);
        let books = h.service.search("suppliers", Some("Books"), Some(5)).await;

        h.index.set_matches(vec![doc("c", "Module lesson", 0.8)]);
        let course = h
            .service
            .search("suppliers", Some("Course Content"), Some(5))
            .await;

        assert_eq!(books[0].title, "Book chapter");
        assert_eq!(course[0].title, "Module lesson");
        assert_eq!(h.index.query_count(), 2);

        let books_again = h.service.search("suppliers", Some("Books"), Some(5)).await;
        let course_again = h
            .service
            .search("suppliers", Some("Course Content"), Some(5))
            .await;

        assert_eq!(books_again, books);
        assert_eq!(course_again, course);
        assert_eq!(h.index.query_count(), 2);
    }

    #[tokio::test]
    async fn test_category_becomes_exact_match_filter() {
        let h = harness(vec![]);

        h.service.search("ads", Some("Coaching Calls"), Some(3)).await;

        let queries = h.index.queries();
        assert_eq!(
            queries[0].filter,
            Some(MetadataFilter::eq("category", "Coaching Calls"))
        );
        assert_eq!(queries[0].top_k, 3);
    }

    #[tokio::test]
    async fn test_failure_returns_empty_and_is_not_cached() {
        let h = harness(vec![doc("a", "A", 0.9)]);
        h.index.set_should_fail(true);

        let failed = h.service.search("viral hooks", None, None).await;
        assert!(failed.is_empty());
        assert!(h.service.cache().is_empty());

        h.index.set_should_fail(false);
        let recovered = h.service.search("viral hooks", None, None).await;
        assert_eq!(recovered.len(), 1);
        assert_eq!(h.index.query_count(), 2);
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_index() {
        let h = harness_with(
            MockEmbeddingProvider::new("mock", 8).with_error("authentication failed (401)"),
            vec![doc("a", "A", 0.9)],
        );

        let result = h.service.try_search(&SearchRequest::new("anything")).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
        assert_eq!(h.index.query_count(), 0);
    }

    #[tokio::test]
    async fn test_try_search_distinguishes_empty_from_failure() {
        let h = harness(vec![]);

        let empty = h.service.try_search(&SearchRequest::new("nothing here")).await;
        assert_eq!(empty.unwrap(), Vec::<SearchResult>::new());

        h.index.set_should_fail(true);
        let failed = h.service.try_search(&SearchRequest::new("other query")).await;
        assert!(failed.is_err());
    }

    #[tokio::test]
    async fn test_slow_upstream_times_out() {
        let h = harness_with(
            MockEmbeddingProvider::new("mock", 8).with_delay(Duration::from_millis(200)),
            vec![doc("a", "A", 0.9)],
        );
        let service = h.service.with_config(
            KnowledgeSearchConfig::default().with_upstream_timeout(Duration::from_millis(20)),
        );

        let result = service.try_search(&SearchRequest::new("slow")).await;

        assert!(matches!(result, Err(DomainError::Timeout { .. })));
        assert_eq!(h.index.query_count(), 0);
        assert!(service.search("slow", None, None).await.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_makes_no_upstream_call() {
        let h = harness(vec![doc("a", "A", 0.9)]);

        let results = h.service.search("find", None, Some(0)).await;

        assert!(results.is_empty());
        assert_eq!(h.embedding.call_count(), 0);
        assert_eq!(h.index.query_count(), 0);
    }

    #[tokio::test]
    async fn test_results_keep_index_order_and_defaults() {
        let h = harness(vec![
            doc("a", "Low first", 0.2),
            crate::domain::vector_index::IndexMatch::new("b", 0.9),
        ]);

        let results = h.service.search("order", None, None).await;

        assert_eq!(results[0].title, "Low first");
        assert_eq!(results[1].title, "Unknown");
        assert_eq!(results[1].category, "Unknown");
        assert_eq!(results[1].content, "");
    }

    #[tokio::test]
    async fn test_namespace_is_forwarded() {
        let h = harness(vec![]);
        let service = h
            .service
            .with_config(KnowledgeSearchConfig::default().with_namespace(Some("prod".into())));

        service.search("q", None, None).await;

        assert_eq!(h.index.queries()[0].namespace.as_deref(), Some("prod"));
    }

    #[tokio::test]
    async fn test_embedding_uses_configured_model() {
        let h = harness(vec![]);
        let service = h.service.with_config(
            KnowledgeSearchConfig::default().with_embedding_model("text-embedding-3-large"),
        );

        service.search("q", None, None).await;

        assert_eq!(service.config().embedding_model, "text-embedding-3-large");
        assert_eq!(h.embedding.call_count(), 1);
    }
}
