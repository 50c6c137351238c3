//! GPC Knowledge
//!
//! Retrieval helper for a course knowledge base:
//! - Query enhancement with a data-driven rule table
//! - OpenAI embeddings and Pinecone nearest-neighbour search
//! - A process-local TTL cache in front of both
//! - Case-study, creator and context searches exposed as knowledge tools

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::knowledge_base::{EnhancerRules, QueryEnhancer};
use domain::DomainError;
use infrastructure::{
    cache::InMemorySearchCache,
    embedding::OpenAiEmbeddingProvider,
    http_client::HttpClient,
    observability::PrometheusMetrics,
    services::KnowledgeSearchService,
    vector_index::{PineconeConfig, PineconeVectorIndex},
};
use tracing::info;

/// Build the search service against the live providers
///
/// Fails with a configuration error naming every missing credential
/// before any network traffic happens.
pub fn create_knowledge_service(config: &AppConfig) -> Result<KnowledgeSearchService, DomainError> {
    let credentials = config.provider_credentials()?;
    let service_config = config.knowledge_search_config();

    // The service applies its own timeout; this one only stops sockets hanging past it
    let http = HttpClient::with_timeout(service_config.upstream_timeout * 2)?;

    let embedding = OpenAiEmbeddingProvider::with_base_url(
        http.clone(),
        credentials.openai_api_key,
        config.embedding.base_url.clone(),
    );

    let pinecone = PineconeConfig::new(credentials.pinecone_api_key, credentials.index_name)
        .with_index_host(config.vector_index.index_host.clone())
        .with_control_plane_url(config.vector_index.control_plane_url.clone());
    let index = PineconeVectorIndex::new(http, pinecone);

    let cache = InMemorySearchCache::with_config(config.search.cache_config());
    let enhancer = create_enhancer(config)?;

    info!(
        index = %credentials.index_name,
        model = %service_config.embedding_model,
        timeout_ms = service_config.upstream_timeout.as_millis() as u64,
        ttl_secs = config.search.cache_ttl_secs,
        "Knowledge search service configured"
    );

    Ok(
        KnowledgeSearchService::new(Arc::new(embedding), Arc::new(index), Arc::new(cache))
            .with_enhancer(enhancer)
            .with_config(service_config),
    )
}

/// Enhancer from the configured rules file, or the built-in table
pub fn create_enhancer(config: &AppConfig) -> Result<QueryEnhancer, DomainError> {
    let rules = match &config.enhancer.rules_file {
        Some(path) => {
            info!(path = %path.display(), "Loading query enhancement rules");
            EnhancerRules::from_toml_file(path)?
        }
        None => EnhancerRules::default(),
    };

    Ok(QueryEnhancer::new(rules))
}

/// Create the application state with all services initialized
pub fn create_app_state_with_config(
    config: &AppConfig,
    metrics: Option<PrometheusMetrics>,
) -> anyhow::Result<AppState> {
    let knowledge = create_knowledge_service(config)?;

    Ok(AppState::new(Arc::new(knowledge))
        .with_metrics(metrics)
        .with_credentials(config.credential_presence()))
}
