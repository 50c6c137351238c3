//! Pinecone vector index provider

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::vector_index::{IndexMatch, IndexQuery, MetadataFilter, VectorIndexProvider};
use crate::domain::DomainError;
use crate::infrastructure::http_client::HttpClientTrait;

pub const DEFAULT_PINECONE_CONTROL_PLANE: &str = "https://api.pinecone.io";
pub const DEFAULT_PINECONE_INDEX: &str = "gpc-knowledge-base";
pub const PINECONE_API_VERSION: &str = "2024-10";

/// Configuration for a Pinecone index
#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host; resolved through the control plane when absent
    pub index_host: Option<String>,
    pub control_plane_url: String,
}

impl PineconeConfig {
    pub fn new(api_key: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            index_name: index_name.into(),
            index_host: None,
            control_plane_url: DEFAULT_PINECONE_CONTROL_PLANE.to_string(),
        }
    }

    pub fn with_index_host(mut self, host: Option<String>) -> Self {
        self.index_host = host.filter(|h| !h.trim().is_empty());
        self
    }

    pub fn with_control_plane_url(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Pinecone index accessed over its REST API
#[derive(Debug)]
pub struct PineconeVectorIndex<C: HttpClientTrait> {
    client: C,
    config: PineconeConfig,
    host: OnceCell<String>,
}

impl<C: HttpClientTrait> PineconeVectorIndex<C> {
    pub fn new(client: C, config: PineconeConfig) -> Self {
        let host = match config.index_host.as_deref() {
            Some(h) => OnceCell::new_with(Some(normalize_host(h))),
            None => OnceCell::new(),
        };

        Self {
            client,
            config,
            host,
        }
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Api-Key", self.config.api_key.as_str()),
            ("X-Pinecone-API-Version", PINECONE_API_VERSION),
            ("Content-Type", "application/json"),
        ]
    }

    /// Data-plane base URL, looked up once and reused afterwards
    async fn host(&self) -> Result<&str, DomainError> {
        self.host
            .get_or_try_init(|| self.describe_index_host())
            .await
            .map(String::as_str)
    }

    async fn describe_index_host(&self) -> Result<String, DomainError> {
        let url = format!(
            "{}/indexes/{}",
            self.config.control_plane_url, self.config.index_name
        );

        let response = self
            .client
            .get_json(&url, self.headers())
            .await
            .map_err(|e| tag_error(e, "describe index"))?;

        let host = response
            .get("host")
            .and_then(|h| h.as_str())
            .filter(|h| !h.is_empty())
            .ok_or_else(|| {
                DomainError::provider(
                    "pinecone",
                    format!("Index '{}' has no host in its description", self.config.index_name),
                )
            })?;

        debug!(index = %self.config.index_name, host, "Resolved Pinecone index host");

        Ok(normalize_host(host))
    }

    fn build_request(&self, query: &IndexQuery) -> serde_json::Value {
        let mut body = serde_json::json!({
            "vector": query.vector,
            "topK": query.top_k,
            "includeMetadata": query.include_metadata,
        });

        if let Some(filter) = query.filter.as_ref().filter(|f| !f.is_empty()) {
            body["filter"] = filter_to_json(filter);
        }

        if let Some(namespace) = &query.namespace {
            body["namespace"] = serde_json::json!(namespace);
        }

        body
    }
}

#[async_trait]
impl<C: HttpClientTrait> VectorIndexProvider for PineconeVectorIndex<C> {
    fn provider_type(&self) -> &'static str {
        "pinecone"
    }

    fn index_name(&self) -> &str {
        &self.config.index_name
    }

    async fn query(&self, query: IndexQuery) -> Result<Vec<IndexMatch>, DomainError> {
        let url = format!("{}/query", self.host().await?);
        let body = self.build_request(&query);

        let response = self
            .client
            .post_json(&url, self.headers(), &body)
            .await
            .map_err(|e| tag_error(e, "query"))?;

        let parsed: PineconeQueryResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::provider("pinecone", format!("Failed to parse query response: {}", e))
        })?;

        Ok(parsed.matches)
    }
}

/// Render a filter in Pinecone's `{field: {"$eq": value}}` form
fn filter_to_json(filter: &MetadataFilter) -> serde_json::Value {
    let mut object = serde_json::Map::new();

    for condition in filter.conditions() {
        object.insert(
            condition.field.clone(),
            serde_json::json!({ "$eq": condition.value.to_json() }),
        );
    }

    serde_json::Value::Object(object)
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');

    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

fn tag_error(error: DomainError, operation: &str) -> DomainError {
    match error {
        DomainError::Provider { message, .. } => {
            DomainError::provider("pinecone", format!("{} failed: {}", operation, message))
        }
        other => other,
    }
}

#[derive(Debug, Deserialize)]
struct PineconeQueryResponse {
    #[serde(default)]
    matches: Vec<IndexMatch>,
}
