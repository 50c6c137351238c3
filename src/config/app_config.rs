use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::cache::InMemoryCacheConfig;
use crate::infrastructure::embedding::{DEFAULT_EMBEDDING_MODEL, DEFAULT_OPENAI_BASE_URL};
use crate::infrastructure::observability::ObservabilityConfig;
use crate::infrastructure::services::{DerivedSearchConfig, KnowledgeSearchConfig};
use crate::infrastructure::vector_index::{DEFAULT_PINECONE_CONTROL_PLANE, DEFAULT_PINECONE_INDEX};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub observability: ObservabilityConfig,
    pub embedding: EmbeddingSettings,
    pub vector_index: VectorIndexSettings,
    pub search: SearchSettings,
    pub enhancer: EnhancerSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// OpenAI embedding settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
}

/// Pinecone index settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorIndexSettings {
    pub api_key: Option<String>,
    pub index_name: String,
    /// Data-plane host; looked up through the control plane when unset
    pub index_host: Option<String>,
    pub control_plane_url: String,
    pub namespace: Option<String>,
}

/// Search behaviour: cache, timeouts and derived-helper thresholds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub cache_ttl_secs: u64,
    pub cache_high_water_mark: usize,
    pub upstream_timeout_ms: u64,
    pub derived: DerivedSearchConfig,
}

/// Query enhancement rules
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EnhancerSettings {
    /// TOML rules file; the built-in table is used when unset
    pub rules_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
        }
    }
}

impl Default for VectorIndexSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            index_name: DEFAULT_PINECONE_INDEX.to_string(),
            index_host: None,
            control_plane_url: DEFAULT_PINECONE_CONTROL_PLANE.to_string(),
            namespace: None,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 300,
            cache_high_water_mark: 100,
            upstream_timeout_ms: 5_000,
            derived: DerivedSearchConfig::default(),
        }
    }
}

impl SearchSettings {
    pub fn cache_config(&self) -> InMemoryCacheConfig {
        InMemoryCacheConfig::default()
            .with_ttl(Duration::from_secs(self.cache_ttl_secs))
            .with_high_water_mark(self.cache_high_water_mark)
    }
}

/// Which provider keys are configured, without their values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CredentialPresence {
    pub embedding_key: bool,
    pub index_key: bool,
}

/// Credentials and index name, checked to be present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials<'a> {
    pub openai_api_key: &'a str,
    pub pinecone_api_key: &'a str,
    pub index_name: &'a str,
}

impl AppConfig {
    /// Load layered configuration: `config/default`, `config/local`, then
    /// `APP__`-prefixed environment variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app: Self = config.try_deserialize()?;
        app.apply_env_fallbacks(|name| std::env::var(name).ok());
        Ok(app)
    }

    /// Fill unset provider settings from the well-known variables
    pub fn apply_env_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if is_blank(&self.embedding.api_key) {
            self.embedding.api_key = lookup("OPENAI_API_KEY");
        }

        if is_blank(&self.vector_index.api_key) {
            self.vector_index.api_key = lookup("PINECONE_API_KEY");
        }

        if is_blank(&self.vector_index.index_host) {
            self.vector_index.index_host = lookup("PINECONE_INDEX_HOST");
        }

        if let Some(name) = lookup("PINECONE_INDEX_NAME") {
            if self.vector_index.index_name == DEFAULT_PINECONE_INDEX
                || self.vector_index.index_name.trim().is_empty()
            {
                self.vector_index.index_name = name;
            }
        }
    }

    /// Check every setting a live search needs, naming all that are missing
    pub fn provider_credentials(&self) -> Result<ProviderCredentials<'_>, DomainError> {
        let openai = non_blank(&self.embedding.api_key);
        let pinecone = non_blank(&self.vector_index.api_key);
        let index = Some(self.vector_index.index_name.as_str()).filter(|n| !n.trim().is_empty());

        match (openai, pinecone, index) {
            (Some(openai_api_key), Some(pinecone_api_key), Some(index_name)) => {
                Ok(ProviderCredentials {
                    openai_api_key,
                    pinecone_api_key,
                    index_name,
                })
            }
            _ => {
                let missing: Vec<&str> = [
                    (openai.is_none(), "OPENAI_API_KEY (embedding.api_key)"),
                    (pinecone.is_none(), "PINECONE_API_KEY (vector_index.api_key)"),
                    (index.is_none(), "PINECONE_INDEX_NAME (vector_index.index_name)"),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();

                Err(DomainError::configuration(format!(
                    "Missing required settings: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn credential_presence(&self) -> CredentialPresence {
        CredentialPresence {
            embedding_key: !is_blank(&self.embedding.api_key),
            index_key: !is_blank(&self.vector_index.api_key),
        }
    }

    /// Service settings derived from the `embedding`, `vector_index` and `search` sections
    pub fn knowledge_search_config(&self) -> KnowledgeSearchConfig {
        KnowledgeSearchConfig::default()
            .with_embedding_model(self.embedding.model.clone())
            .with_upstream_timeout(Duration::from_millis(self.search.upstream_timeout_ms))
            .with_namespace(self.vector_index.namespace.clone())
            .with_derived(self.search.derived.clone())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    non_blank(value).is_none()
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
