//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, CredentialPresence, EmbeddingSettings, EnhancerSettings, LogFormat, LoggingConfig,
    ProviderCredentials, SearchSettings, ServerConfig, VectorIndexSettings,
};
