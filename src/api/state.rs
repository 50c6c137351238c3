//! Application state for shared services

use std::sync::Arc;

use crate::config::CredentialPresence;
use crate::infrastructure::observability::PrometheusMetrics;
use crate::infrastructure::services::KnowledgeSearchService;

/// Query the diagnostics endpoint probes the index with
pub const DEFAULT_PROBE_QUERY: &str = "product research";

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub knowledge: Arc<KnowledgeSearchService>,
    pub metrics: Option<PrometheusMetrics>,
    pub probe_query: String,
    /// Reported by diagnostics
    pub credentials: CredentialPresence,
}

impl AppState {
    pub fn new(knowledge: Arc<KnowledgeSearchService>) -> Self {
        Self {
            knowledge,
            metrics: None,
            probe_query: DEFAULT_PROBE_QUERY.to_string(),
            credentials: CredentialPresence::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: Option<PrometheusMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialPresence) -> Self {
        self.credentials = credentials;
        self
    }
}
