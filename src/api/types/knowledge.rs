//! Knowledge tool request bodies and the response envelope

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::SearchResult;
use crate::domain::DomainError;

/// `POST /v1/knowledge/search`
#[derive(Debug, Clone, Deserialize)]
pub struct SearchKnowledgeRequest {
    pub query: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `POST /v1/knowledge/case-studies`
#[derive(Debug, Clone, Deserialize)]
pub struct CaseStudiesRequest {
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `POST /v1/knowledge/creator`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatorContentRequest {
    pub creator: String,
    pub query: String,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// `POST /v1/knowledge/context`
#[derive(Debug, Clone, Deserialize)]
pub struct ContextSearchRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

/// A search result as shown to a tool caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub title: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Whole-percent score, e.g. `"87%"`
    pub relevance: String,
    pub has_video: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl From<&SearchResult> for ToolResult {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            category: result.category.clone(),
            creator: result.creator.clone(),
            relevance: format!("{}%", result.relevance_percent()),
            has_video: result.video_url.is_some(),
            video_url: result.video_url.clone(),
        }
    }
}

/// Envelope every knowledge tool answers with
///
/// Found, not found and upstream failure all use this shape; only
/// `success`, `message` and `error` tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResponse {
    pub success: bool,
    pub message: String,
    pub results: Vec<ToolResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Wording for one tool's three outcomes
#[derive(Debug, Clone)]
pub struct ToolMessages {
    /// Noun for what was found, e.g. "relevant documents"
    pub found: String,
    pub none: String,
    pub failed: String,
}

impl ToolResponse {
    /// Envelope for a tagged search outcome
    pub fn from_outcome(
        outcome: Result<Vec<SearchResult>, DomainError>,
        messages: &ToolMessages,
    ) -> Self {
        match outcome {
            Ok(results) if results.is_empty() => Self {
                success: false,
                message: messages.none.clone(),
                results: Vec::new(),
                error: None,
            },
            Ok(results) => Self {
                success: true,
                message: format!("Found {} {}", results.len(), messages.found),
                results: results.iter().map(ToolResult::from).collect(),
                error: None,
            },
            Err(e) => Self {
                success: false,
                message: messages.failed.clone(),
                results: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// Output of the diagnostics probe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsResponse {
    pub status: String,
    pub probe_query: String,
    pub results_found: usize,
    pub samples: Vec<DiagnosticSample>,
    pub environment: DiagnosticEnvironment,
    pub cache_entries: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticSample {
    pub title: String,
    pub category: String,
    pub score: f32,
    pub content_length: usize,
}

impl From<&SearchResult> for DiagnosticSample {
    fn from(result: &SearchResult) -> Self {
        Self {
            title: result.title.clone(),
            category: result.category.clone(),
            score: result.score,
            content_length: result.content.chars().count(),
        }
    }
}

/// Which upstreams the running service is wired to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEnvironment {
    pub embedding_provider: String,
    pub embedding_model: String,
    pub index_name: String,
    pub has_embedding_key: bool,
    pub has_index_key: bool,
}
