//! Knowledge tool endpoints

use axum::{extract::State, http::StatusCode};
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CaseStudiesRequest, ContextSearchRequest, CreatorContentRequest,
    DiagnosticEnvironment, DiagnosticSample, DiagnosticsResponse, Json, SearchKnowledgeRequest,
    ToolMessages, ToolResponse,
};
use crate::domain::knowledge_base::{SearchRequest, DEFAULT_SEARCH_LIMIT};
use crate::infrastructure::services::DEFAULT_DERIVED_LIMIT;

/// Largest result count a caller may ask for
pub const MAX_TOOL_LIMIT: usize = 50;

const PROBE_LIMIT: usize = 5;
const PROBE_SAMPLES: usize = 3;

/// Search the knowledge base, optionally within one category
pub async fn search_knowledge(
    State(state): State<AppState>,
    Json(request): Json<SearchKnowledgeRequest>,
) -> Result<Json<ToolResponse>, ApiError> {
    require_text("query", &request.query)?;
    let limit = tool_limit(request.limit, DEFAULT_SEARCH_LIMIT)?;

    debug!(query = %request.query, category = ?request.category, limit, "Knowledge search");

    let search = SearchRequest::new(request.query)
        .with_category(request.category.filter(|c| !c.is_empty()))
        .with_limit(limit);

    let outcome = state.knowledge.try_search(&search).await;

    Ok(Json(ToolResponse::from_outcome(
        outcome,
        &ToolMessages {
            found: "relevant documents".to_string(),
            none: "No relevant information found in the knowledge base".to_string(),
            failed: "Error searching knowledge base".to_string(),
        },
    )))
}

/// Find case studies and revenue stories
pub async fn search_case_studies(
    State(state): State<AppState>,
    Json(request): Json<CaseStudiesRequest>,
) -> Result<Json<ToolResponse>, ApiError> {
    require_text("query", &request.query)?;
    let limit = tool_limit(request.limit, DEFAULT_DERIVED_LIMIT)?;

    let outcome = state
        .knowledge
        .try_search_case_studies(&request.query, Some(limit))
        .await;

    Ok(Json(ToolResponse::from_outcome(
        outcome,
        &ToolMessages {
            found: "relevant case studies".to_string(),
            none: "No relevant case studies found in the knowledge base".to_string(),
            failed: "Error searching case studies".to_string(),
        },
    )))
}

/// Find material from one creator
pub async fn search_creator_content(
    State(state): State<AppState>,
    Json(request): Json<CreatorContentRequest>,
) -> Result<Json<ToolResponse>, ApiError> {
    require_text("creator", &request.creator)?;
    require_text("query", &request.query)?;
    let limit = tool_limit(request.limit, DEFAULT_DERIVED_LIMIT)?;

    let outcome = state
        .knowledge
        .try_search_by_creator(&request.creator, &request.query, Some(limit))
        .await;

    Ok(Json(ToolResponse::from_outcome(
        outcome,
        &ToolMessages {
            found: format!("relevant documents from {}", request.creator),
            none: format!("No relevant content found from {}", request.creator),
            failed: "Error searching creator content".to_string(),
        },
    )))
}

/// Search with extra conversational context, dropping weak matches
pub async fn search_with_context(
    State(state): State<AppState>,
    Json(request): Json<ContextSearchRequest>,
) -> Result<Json<ToolResponse>, ApiError> {
    require_text("query", &request.query)?;
    let limit = tool_limit(request.limit, DEFAULT_DERIVED_LIMIT)?;

    let outcome = state
        .knowledge
        .try_search_with_context(
            &request.query,
            request.context.as_deref(),
            request.category.as_deref().filter(|c| !c.is_empty()),
            Some(limit),
        )
        .await;

    Ok(Json(ToolResponse::from_outcome(
        outcome,
        &ToolMessages {
            found: "relevant documents".to_string(),
            none: "No relevant information found in the knowledge base".to_string(),
            failed: "Error searching knowledge base".to_string(),
        },
    )))
}

/// Run a fixed probe query against the live upstreams and report what came back
///
/// The probe skips the cache, so a failing index shows up immediately. A
/// failed probe answers with the status its error maps to.
pub async fn diagnostics(
    State(state): State<AppState>,
) -> (StatusCode, Json<DiagnosticsResponse>) {
    let knowledge = &state.knowledge;
    let probe = SearchRequest::new(state.probe_query.clone()).with_limit(PROBE_LIMIT);

    let outcome = knowledge.probe(&probe).await;

    let environment = DiagnosticEnvironment {
        embedding_provider: knowledge.embedding_provider().to_string(),
        embedding_model: knowledge.config().embedding_model.clone(),
        index_name: knowledge.index_name().to_string(),
        has_embedding_key: state.credentials.embedding_key,
        has_index_key: state.credentials.index_key,
    };

    let (http_status, status, results, error) = match outcome {
        Ok(results) => (StatusCode::OK, "ok", results, None),
        Err(e) => {
            let message = e.to_string();
            (ApiError::from(e).status, "error", Vec::new(), Some(message))
        }
    };

    info!(
        status,
        results_found = results.len(),
        index = %environment.index_name,
        "Knowledge base diagnostics probe"
    );

    let body = DiagnosticsResponse {
        status: status.to_string(),
        probe_query: state.probe_query.clone(),
        results_found: results.len(),
        samples: results
            .iter()
            .take(PROBE_SAMPLES)
            .map(DiagnosticSample::from)
            .collect(),
        environment,
        cache_entries: knowledge.cache().len(),
        error,
    };

    (http_status, Json(body))
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("'{}' must not be empty", field)).with_param(field));
    }

    Ok(())
}

/// Missing or zero limits fall back to the tool default
fn tool_limit(requested: Option<usize>, default: usize) -> Result<usize, ApiError> {
    match requested.filter(|l| *l > 0) {
        None => Ok(default),
        Some(limit) if limit <= MAX_TOOL_LIMIT => Ok(limit),
        Some(limit) => Err(ApiError::bad_request(format!(
            "'limit' must be at most {}, got {}",
            MAX_TOOL_LIMIT, limit
        ))
        .with_param("limit")),
    }
}
