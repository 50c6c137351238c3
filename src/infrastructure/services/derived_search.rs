//! Purpose-built searches layered over the basic knowledge search
//!
//! Each helper rewrites the query, fetches through the cached search and
//! then filters locally. Local filtering only ever drops results, so the
//! index's ranking order survives.

use serde::Deserialize;

use super::knowledge_search_service::KnowledgeSearchService;
use crate::domain::knowledge_base::{SearchRequest, SearchResult};
use crate::domain::DomainError;

/// Default result count for the derived helpers
pub const DEFAULT_DERIVED_LIMIT: usize = 3;

/// Thresholds and keyword sets used by the derived helpers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DerivedSearchConfig {
    /// Context search keeps results scoring strictly above this
    pub context_relevance_floor: f32,
    /// Terms appended to a case-study query
    pub case_study_terms: String,
    /// Lower-cased title substrings that mark a case study
    pub case_study_title_markers: Vec<String>,
    /// Case-study search also keeps results scoring strictly above this
    pub case_study_score_floor: f32,
    /// Multiplier on the requested limit for helpers that filter locally
    pub over_fetch_factor: usize,
}

impl Default for DerivedSearchConfig {
    fn default() -> Self {
        Self {
            context_relevance_floor: 0.3,
            case_study_terms: "case study revenue income money success".to_string(),
            case_study_title_markers: ["case study", "$", "revenue", "income"]
                .into_iter()
                .map(String::from)
                .collect(),
            case_study_score_floor: 0.4,
            over_fetch_factor: 2,
        }
    }
}

impl DerivedSearchConfig {
    fn over_fetch(&self, limit: usize) -> usize {
        limit.saturating_mul(self.over_fetch_factor.max(1))
    }

    fn is_case_study(&self, result: &SearchResult) -> bool {
        let title = result.title.to_lowercase();

        self.case_study_title_markers
            .iter()
            .any(|marker| title.contains(marker.to_lowercase().as_str()))
            || result.score > self.case_study_score_floor
    }
}

impl KnowledgeSearchService {
    /// Search with optional extra context, dropping weak matches
    pub async fn search_with_context(
        &self,
        query: &str,
        context: Option<&str>,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<SearchResult> {
        self.try_search_with_context(query, context, category, limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(query, error = %e, "Context search failed, returning no results");
                Vec::new()
            })
    }

    pub async fn try_search_with_context(
        &self,
        query: &str,
        context: Option<&str>,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let full_query = match context.filter(|c| !c.is_empty()) {
            Some(context) => format!("{} {}", query, context),
            None => query.to_string(),
        };

        let request = SearchRequest::new(full_query)
            .with_category(category)
            .with_limit(limit.unwrap_or(DEFAULT_DERIVED_LIMIT));

        let floor = self.config().derived.context_relevance_floor;

        Ok(self
            .try_search(&request)
            .await?
            .into_iter()
            .filter(|r| r.score > floor)
            .collect())
    }

    /// Search for success stories: case-study titles or strong matches
    pub async fn search_case_studies(&self, query: &str, limit: Option<usize>) -> Vec<SearchResult> {
        self.try_search_case_studies(query, limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(query, error = %e, "Case study search failed, returning no results");
                Vec::new()
            })
    }

    pub async fn try_search_case_studies(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let derived = &self.config().derived;
        let limit = limit.unwrap_or(DEFAULT_DERIVED_LIMIT);

        let request = SearchRequest::new(format!("{} {}", query, derived.case_study_terms))
            .with_limit(derived.over_fetch(limit));

        Ok(self
            .try_search(&request)
            .await?
            .into_iter()
            .filter(|r| derived.is_case_study(r))
            .take(limit)
            .collect())
    }

    /// Search for material attributed to, or titled with, a creator
    pub async fn search_by_creator(
        &self,
        creator: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Vec<SearchResult> {
        self.try_search_by_creator(creator, query, limit)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(creator, query, error = %e, "Creator search failed, returning no results");
                Vec::new()
            })
    }

    pub async fn try_search_by_creator(
        &self,
        creator: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_DERIVED_LIMIT);
        let needle = creator.to_lowercase();

        let request = SearchRequest::new(format!("{} {}", query, creator))
            .with_limit(self.config().derived.over_fetch(limit));

        Ok(self
            .try_search(&request)
            .await?
            .into_iter()
            .filter(|r| r.creator_contains(&needle) || r.title_contains(&needle))
            .take(limit)
            .collect())
    }
}
