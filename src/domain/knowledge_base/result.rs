//! Search results shaped from vector index matches

use serde::{Deserialize, Serialize};

use crate::domain::vector_index::IndexMatch;

const UNKNOWN: &str = "Unknown";

/// A knowledge base document returned by a search
///
/// Results keep the index's ranking order; `score` is carried through
/// untouched and never used to re-sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    pub score: f32,
}

impl SearchResult {
    pub fn new(title: impl Into<String>, category: impl Into<String>, score: f32) -> Self {
        Self {
            title: title.into(),
            content: String::new(),
            category: category.into(),
            creator: None,
            video_url: None,
            score,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
        self.video_url = Some(url.into());
        self
    }

    /// Map an index match, substituting defaults for missing or non-string metadata
    pub fn from_match(m: &IndexMatch) -> Self {
        let text = |key: &str| m.metadata_str(key).filter(|s| !s.is_empty());

        Self {
            title: text("title").unwrap_or(UNKNOWN).to_string(),
            content: text("content").unwrap_or_default().to_string(),
            category: text("category").unwrap_or(UNKNOWN).to_string(),
            creator: text("creator").map(str::to_string),
            video_url: text("video_url").map(str::to_string),
            score: m.score.unwrap_or(0.0),
        }
    }

    /// Score as a whole percentage, e.g. `0.874` -> `87`
    pub fn relevance_percent(&self) -> i64 {
        (f64::from(self.score) * 100.0).round() as i64
    }

    /// Case-insensitive substring match against the title
    pub fn title_contains(&self, needle_lower: &str) -> bool {
        self.title.to_lowercase().contains(needle_lower)
    }

    /// Case-insensitive substring match against the creator, `false` when unattributed
    pub fn creator_contains(&self, needle_lower: &str) -> bool {
        self.creator
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle_lower))
    }
}
