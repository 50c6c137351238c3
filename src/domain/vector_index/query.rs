//! Vector index query and match types

use serde::{Deserialize, Serialize};

use super::MetadataFilter;

/// Nearest-neighbour query against a vector index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexQuery {
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub filter: Option<MetadataFilter>,
    pub namespace: Option<String>,
    pub include_metadata: bool,
}

impl IndexQuery {
    pub fn new(vector: Vec<f32>, top_k: usize) -> Self {
        Self {
            vector,
            top_k,
            filter: None,
            namespace: None,
            include_metadata: true,
        }
    }

    pub fn with_filter(mut self, filter: Option<MetadataFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }
}

/// A neighbour returned by the index, in the index's own ranking order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IndexMatch {
    pub id: String,
    #[serde(default)]
    pub score: Option<f32>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl IndexMatch {
    pub fn new(id: impl Into<String>, score: f32) -> Self {
        Self {
            id: id.into(),
            score: Some(score),
            metadata: serde_json::Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// String metadata value, `None` when absent or not a string
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = IndexQuery::new(vec![0.1, 0.2], 5);

        assert_eq!(query.top_k, 5);
        assert!(query.filter.is_none());
        assert!(query.namespace.is_none());
        assert!(query.include_metadata);
    }

    #[test]
    fn test_query_with_filter() {
        let query = IndexQuery::new(vec![], 3)
            .with_filter(Some(MetadataFilter::eq("category", "Books")));

        assert_eq!(query.filter, Some(MetadataFilter::eq("category", "Books")));
    }

    #[test]
    fn test_metadata_str_ignores_non_strings() {
        let m = IndexMatch::new("a", 0.5)
            .with_metadata("title", "Scaling to 10k")
            .with_metadata("views", 1200);

        assert_eq!(m.metadata_str("title"), Some("Scaling to 10k"));
        assert_eq!(m.metadata_str("views"), None);
        assert_eq!(m.metadata_str("missing"), None);
    }

    #[test]
    fn test_match_deserializes_without_score_or_metadata() {
        let m: IndexMatch = serde_json::from_value(serde_json::json!({"id": "doc-1"})).unwrap();

        assert_eq!(m.id, "doc-1");
        assert!(m.score.is_none());
        assert!(m.metadata.is_empty());
    }
}
