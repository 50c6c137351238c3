//! Embedding request types

use serde::{Deserialize, Serialize};

/// Request to embed one search query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    model: String,
    input: String,
    /// Requested output size, for models that can shorten their vectors
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

impl EmbeddingRequest {
    pub fn single(model: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: text.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_request() {
        let request = EmbeddingRequest::single("text-embedding-3-small", "find winners");

        assert_eq!(request.model(), "text-embedding-3-small");
        assert_eq!(request.input(), "find winners");
        assert!(request.dimensions().is_none());
    }

    #[test]
    fn test_with_dimensions() {
        let request = EmbeddingRequest::single("m", "x").with_dimensions(512);
        assert_eq!(request.dimensions(), Some(512));
    }
}
