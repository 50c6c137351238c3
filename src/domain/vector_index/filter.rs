//! Exact-match metadata filters for vector index queries
//!
//! Managed vector indexes only filter on metadata equality, so anything
//! richer (substring, title heuristics) is applied client-side after the
//! query returns.

use serde::{Deserialize, Serialize};

/// Filter value for a metadata field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl FilterValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::json!(s),
            Self::Integer(n) => serde_json::json!(n),
            Self::Float(n) => serde_json::json!(n),
            Self::Boolean(b) => serde_json::json!(b),
        }
    }
}

/// A single `field == value` condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub value: FilterValue,
}

/// Conjunction of equality conditions
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetadataFilter {
    conditions: Vec<FilterCondition>,
}

impl MetadataFilter {
    /// Filter matching records whose `field` equals `value`
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::default().and_eq(field, value)
    }

    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.conditions.push(FilterCondition {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn conditions(&self) -> &[FilterCondition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}
