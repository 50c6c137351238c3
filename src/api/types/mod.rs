//! Request, response and error types for the HTTP API

pub mod error;
pub mod json;
pub mod knowledge;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType};
pub use json::Json;
pub use knowledge::{
    CaseStudiesRequest, ContextSearchRequest, CreatorContentRequest, DiagnosticEnvironment,
    DiagnosticSample, DiagnosticsResponse, SearchKnowledgeRequest, ToolMessages, ToolResponse,
    ToolResult,
};
