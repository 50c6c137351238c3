//! JSON extractor whose rejections use the API error envelope

use axum::{
    extract::{rejection::JsonRejection as AxumRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::{de::DeserializeOwned, Serialize};

use super::error::{ApiErrorDetail, ApiErrorResponse, ApiErrorType};

/// Drop-in for `axum::Json`
///
/// A tool body that fails to parse answers with the same
/// `{"error": {...}}` shape as every other client error.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

/// Body rejection rendered as an `invalid_request_error`
#[derive(Debug)]
pub struct JsonRejection {
    status: StatusCode,
    message: String,
    code: &'static str,
}

impl JsonRejection {
    fn from_axum(rejection: &AxumRejection) -> Self {
        let (message, code) = match rejection {
            AxumRejection::JsonDataError(err) => (
                format!("Invalid tool arguments: {}", err.body_text()),
                "invalid_arguments",
            ),
            AxumRejection::JsonSyntaxError(err) => (
                format!("Invalid JSON syntax: {}", err.body_text()),
                "json_parse_error",
            ),
            AxumRejection::MissingJsonContentType(_) => (
                "Missing Content-Type header. Expected 'application/json'.".to_string(),
                "missing_content_type",
            ),
            AxumRejection::BytesRejection(err) => (
                format!("Failed to read request body: {}", err.body_text()),
                "body_read_error",
            ),
            _ => ("Invalid JSON request".to_string(), "json_parse_error"),
        };

        Self {
            status: rejection.status(),
            message,
            code,
        }
    }
}

impl IntoResponse for JsonRejection {
    fn into_response(self) -> Response {
        let response = ApiErrorResponse {
            error: ApiErrorDetail {
                message: self.message,
                error_type: ApiErrorType::InvalidRequestError,
                param: None,
                code: Some(self.code.to_string()),
            },
        };

        (self.status, AxumJson(response)).into_response()
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        AxumJson::<T>::from_request(req, state)
            .await
            .map(|AxumJson(value)| Json(value))
            .map_err(|rejection| JsonRejection::from_axum(&rejection))
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}
