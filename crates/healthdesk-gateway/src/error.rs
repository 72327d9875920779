//! HTTP error mapping. Bodies are always `{"error": "..."}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use healthdesk_core::{FormKind, SubmissionError};

pub const MISSING_FIELDS: &str = "Missing required fields.";
pub const INTERNAL_ERROR: &str = "Internal server error";

#[derive(Debug)]
pub enum ApiError {
    /// 400: a required field was absent or falsy. Field names are not disclosed.
    MissingFields,
    /// 500: the store rejected or timed out the write. Internals are not disclosed.
    Persistence(FormKind),
    /// 500: anything unexpected (unparseable body, panicked handler).
    Internal,
}

impl ApiError {
    pub fn from_submission(kind: FormKind, err: SubmissionError) -> Self {
        match err {
            SubmissionError::Validation(_) => ApiError::MissingFields,
            SubmissionError::Persistence(_) => ApiError::Persistence(kind),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::MissingFields => (StatusCode::BAD_REQUEST, MISSING_FIELDS),
            ApiError::Persistence(kind) => (StatusCode::INTERNAL_SERVER_ERROR, kind.failure_message()),
            ApiError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// `CatchPanicLayer` handler: a panicking request becomes a generic 500.
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("[GATEWAY] Unhandled error: {}", detail);
    ApiError::Internal.into_response()
}
