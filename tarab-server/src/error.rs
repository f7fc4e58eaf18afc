//! HTTP error mapping for tarab-server
//!
//! Every store failure surfaces as `{"success": false, "error": "..."}` with
//! a status code reflecting the taxonomy: 400 for validation/precondition,
//! 404 for not-found/no-content, 500 for storage and unclassified errors.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request body or parameters (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Store-level error, mapped per taxonomy
    #[error(transparent)]
    Store(#[from] tarab_common::Error),

    /// Multipart body could not be read (400)
    #[error("Malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// Generic error (500)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use tarab_common::Error;

        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Multipart(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Store(err) => match err {
                Error::Validation(msg) | Error::Precondition(msg) => {
                    (StatusCode::BAD_REQUEST, msg)
                }
                Error::NotFound(msg) | Error::NoContent(msg) => (StatusCode::NOT_FOUND, msg),
                other => {
                    tracing::error!("Store error: {}", other);
                    (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
                }
            },
            ApiError::Other(err) => {
                tracing::error!("Unhandled error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
