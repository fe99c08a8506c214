//! HTTP-facing error type
//!
//! Handlers return `Result<_, AppError>`; the conversion into a response
//! picks the status code and a `{"error": ...}` body. Store and internal
//! failures are logged in full and reported to the caller with a generic
//! message only.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::database::StoreError;

const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    /// Auto-generation gave up after this many candidates
    #[error("no unused code found after {0} attempts")]
    Exhausted(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => {
                tracing::warn!("Conflict: {}", msg);
                (StatusCode::CONFLICT, msg)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Exhausted(attempts) => {
                tracing::error!("Code generation exhausted after {} attempts", attempts);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
            }
            AppError::Store(err) => match err {
                StoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                StoreError::Conflict(code) => {
                    tracing::warn!(%code, "Code taken at insert time");
                    (StatusCode::CONFLICT, "Code already exists".to_string())
                }
                StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "Link not found".to_string()),
                err @ (StoreError::Unavailable(_) | StoreError::Codec(_)) => {
                    tracing::error!("Store error: {}", err);
                    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
                }
            },
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
