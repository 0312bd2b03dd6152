use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Insufficient credits")]
    InsufficientCredits,

    #[error("Resume parsing error: {0}")]
    ResumeParse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Job search error: {0}")]
    JobSearch(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<crate::credits::LedgerError> for AppError {
    fn from(e: crate::credits::LedgerError) -> Self {
        use crate::credits::LedgerError;
        match e {
            LedgerError::InsufficientCredits => AppError::InsufficientCredits,
            LedgerError::UserNotFound => AppError::NotFound("user not found".to_string()),
            LedgerError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<crate::tracker::store::StoreError> for AppError {
    fn from(e: crate::tracker::store::StoreError) -> Self {
        use crate::tracker::store::StoreError;
        match e {
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Serialize(e) => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            // Machine-readable PAYWALL code so the client can branch to the
            // upgrade flow instead of showing a generic error.
            AppError::InsufficientCredits => (
                StatusCode::PAYMENT_REQUIRED,
                "PAYWALL",
                "Out of credits. Upgrade to continue.".to_string(),
            ),
            AppError::ResumeParse(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "RESUME_PARSE", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "An AI processing error occurred".to_string(),
                )
            }
            AppError::JobSearch(msg) => {
                tracing::error!("Job search error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "JOB_SEARCH_ERROR",
                    "The job listings provider returned an error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
