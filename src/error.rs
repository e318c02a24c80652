use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sea_orm::DbErr;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or missing input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Uniqueness violation (duplicate username/email).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Referenced record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Missing/invalid session, or the session user does not own the record.
    #[error("Unauthorized")]
    Unauthorized,

    /// AI provider failure. Chat and affirmation generation recover from this
    /// locally with canned text; it only surfaces if recovery is impossible.
    #[error("Upstream provider error: {0}")]
    Upstream(String),

    /// A database error from sea-orm.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Reclassify a unique-constraint violation as a conflict with a
    /// caller-supplied message; anything else stays a database error.
    pub fn conflict_on_unique(err: DbErr, message: &str) -> Self {
        match err.sql_err() {
            Some(sea_orm::SqlErr::UniqueConstraintViolation(_)) => {
                ApiError::Conflict(message.to_string())
            }
            _ => ApiError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{what} not found")),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "Upstream provider unavailable".to_string(),
                )
            }
            ApiError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}
