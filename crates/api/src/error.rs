use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use petitions_core::error::{reason, CoreError};
use serde_json::json;

use crate::request_id;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every response body has the shape
/// `{ "error", "code", "reason", "request_id", "timestamp" }` where `code` is
/// the error class and `reason` the stable domain reason (it repeats `code`
/// for errors without one).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `petitions_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A sqlx error from a handler that queries the pool itself. Lifecycle
    /// operations classify store failures and arrive as [`AppError::Core`].
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed request the handler could not decode.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, reason, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_ARGUMENT",
                reason::INVALID_ARGUMENT,
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    reason::INTERNAL_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
            "reason": reason,
            "request_id": request_id::current(),
            "timestamp": Utc::now(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a domain error to HTTP status, error class, reason and message.
fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, &'static str, String) {
    let (status, code) = match err {
        CoreError::InvalidArgument { .. } | CoreError::InvalidPetitionStatus(_) => {
            (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
        }
        CoreError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
        CoreError::RoleIsNotApplicable { .. } => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
        CoreError::PetitionNotFound { .. }
        | CoreError::SignatureNotFound { .. }
        | CoreError::SignatureNotFoundForUser { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        CoreError::SignatureAlreadyExists { .. } => (StatusCode::CONFLICT, "ALREADY_EXISTS"),
        CoreError::PetitionNotAvailable { .. } => {
            (StatusCode::PRECONDITION_FAILED, "FAILED_PRECONDITION")
        }
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                reason::INTERNAL_ERROR,
                INTERNAL_MESSAGE.to_string(),
            );
        }
    };
    (status, code, err.reason(), err.to_string())
}

/// Classify a raw sqlx error. `RowNotFound` is a 404; anything else is a
/// sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                reason::INTERNAL_ERROR,
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}
