//! HTTP-facing error taxonomy.
//!
//! Every failure a handler can produce maps to one [`ApiError`] variant, and
//! every variant renders as an [`ErrorResponse`] envelope with a fixed status.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use super::envelope::ErrorResponse;
use crate::db::DbError;
use crate::db::validation::Violation;

#[derive(Error, Debug)]
pub enum ApiError {
    /// One or more field rules failed.
    #[error("Validation failed: {}", summarize(.0))]
    Validation(Vec<Violation>),

    /// The referenced todo does not exist.
    #[error("Todo '{id}' not found")]
    NotFound { id: String },

    /// Unparseable body, path or query parameter.
    #[error("{0}")]
    MalformedRequest(String),

    /// Storage failed; details are logged, never returned.
    #[error("Storage error: {0}")]
    Storage(#[source] DbError),
}

/// Join violation messages for a single-line error string.
pub fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { id, .. } => ApiError::NotFound { id },
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(_: PathRejection) -> Self {
        ApiError::MalformedRequest("Invalid todo ID".to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::MalformedRequest(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(violations) => {
                ErrorResponse::new("Validation failed", summarize(&violations))
                    .with_violations(violations)
            }
            ApiError::NotFound { .. } => ErrorResponse::new("Todo not found", "Not Found"),
            ApiError::MalformedRequest(message) => ErrorResponse::new(message, "Bad Request"),
            ApiError::Storage(e) => {
                error!(error = %e, "Storage operation failed");
                internal_error_body()
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Opaque body for any 500.
pub(crate) fn internal_error_body() -> ErrorResponse {
    ErrorResponse::new("Internal server error", "Internal Server Error")
}
