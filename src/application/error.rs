//! Application error type and axum response mapping.
//!
//! Business-rule violations are recovered at the operation boundary and
//! turned into structured JSON responses; unexpected storage failures
//! propagate as 500 for that request only.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    /// Field-level validation failure. Cross-tenant foreign-key assignments
    /// surface here as "not a valid choice" so they are indistinguishable
    /// from a plain bad reference.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(field: &str, message: &str) -> Self {
        AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// The standard rejection for a tenant-scoped reference that does not
    /// resolve within the acting user's school.
    pub fn not_a_valid_choice(field: &str) -> Self {
        Self::validation(field, "not a valid choice")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({ "detail": msg }),
            ),
            AppError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                serde_json::json!({
                    "detail": "validation failed",
                    "errors": { field: message }
                }),
            ),
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                serde_json::json!({ "detail": msg }),
            ),
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, serde_json::json!({ "detail": msg }))
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "detail": msg }))
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "detail": "internal server error" }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    serde_json::json!({ "detail": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Unwrap transaction-closure errors back into the application error they
/// carry; connection-level failures stay database errors.
impl From<sea_orm::TransactionError<AppError>> for AppError {
    fn from(e: sea_orm::TransactionError<AppError>) -> Self {
        match e {
            sea_orm::TransactionError::Connection(e) => AppError::Database(e),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

/// Map `validator` derive output into a single field-level `AppError`.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let (field, error) = errors
            .field_errors()
            .into_iter()
            .next()
            .map(|(field, errs)| {
                let msg = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "invalid value".to_string());
                (field.to_string(), msg)
            })
            .unwrap_or_else(|| ("body".to_string(), "invalid value".to_string()));
        AppError::Validation {
            field,
            message: error,
        }
    }
}
