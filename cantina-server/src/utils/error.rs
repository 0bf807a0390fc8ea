//! Unified error handling
//!
//! Application error enum plus the API response envelope:
//! - [`AppError`] - application errors
//! - [`AppResponse`] - `{code, message, data}` envelope
//!
//! # Error code convention
//!
//! | code | meaning |
//! |------|---------|
//! | E0002 | validation failed |
//! | E0003 | resource not found |
//! | E0005 | business rule violation |
//! | E9002 | database error |
//! | E9003 | configuration error |
//! | E9001 | internal error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// Unified API error envelope
///
/// ```json
/// { "code": "E0003", "message": "Resource not found: Order 42" }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application error enum
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Referenced entity does not exist (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Input rejected before any write (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Precondition on current state rejected (422),
    /// e.g. a PIX charge against a cancelled order
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Server-side configuration problem (500).
    /// Messages must never include configured secrets such as the PIX key.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Store error (500); detail is logged, not echoed
    #[error("Database error: {0}")]
    Database(String),

    /// Everything else (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn business_rule(msg: impl Into<String>) -> Self {
        Self::BusinessRule(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("Row not found".into()),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::BusinessRule(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E0005", msg.as_str())
            }
            AppError::Configuration(msg) => {
                error!(target: "config", error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9003",
                    "Server configuration error",
                )
            }
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}
