//! Livestock Error Types
//!
//! Livestock-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Livestock-specific result type alias
pub type LivestockResult<T> = Result<T, LivestockError>;

#[derive(Debug, Error)]
pub enum LivestockError {
    /// Path segment is not a positive integer
    #[error("Invalid {0} ID")]
    InvalidId(&'static str),

    /// A required request field is absent
    #[error("{0}")]
    MissingFields(&'static str),

    /// A field is present but out of range or malformed
    #[error("{0}")]
    Validation(String),

    #[error("Farm not found or you do not have access")]
    FarmNotFound,

    /// The referenced farm is not the caller's, on create or reassign
    #[error("Farm not found or you do not have access")]
    FarmForbidden,

    #[error("Livestock not found or you do not have access")]
    LivestockNotFound,

    #[error("Notification not found or you do not have access")]
    NotificationNotFound,

    /// Device primary key is not base64
    #[error("Primary key must be a base64 string")]
    InvalidPrimaryKey,

    /// Ownership and other errors raised by the kernel
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LivestockError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LivestockError::InvalidId(_)
            | LivestockError::MissingFields(_)
            | LivestockError::Validation(_)
            | LivestockError::InvalidPrimaryKey => ErrorKind::BadRequest,
            LivestockError::FarmForbidden => ErrorKind::Forbidden,
            LivestockError::FarmNotFound
            | LivestockError::LivestockNotFound
            | LivestockError::NotificationNotFound => ErrorKind::NotFound,
            LivestockError::App(err) => err.kind(),
            LivestockError::Database(_) | LivestockError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError. Server-side details stay out of the message.
    pub fn into_app_error(self) -> AppError {
        match self {
            LivestockError::App(err) => err,
            LivestockError::Database(err) => AppError::from(err),
            LivestockError::Internal(_) => AppError::internal("Internal server error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            LivestockError::Database(e) => {
                tracing::error!(error = %e, "Livestock database error");
            }
            LivestockError::Internal(msg) => {
                tracing::error!(message = %msg, "Livestock internal error");
            }
            LivestockError::FarmForbidden => {
                tracing::warn!("Attempt to use a farm owned by another user");
            }
            _ => {
                tracing::debug!(error = %self, "Livestock error");
            }
        }
    }
}

impl IntoResponse for LivestockError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<platform::sas::SasError> for LivestockError {
    fn from(err: platform::sas::SasError) -> Self {
        match err {
            platform::sas::SasError::InvalidKey => LivestockError::InvalidPrimaryKey,
        }
    }
}
