//! Error handling for Colecta
//!
//! This module defines the main error type used throughout the application,
//! its mapping onto HTTP responses, and a few classification helpers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Main error type for the Colecta application
#[derive(Error, Debug)]
pub enum ColectaError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{0}")]
    Conflict(String),

    #[error("Insufficient stock for product {product_id} at {location}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        location: String,
        available: i64,
        requested: i64,
    },

    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload error: {0}")]
    Upload(String),
}

/// Result type alias for Colecta operations
pub type Result<T> = std::result::Result<T, ColectaError>;

impl ColectaError {
    /// Shorthand for a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        ColectaError::Validation(message.into())
    }

    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            ColectaError::Database(_) => false,
            ColectaError::Migration(_) => false,
            ColectaError::Config(_) => false,
            ColectaError::Validation(_) => false,
            ColectaError::NotFound { .. } => false,
            ColectaError::Conflict(_) => false,
            ColectaError::InsufficientStock { .. } => true,
            ColectaError::Unauthorized(_) => false,
            ColectaError::PermissionDenied(_) => false,
            ColectaError::RateLimitExceeded => true,
            ColectaError::Token(_) => false,
            ColectaError::PasswordHash(_) => false,
            ColectaError::Redis(_) => true,
            ColectaError::Serialization(_) => false,
            ColectaError::Io(_) => true,
            ColectaError::Upload(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ColectaError::Database(_) => ErrorSeverity::Critical,
            ColectaError::Migration(_) => ErrorSeverity::Critical,
            ColectaError::Config(_) => ErrorSeverity::Critical,
            ColectaError::PermissionDenied(_) => ErrorSeverity::Warning,
            ColectaError::Unauthorized(_) => ErrorSeverity::Warning,
            ColectaError::Token(_) => ErrorSeverity::Warning,
            ColectaError::RateLimitExceeded => ErrorSeverity::Warning,
            ColectaError::Validation(_) => ErrorSeverity::Info,
            ColectaError::NotFound { .. } => ErrorSeverity::Info,
            ColectaError::Conflict(_) => ErrorSeverity::Info,
            ColectaError::InsufficientStock { .. } => ErrorSeverity::Info,
            ColectaError::Upload(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// HTTP status and machine-readable kind for this error
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ColectaError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ColectaError::InsufficientStock { .. } => (StatusCode::BAD_REQUEST, "insufficient_stock"),
            ColectaError::Upload(_) => (StatusCode::BAD_REQUEST, "upload_error"),
            ColectaError::Unauthorized(_) | ColectaError::Token(_) => {
                (StatusCode::UNAUTHORIZED, "unauthorized")
            }
            ColectaError::PermissionDenied(_) => (StatusCode::FORBIDDEN, "forbidden"),
            ColectaError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            ColectaError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            ColectaError::RateLimitExceeded => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
            ColectaError::Database(e) => match pg_error_code(e).as_deref() {
                Some(UNIQUE_VIOLATION) => (StatusCode::CONFLICT, "conflict"),
                Some(FOREIGN_KEY_VIOLATION) | Some(CHECK_VIOLATION) | Some(NUMERIC_OUT_OF_RANGE) => {
                    (StatusCode::BAD_REQUEST, "validation_error")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            },
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NUMERIC_OUT_OF_RANGE: &str = "22003";

fn pg_error_code(error: &sqlx::Error) -> Option<String> {
    match error {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

impl IntoResponse for ColectaError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Log the actual error, return generic message
            tracing::error!(error = %self, severity = %self.severity(), "Request failed");
            "an internal error occurred".to_string()
        } else if let ColectaError::Database(sqlx::Error::Database(db)) = &self {
            tracing::debug!(error = %db, "Constraint violation");
            match status {
                StatusCode::CONFLICT => "a record with the same unique value already exists".to_string(),
                _ => "the request references missing or invalid related data".to_string(),
            }
        } else {
            self.to_string()
        };

        let body = Json(json!({
            "error": kind,
            "message": message,
        }));

        (status, body).into_response()
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
