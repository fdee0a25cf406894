//! # Store Error Type
//!
//! Unified error type for storefront operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  ValidationError / CoreError ──► StoreError::Validation                 │
//! │       (blocked locally, nothing sent)                                   │
//! │                                                                         │
//! │  no logged-in user ─────────────► StoreError::Unauthorized              │
//! │       (CLI points the user at `comfy login`)                            │
//! │                                                                         │
//! │  HTTP 4xx/5xx ──────────────────► StoreError::Api / NotFound            │
//! │  reqwest transport failure ─────► StoreError::Network                   │
//! │       (notified, never retried, prior state untouched)                  │
//! │                                                                         │
//! │  DbError ───────────────────────► StoreError::Storage                   │
//! │  serde_json::Error ─────────────► StoreError::Decode                    │
//! │                                                                         │
//! │  Every variant ──► ErrorCode + message ──► CLI prints, exits 1          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use comfy_core::{CoreError, ValidationError};
use comfy_db::DbError;

/// Storefront operation errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A form field is missing or malformed. Nothing was sent.
    #[error("{0}")]
    Validation(String),

    /// The action needs a logged-in user.
    #[error("{0}")]
    Unauthorized(String),

    /// The API answered with an error status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never got an answer (DNS, TLS, timeout, ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The requested resource doesn't exist.
    #[error("{0}")]
    NotFound(String),

    /// Persisted local state could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A response or stored record didn't have the expected shape.
    #[error("Unexpected data: {0}")]
    Decode(String),

    /// The client is misconfigured.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Login required (401)
    Unauthorized,

    /// Resource not found (404)
    NotFound,

    /// API rejected the request
    ApiError,

    /// Transport failure
    NetworkError,

    /// Local storage failure
    StorageError,

    /// Malformed response or record
    DecodeError,

    /// Bad client configuration
    ConfigError,
}

impl ErrorCode {
    /// Wire spelling, e.g. `NOT_FOUND`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ApiError => "API_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::DecodeError => "DECODE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        StoreError::Validation(message.into())
    }

    /// Creates an unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        StoreError::Unauthorized(message.into())
    }

    /// Machine-readable code of this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::Validation(_) => ErrorCode::ValidationError,
            StoreError::Unauthorized(_) => ErrorCode::Unauthorized,
            StoreError::Api { .. } => ErrorCode::ApiError,
            StoreError::Network(_) => ErrorCode::NetworkError,
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::Storage(_) => ErrorCode::StorageError,
            StoreError::Decode(_) => ErrorCode::DecodeError,
            StoreError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Whether the caller should send the user to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, StoreError::Unauthorized(_))
    }
}

/// Result type for storefront operations.
pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Conversions
// =============================================================================

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Validation(err.to_string())
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => StoreError::from(e),
            CoreError::QuantityTooLarge { .. } | CoreError::NoColorOptions(_) => {
                StoreError::Validation(err.to_string())
            }
            CoreError::InvalidPrice(_) => StoreError::Decode(err.to_string()),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                StoreError::Storage(err.to_string())
            }
            other => {
                // Log the detail but keep the message generic
                tracing::error!("Local storage failure: {}", other);
                StoreError::Storage("local storage operation failed".to_string())
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Decode(err.to_string());
        }

        match err.status() {
            Some(status) if status == reqwest::StatusCode::NOT_FOUND => {
                StoreError::NotFound(err.to_string())
            }
            Some(status) => StoreError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => StoreError::Network(err.to_string()),
        }
    }
}
