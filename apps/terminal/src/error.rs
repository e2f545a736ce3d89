//! # API Error Type
//!
//! Unified error type for terminal commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Tally                                  │
//! │                                                                         │
//! │  stdin line "2 & 3"                                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Input parser                                                    │  │
//! │  │  Unknown token? ─────────── ApiError::unknown_command ──────┐   │  │
//! │  │         │                                                   │   │  │
//! │  │         ▼                                                   ▼   │  │
//! │  │  Command function                                       ApiError │  │
//! │  │  Result<T, ApiError>                                        │   │  │
//! │  │         │                                                   │   │  │
//! │  │  CoreError / ValidationError / ConfigError ─── From ────────┘   │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Text mode prints "error [UNKNOWN_COMMAND] ..." and keeps reading.     │
//! │  JSON mode prints {"code": "UNKNOWN_COMMAND", "message": "..."}        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arithmetic never lands here: division by zero and friends are display
//! values produced by the engine.

use serde::Serialize;
use tally_core::{CoreError, ValidationError};

use crate::state::ConfigError;

/// Error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "History entry not found: 4"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// History entry or similar resource not found
    NotFound,

    /// Input validation failed (bad digit, bad rate, bad number)
    ValidationError,

    /// Token is not a known key, function, formula or command
    UnknownCommand,

    /// Configuration could not be loaded
    ConfigError,

    /// I/O or other unexpected failure
    Internal,
}

impl ErrorCode {
    /// Wire name, as serialized.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::UnknownCommand => "UNKNOWN_COMMAND",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unknown-command error.
    pub fn unknown_command(token: &str) -> Self {
        ApiError::new(
            ErrorCode::UnknownCommand,
            format!("Unknown command: '{}' (type 'help' for the key list)", token),
        )
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownOperation(token)
            | CoreError::UnknownFunction(token)
            | CoreError::UnknownFormula(token) => ApiError::unknown_command(&token),
            CoreError::HistoryEntryNotFound(id) => ApiError::not_found("History entry", &id),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation(e) => ApiError::validation(e.to_string()),
            other => {
                tracing::error!("Configuration failed: {}", other);
                ApiError::new(ErrorCode::ConfigError, other.to_string())
            }
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O failure: {}", err);
        ApiError::internal(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}
