//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Where Errors Can Happen
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Surface                                   │
//! │                                                                         │
//! │  Numeric evaluation (engine.rs)      ── NEVER fails                     │
//! │    7 / 0      → display "0"                                            │
//! │    log(-1)    → display "NaN"                                          │
//! │    ln(0)      → display "-Infinity"                                    │
//! │                                                                         │
//! │  Caller input (this file)            ── typed errors                    │
//! │  ├── CoreError        - unknown tags, unknown history entries          │
//! │  └── ValidationError  - digits, rates, display literals                │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError (host) → user            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The calculator never interrupts the user on bad arithmetic. Errors only
//! exist for input the engine cannot even represent, such as the string
//! `"sinh"` where a [`ScientificFunction`](crate::ScientificFunction) is
//! expected.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised while translating caller input into engine types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Operator symbol or name does not map to an [`OperationKind`](crate::OperationKind).
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Function name does not map to a [`ScientificFunction`](crate::ScientificFunction).
    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    /// Formula name does not map to a [`BusinessFormula`](crate::BusinessFormula).
    #[error("Unknown business formula: {0}")]
    UnknownFormula(String),

    /// No history entry with this id (it may have been evicted).
    #[error("History entry not found: {0}")]
    HistoryEntryNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Digit outside `0..=9`.
    #[error("{value} is not a decimal digit")]
    InvalidDigit { value: u32 },

    /// Rate is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Rate is outside the accepted percentage range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Text is not a decimal literal the display can hold.
    #[error("'{value}' is not a valid number")]
    InvalidNumber { value: String },
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownFunction("sinh".to_string());
        assert_eq!(err.to_string(), "Unknown function: sinh");

        let err = CoreError::HistoryEntryNotFound("abc".to_string());
        assert_eq!(err.to_string(), "History entry not found: abc");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidDigit { value: 12 };
        assert_eq!(err.to_string(), "12 is not a decimal digit");

        let err = ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0.0,
            max: 1000.0,
        };
        assert_eq!(err.to_string(), "tax_rate must be between 0 and 1000");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::NotFinite {
            field: "tip_rate".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
