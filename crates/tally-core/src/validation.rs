//! # Validation Module
//!
//! Checks for values that come from outside the keypad: configured rates and
//! typed-in numbers.
//!
//! ## Where Validation Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Config file / env / CLI flags                                         │
//! │  └── validate_rate, validate_rates     ◄── THIS MODULE                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Host input parser (number tokens)                                     │
//! │  └── validate_number_literal           ◄── THIS MODULE                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Engine                                                                │
//! │  └── no validation: every keypad event is total                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_rate, validate_number_literal};
//!
//! assert!(validate_rate("tax_rate", 8.25).is_ok());
//! assert!(validate_rate("tax_rate", f64::NAN).is_err());
//! assert!(validate_number_literal("12.50").is_ok());
//! assert!(validate_number_literal("12,50").is_err());
//! ```

use crate::error::ValidationError;
use crate::format::parse_literal;
use crate::types::BusinessRates;
use crate::MAX_RATE_PERCENT;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates one percentage rate.
///
/// ## Rules
/// - Must be finite
/// - Must be between 0 and [`MAX_RATE_PERCENT`]
pub fn validate_rate(field: &str, rate: f64) -> ValidationResult<()> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }

    if !(0.0..=MAX_RATE_PERCENT).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: MAX_RATE_PERCENT,
        });
    }

    Ok(())
}

/// Validates all four rates, reporting the first failure.
pub fn validate_rates(rates: &BusinessRates) -> ValidationResult<()> {
    validate_rate("tax_rate", rates.tax_rate)?;
    validate_rate("discount_rate", rates.discount_rate)?;
    validate_rate("tip_rate", rates.tip_rate)?;
    validate_rate("markup_rate", rates.markup_rate)?;
    Ok(())
}

/// Validates a number typed as one token (`"12.5"`), as opposed to key
/// presses. Only plain unsigned decimals are accepted since the keypad
/// has no sign or exponent keys.
pub fn validate_number_literal(text: &str) -> ValidationResult<()> {
    let invalid = || ValidationError::InvalidNumber {
        value: text.to_string(),
    };

    if text.is_empty() || text.chars().filter(|c| *c == '.').count() > 1 {
        return Err(invalid());
    }

    if !text.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(invalid());
    }

    parse_literal(text).map(|_| ())
}

// =============================================================================
// Unit Tests
// =============================================================================
