//! # Keypad Commands
//!
//! Digit, decimal, operator, equals, clear and backspace keys.
//!
//! ## Chained Entry
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Keys        2   +   3   *   4   =                                      │
//! │  Display     2   2   3   5   4   20                                     │
//! │  Status    Ready 2+ 2+  5*  5*  Ready                                   │
//! │                                                                         │
//! │  Evaluation is strictly left to right: (2 + 3) * 4                     │
//! │  Only "=" writes a history entry.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tally_core::{Digit, OperationKind};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{CalculatorResponse, CalculatorState};

/// Returns the current calculator view.
pub fn get_calculator(calc: &CalculatorState) -> CalculatorResponse {
    debug!("get_calculator command");
    calc.response()
}

/// Presses one digit key.
///
/// ## Errors
/// `VALIDATION_ERROR` for values above 9.
pub fn press_digit(calc: &CalculatorState, digit: u8) -> Result<CalculatorResponse, ApiError> {
    debug!(digit = %digit, "press_digit command");
    let digit = Digit::try_from(digit)?;
    calc.with_calculator_mut(|c| c.enter_digit(digit));
    Ok(calc.response())
}

/// Presses the decimal point key.
pub fn press_decimal(calc: &CalculatorState) -> CalculatorResponse {
    debug!("press_decimal command");
    calc.with_calculator_mut(|c| c.enter_decimal());
    calc.response()
}

/// Types a number literal such as `12.5`, one key per character.
pub fn press_number(calc: &CalculatorState, literal: &str) -> Result<CalculatorResponse, ApiError> {
    debug!(literal = %literal, "press_number command");
    for ch in literal.chars() {
        if ch == '.' {
            calc.with_calculator_mut(|c| c.enter_decimal());
        } else {
            let digit = Digit::try_from(ch)?;
            calc.with_calculator_mut(|c| c.enter_digit(digit));
        }
    }
    Ok(calc.response())
}

/// Presses a binary operator key.
pub fn press_operator(calc: &CalculatorState, operation: OperationKind) -> CalculatorResponse {
    debug!(operation = %operation, "press_operator command");
    calc.with_calculator_mut(|c| c.enter_operator(operation));
    calc.response()
}

/// Presses "=". Does nothing when no operation is pending.
pub fn press_equals(calc: &CalculatorState) -> CalculatorResponse {
    debug!("press_equals command");
    calc.with_calculator_mut(|c| {
        if let Some(entry) = c.equals() {
            debug!(expression = %entry.expression, result = %entry.result, "Evaluated");
        }
    });
    calc.response()
}

/// Presses "C". History survives.
pub fn press_clear(calc: &CalculatorState) -> CalculatorResponse {
    debug!("press_clear command");
    calc.with_calculator_mut(|c| c.clear());
    calc.response()
}

/// Presses backspace.
pub fn press_backspace(calc: &CalculatorState) -> CalculatorResponse {
    debug!("press_backspace command");
    calc.with_calculator_mut(|c| c.backspace());
    calc.response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use tally_core::{Phase, READY_STATUS};

    #[test]
    fn test_chained_entry() {
        let calc = CalculatorState::new();
        press_number(&calc, "2").unwrap();
        press_operator(&calc, OperationKind::Add);
        press_number(&calc, "3").unwrap();

        let response = press_operator(&calc, OperationKind::Multiply);
        assert_eq!(response.display, "5");
        assert_eq!(response.status, "5 *");
        assert!(response.history.is_empty());

        press_number(&calc, "4").unwrap();
        let response = press_equals(&calc);
        assert_eq!(response.display, "20");
        assert_eq!(response.status, READY_STATUS);
        assert_eq!(response.phase, Phase::Idle);
        assert_eq!(response.history.len(), 1);
        assert_eq!(response.history[0].expression, "5 * 4");
    }

    #[test]
    fn test_press_digit_rejects_non_digits() {
        let calc = CalculatorState::new();
        let err = press_digit(&calc, 12).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_calculator(&calc).display, "0");

        assert_eq!(press_digit(&calc, 7).unwrap().display, "7");
    }

    #[test]
    fn test_decimal_and_backspace() {
        let calc = CalculatorState::new();
        press_decimal(&calc);
        press_number(&calc, "5").unwrap();
        assert_eq!(get_calculator(&calc).display, "0.5");

        press_backspace(&calc);
        press_backspace(&calc);
        assert_eq!(press_backspace(&calc).display, "0");
    }

    #[test]
    fn test_divide_by_zero_shows_zero() {
        let calc = CalculatorState::new();
        press_number(&calc, "7").unwrap();
        press_operator(&calc, OperationKind::Divide);
        press_number(&calc, "0").unwrap();
        let response = press_equals(&calc);
        assert_eq!(response.display, "0");
        assert_eq!(response.history[0].expression, "7 / 0");
    }

    #[test]
    fn test_equals_without_pending_is_noop() {
        let calc = CalculatorState::new();
        press_number(&calc, "42").unwrap();
        let response = press_equals(&calc);
        assert_eq!(response.display, "42");
        assert!(response.history.is_empty());
    }

    #[test]
    fn test_clear_keeps_history() {
        let calc = CalculatorState::new();
        press_number(&calc, "1").unwrap();
        press_operator(&calc, OperationKind::Add);
        press_number(&calc, "1").unwrap();
        press_equals(&calc);

        let response = press_clear(&calc);
        assert_eq!(response.display, "0");
        assert_eq!(response.pending_operation, None);
        assert_eq!(response.history.len(), 1);
    }
}
