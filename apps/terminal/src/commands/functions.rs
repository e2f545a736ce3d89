//! # Function and Formula Commands
//!
//! Scientific functions act on the display value alone. Business formulas
//! read their rate from [`ConfigState`] at call time, so a `rate` change
//! applies to the very next formula.

use serde::{Deserialize, Serialize};
use tally_core::{BusinessFormula, FormulaBreakdown, ScientificFunction};
use tracing::debug;

use crate::state::{CalculatorResponse, CalculatorState, ConfigState};

/// Formula result plus the calculator view after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaResponse {
    /// Amount, rate, delta and total before rounding
    pub breakdown: FormulaBreakdown,

    pub calculator: CalculatorResponse,
}

/// Applies a scientific function to the display.
///
/// Trig functions take degrees. Out-of-domain inputs show `NaN` or
/// `-Infinity` on the display; they are not errors.
pub fn apply_function(calc: &CalculatorState, function: ScientificFunction) -> CalculatorResponse {
    debug!(function = %function, "apply_function command");
    calc.with_calculator_mut(|c| {
        if let Some(entry) = c.apply_unary(function) {
            debug!(expression = %entry.expression, result = %entry.result, "Function applied");
        }
    });
    calc.response()
}

/// Applies a business formula using the configured rate.
///
/// ## Example
/// ```text
/// display 100, tax 8.25%  →  delta 8.25, display "108.25"
/// display 200, discount 10% →  delta 20, display "180.00"
/// ```
pub fn apply_formula(
    calc: &CalculatorState,
    config: &ConfigState,
    formula: BusinessFormula,
) -> FormulaResponse {
    let rates = config.rates();
    debug!(formula = %formula, rate = %rates.rate_for(formula), "apply_formula command");

    let breakdown = calc.with_calculator_mut(|c| c.apply_business_formula(formula, &rates));

    FormulaResponse {
        breakdown,
        calculator: calc.response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::keypad::{press_equals, press_number, press_operator};
    use tally_core::OperationKind;

    #[test]
    fn test_sqrt_and_history() {
        let calc = CalculatorState::new();
        press_number(&calc, "16").unwrap();
        let response = apply_function(&calc, ScientificFunction::Sqrt);
        assert_eq!(response.display, "4");
        assert_eq!(response.history[0].expression, "sqrt(16)");
        assert_eq!(response.history[0].result, "4");
    }

    #[test]
    fn test_out_of_domain_is_displayed() {
        let calc = CalculatorState::new();
        press_number(&calc, "0").unwrap();
        assert_eq!(apply_function(&calc, ScientificFunction::Ln).display, "-Infinity");

        let calc = CalculatorState::new();
        press_number(&calc, "4").unwrap();
        press_operator(&calc, OperationKind::Subtract);
        press_number(&calc, "9").unwrap();
        press_equals(&calc);
        assert_eq!(apply_function(&calc, ScientificFunction::Sqrt).display, "NaN");
    }

    #[test]
    fn test_function_keeps_pending_operation() {
        let calc = CalculatorState::new();
        press_number(&calc, "2").unwrap();
        press_operator(&calc, OperationKind::Add);
        press_number(&calc, "9").unwrap();
        apply_function(&calc, ScientificFunction::Sqrt);
        assert_eq!(press_equals(&calc).display, "5");
    }

    #[test]
    fn test_tax_with_default_rate() {
        let calc = CalculatorState::new();
        let config = ConfigState::default();
        press_number(&calc, "100").unwrap();

        let response = apply_formula(&calc, &config, BusinessFormula::Tax);
        assert_eq!(response.breakdown.delta, 8.25);
        assert_eq!(response.calculator.display, "108.25");
        assert_eq!(response.calculator.history[0].expression, "100 + 8.25% tax");
    }

    #[test]
    fn test_discount_reads_current_rate() {
        let calc = CalculatorState::new();
        let config = ConfigState::default();
        config.set_rate(BusinessFormula::Discount, 25.0).unwrap();
        press_number(&calc, "200").unwrap();

        let response = apply_formula(&calc, &config, BusinessFormula::Discount);
        assert_eq!(response.breakdown.total, 150.0);
        assert_eq!(response.calculator.display, "150.00");
        assert_eq!(response.calculator.history[0].expression, "200 - 25% discount");
    }
}
