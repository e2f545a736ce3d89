//! # Calculation Engine
//!
//! The single-accumulator state machine behind the calculator keypad.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Calculator State Machine                           │
//! │                                                                         │
//! │            enter_operator(op)                                          │
//! │   ┌──────┐ ─────────────────────────────► ┌──────────────────┐          │
//! │   │ Idle │                                │ OperandPending   │          │
//! │   │      │ ◄───────────────────────────── │ (acc, op)        │──┐       │
//! │   └──────┘   equals() / clear()           └──────────────────┘  │       │
//! │                                                  ▲              │       │
//! │                                                  └──────────────┘       │
//! │                                   enter_operator(op2): chain or retarget│
//! │                                                                         │
//! │  Digits, decimal point, backspace, functions, formulas and recall edit │
//! │  the display in either state and never change it.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Chaining
//! Operators evaluate strictly left to right. `2 + 3 * 4 =` is `(2 + 3) * 4`:
//! ```text
//! key    display   pending        awaiting
//! ───    ───────   ───────        ────────
//! 2      "2"       -              no
//! +      "2"       2 +            yes
//! 3      "3"       2 +            no
//! *      "5"       5 *            yes      ◄─ 2 + 3 evaluated here
//! 4      "4"       5 *            no
//! =      "20"      -              yes      ◄─ history: "5 * 4" = "20"
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::{Calculator, Digit, OperationKind};
//!
//! let mut calc = Calculator::new();
//! calc.enter_digit(Digit::try_from(7u8).unwrap());
//! calc.enter_operator(OperationKind::Divide);
//! calc.enter_digit(Digit::try_from(0u8).unwrap());
//! calc.equals();
//!
//! // Division by zero is defined as 0.
//! assert_eq!(calc.display(), "0");
//! assert_eq!(calc.history().len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::clock::{Clock, SystemClock};
use crate::format::{format_fixed2, format_number, parse_display, parse_literal};
use crate::history::{History, HistoryEntry};
use crate::types::{
    BusinessFormula, BusinessRates, Digit, FormulaBreakdown, OperationKind, ScientificFunction,
};

/// Status label shown when no operation is pending.
pub const READY_STATUS: &str = "Ready";

/// Left operand and operator of a binary operation in progress.
///
/// Keeping both in one value means they are always set and cleared together.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    accumulator: f64,
    operation: OperationKind,
}

/// Coarse engine state, for callers that render mode indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    OperandPending,
}

/// Owned, serializable view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    pub display: String,
    pub status: String,
    pub phase: Phase,
    pub accumulator: Option<f64>,
    pub pending_operation: Option<OperationKind>,
    pub awaiting_operand: bool,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
}

/// The calculator.
///
/// Generic over its [`Clock`] so tests can pin history timestamps.
#[derive(Debug)]
pub struct Calculator<C: Clock = SystemClock> {
    display: String,
    pending: Option<Pending>,
    awaiting_operand: bool,
    /// A right operand was supplied since the last operator key.
    operand_entered: bool,
    history: History,
    clock: C,
}

impl Calculator<SystemClock> {
    /// Creates a calculator in the `Idle` state showing `"0"`.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Calculator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Calculator<C> {
    /// Creates a calculator that timestamps history with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Calculator {
            display: "0".to_string(),
            pending: None,
            awaiting_operand: false,
            operand_entered: false,
            history: History::new(),
            clock,
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// The text currently shown.
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The display parsed as a number.
    pub fn display_value(&self) -> f64 {
        parse_display(&self.display)
    }

    /// Left operand of the pending operation.
    pub fn accumulator(&self) -> Option<f64> {
        self.pending.map(|p| p.accumulator)
    }

    /// The operation waiting for its right operand.
    pub fn pending_operation(&self) -> Option<OperationKind> {
        self.pending.map(|p| p.operation)
    }

    /// Whether the next digit starts a new number.
    pub fn is_awaiting_operand(&self) -> bool {
        self.awaiting_operand
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::OperandPending
        } else {
            Phase::Idle
        }
    }

    /// `"<accumulator> <op>"` while an operation is pending, else `"Ready"`.
    pub fn status(&self) -> String {
        match self.pending {
            Some(p) => format!("{} {}", format_number(p.accumulator), p.operation.symbol()),
            None => READY_STATUS.to_string(),
        }
    }

    /// Completed evaluations, newest first.
    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn snapshot(&self) -> CalculatorSnapshot {
        CalculatorSnapshot {
            display: self.display.clone(),
            status: self.status(),
            phase: self.phase(),
            accumulator: self.accumulator(),
            pending_operation: self.pending_operation(),
            awaiting_operand: self.awaiting_operand,
            history: self.history.to_vec(),
        }
    }

    // =========================================================================
    // Display editing
    // =========================================================================

    /// Types a digit.
    pub fn enter_digit(&mut self, digit: Digit) {
        self.operand_entered = true;
        if self.awaiting_operand {
            self.display = digit.to_string();
            self.awaiting_operand = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit.as_char());
        }
    }

    /// Types a decimal point. A second point in the same number is ignored.
    pub fn enter_decimal(&mut self) {
        self.operand_entered = true;
        if self.awaiting_operand {
            self.display = "0.".to_string();
            self.awaiting_operand = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    /// Deletes the last character of the display.
    ///
    /// A remainder that is no longer a number (`""`, `"-"`, `"Na"` left over
    /// from `"NaN"`) resets the display to `"0"`.
    pub fn backspace(&mut self) {
        self.display.pop();
        if parse_literal(&self.display).is_err() {
            self.display = "0".to_string();
        }
    }

    /// Resets display and pending operation. History is kept.
    pub fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending = None;
        self.awaiting_operand = false;
        self.operand_entered = false;
    }

    // =========================================================================
    // Binary operations
    // =========================================================================

    /// Chooses the next binary operation.
    ///
    /// ## Transitions
    /// - Idle: the display becomes the accumulator.
    /// - Pending, right operand supplied (typed, recalled, or produced by a
    ///   function or formula): the pending operation is evaluated with the
    ///   display as right operand; the result is shown and becomes the new
    ///   accumulator.
    /// - Pending, no operand since the last operator: the operator is replaced.
    pub fn enter_operator(&mut self, operation: OperationKind) {
        let accumulator = match self.pending {
            None => self.display_value(),
            Some(p) if !self.operand_entered => p.accumulator,
            Some(p) => {
                let result = p.operation.apply(p.accumulator, self.display_value());
                self.display = format_number(result);
                result
            }
        };

        self.pending = Some(Pending {
            accumulator,
            operation,
        });
        self.awaiting_operand = true;
        self.operand_entered = false;
    }

    /// Evaluates the pending operation. No-op when nothing is pending.
    ///
    /// Returns the history entry that was recorded.
    pub fn equals(&mut self) -> Option<&HistoryEntry> {
        let pending = self.pending.take()?;
        let operand = self.display_value();
        let result = format_number(pending.operation.apply(pending.accumulator, operand));

        let expression = format!(
            "{} {} {}",
            format_number(pending.accumulator),
            pending.operation.symbol(),
            self.display
        );

        self.display = result.clone();
        self.awaiting_operand = true;
        self.operand_entered = false;
        self.record(expression, result)
    }

    // =========================================================================
    // Scientific functions
    // =========================================================================

    /// Applies a unary function to the display value.
    ///
    /// The pending operation, if any, is left alone, so `2 + 9 sqrt =` is 5.
    pub fn apply_unary(&mut self, function: ScientificFunction) -> Option<&HistoryEntry> {
        let operand = self.display_value();
        let result = format_number(function.apply(operand));
        let expression = format!("{}({})", function.name(), format_number(operand));

        self.display = result.clone();
        self.awaiting_operand = true;
        self.operand_entered = true;
        self.record(expression, result)
    }

    // =========================================================================
    // Business formulas
    // =========================================================================

    /// Applies a percentage formula to the display amount using the rate
    /// currently held in `rates`. The display becomes the total with
    /// exactly two fractional digits.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{BusinessFormula, BusinessRates, Calculator, Digit};
    ///
    /// let rates = BusinessRates { tax_rate: 8.25, ..Default::default() };
    /// let mut calc = Calculator::new();
    /// for d in [1u8, 0, 0] {
    ///     calc.enter_digit(Digit::try_from(d).unwrap());
    /// }
    ///
    /// let breakdown = calc.apply_business_formula(BusinessFormula::Tax, &rates);
    /// assert_eq!(breakdown.delta, 8.25);
    /// assert_eq!(calc.display(), "108.25");
    /// ```
    pub fn apply_business_formula(
        &mut self,
        formula: BusinessFormula,
        rates: &BusinessRates,
    ) -> FormulaBreakdown {
        let amount = self.display_value();
        let breakdown = formula.compute(amount, rates.rate_for(formula));
        let result = format_fixed2(breakdown.total);

        let expression = format!(
            "{} {} {}% {}",
            format_number(amount),
            if formula.is_reduction() { "-" } else { "+" },
            format_number(breakdown.rate),
            formula.name()
        );

        self.display = result.clone();
        self.awaiting_operand = true;
        self.operand_entered = true;
        self.record(expression, result);
        breakdown
    }

    // =========================================================================
    // History
    // =========================================================================

    /// Puts a past result back on the display.
    ///
    /// The pending operation is kept, so a recalled value can serve as the
    /// next operand. Returns `false` (and changes nothing) for an unknown id.
    pub fn recall(&mut self, entry_id: &str) -> bool {
        let Some(entry) = self.history.get(entry_id) else {
            return false;
        };
        self.display = entry.result.clone();
        self.awaiting_operand = true;
        self.operand_entered = true;
        true
    }

    /// Empties the history.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    fn record(&mut self, expression: String, result: String) -> Option<&HistoryEntry> {
        let entry = HistoryEntry::new(expression, result, self.clock.now());
        self.history.push(entry);
        self.history.latest()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
