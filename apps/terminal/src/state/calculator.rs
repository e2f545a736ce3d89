//! # Calculator State
//!
//! Holds the calculator engine for the running session.
//!
//! ## Thread Safety
//! The engine is wrapped in `Arc<Mutex<T>>` so that:
//! 1. Each command runs to completion before the next one touches the state
//! 2. The state can be shared with a future UI thread without changes
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Calculator State Operations                          │
//! │                                                                         │
//! │  Key / Token             Command                 Engine Change          │
//! │  ───────────             ───────                 ─────────────          │
//! │                                                                         │
//! │  "7" ────────────────────► press_digit() ───────► display edit         │
//! │                                                                         │
//! │  "+" ────────────────────► press_operator() ────► pending op / chain   │
//! │                                                                         │
//! │  "=" ────────────────────► press_equals() ──────► evaluate + history   │
//! │                                                                         │
//! │  "tax" ──────────────────► apply_formula() ─────► total + history      │
//! │                                                                         │
//! │  "history" ──────────────► get_history() ───────► (read only)          │
//! │                                                                         │
//! │  NOTE: All operations take the lock only for the duration of the call.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tally_core::format::group_thousands;
use tally_core::{Calculator, Clock, HistoryEntry, OperationKind, Phase, SystemClock};

/// What every keypad command returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorResponse {
    /// Canonical display text
    pub display: String,

    /// Display with thousands separators, for rendering only
    pub grouped_display: String,

    /// "<accumulator> <op>" or "Ready"
    pub status: String,

    pub phase: Phase,

    pub pending_operation: Option<OperationKind>,

    /// Newest first
    pub history: Vec<HistoryEntry>,
}

impl<C: Clock> From<&Calculator<C>> for CalculatorResponse {
    fn from(calc: &Calculator<C>) -> Self {
        CalculatorResponse {
            display: calc.display().to_string(),
            grouped_display: group_thousands(calc.display()),
            status: calc.status(),
            phase: calc.phase(),
            pending_operation: calc.pending_operation(),
            history: calc.history().to_vec(),
        }
    }
}

/// Session-owned calculator state.
///
/// ## Why Mutex and not RwLock?
/// Nearly every command mutates the engine, so readers rarely overlap.
#[derive(Debug)]
pub struct CalculatorState<C: Clock = SystemClock> {
    calculator: Arc<Mutex<Calculator<C>>>,
}

impl CalculatorState<SystemClock> {
    /// Creates a fresh calculator showing "0".
    pub fn new() -> Self {
        Self::with_calculator_instance(Calculator::new())
    }
}

impl Default for CalculatorState<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> CalculatorState<C> {
    /// Wraps an existing engine (tests use this to pin the clock).
    pub fn with_calculator_instance(calculator: Calculator<C>) -> Self {
        CalculatorState {
            calculator: Arc::new(Mutex::new(calculator)),
        }
    }

    /// Executes a function with read access to the calculator.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let display = calc_state.with_calculator(|c| c.display().to_string());
    /// ```
    pub fn with_calculator<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Calculator<C>) -> R,
    {
        // Engine transitions are plain field writes; a poisoned lock still
        // holds a consistent calculator.
        let calc = self.calculator.lock().unwrap_or_else(PoisonError::into_inner);
        f(&calc)
    }

    /// Executes a function with write access to the calculator.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// calc_state.with_calculator_mut(|c| c.clear());
    /// ```
    pub fn with_calculator_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Calculator<C>) -> R,
    {
        let mut calc = self.calculator.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut calc)
    }

    /// Current response view.
    pub fn response(&self) -> CalculatorResponse {
        self.with_calculator(|c| CalculatorResponse::from(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::Digit;

    #[test]
    fn test_response_reflects_engine() {
        let state = CalculatorState::new();
        state.with_calculator_mut(|c| {
            for d in [1u8, 2, 3, 4] {
                c.enter_digit(Digit::try_from(d).unwrap());
            }
            c.enter_operator(OperationKind::Add);
        });

        let response = state.response();
        assert_eq!(response.display, "1234");
        assert_eq!(response.grouped_display, "1,234");
        assert_eq!(response.status, "1234 +");
        assert_eq!(response.phase, Phase::OperandPending);
        assert_eq!(response.pending_operation, Some(OperationKind::Add));
        assert!(response.history.is_empty());
    }

    #[test]
    fn test_state_is_isolated_per_instance() {
        let a = CalculatorState::new();
        let b = CalculatorState::new();
        a.with_calculator_mut(|c| c.enter_digit(Digit::try_from(9u8).unwrap()));
        assert_eq!(a.response().display, "9");
        assert_eq!(b.response().display, "0");
    }
}
