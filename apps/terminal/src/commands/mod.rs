//! # Commands Module
//!
//! Every action a user can take, as plain functions over session state.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (dispatch)
//! ├── keypad.rs     ◄─── Digits, operators, equals, clear, backspace
//! ├── functions.rs  ◄─── Scientific functions, business formulas
//! ├── history.rs    ◄─── History listing, recall, clearing
//! └── config.rs     ◄─── Rate retrieval and changes
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  stdin / --eval                                                         │
//! │  "100 tax"                                                              │
//! │         │                                                               │
//! │         │ input::parse_line                                             │
//! │         ▼                                                               │
//! │  [Number("100"), Formula(Tax)]                                          │
//! │         │                                                               │
//! │         │ dispatch (one command at a time)                              │
//! │         ▼                                                               │
//! │  fn apply_formula(                                                      │
//! │      calc: &CalculatorState,   ◄── only the state it needs              │
//! │      config: &ConfigState,                                              │
//! │      formula: BusinessFormula,                                          │
//! │  ) -> FormulaResponse                                                   │
//! │         │                                                               │
//! │         │ Outcome (text or JSON rendering)                              │
//! │         ▼                                                               │
//! │  stdout                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod functions;
pub mod history;
pub mod keypad;

use serde::Serialize;
use tally_core::HistoryEntry;

use crate::error::ApiError;
use crate::input::Command;
use crate::state::{CalculatorResponse, ConfigResponse, Session};

pub use functions::FormulaResponse;

/// What a dispatched command produced.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    Calculator(CalculatorResponse),
    Formula(FormulaResponse),
    History(Vec<HistoryEntry>),
    Config(ConfigResponse),
    Help,
    Quit,
}

/// Runs one parsed command against the session.
pub fn dispatch(session: &Session, command: Command) -> Result<Outcome, ApiError> {
    let calc = &session.calculator;
    let settings = &session.config;

    let outcome = match command {
        Command::Number(literal) => Outcome::Calculator(keypad::press_number(calc, &literal)?),
        Command::Decimal => Outcome::Calculator(keypad::press_decimal(calc)),
        Command::Operator(op) => Outcome::Calculator(keypad::press_operator(calc, op)),
        Command::Equals => Outcome::Calculator(keypad::press_equals(calc)),
        Command::Clear => Outcome::Calculator(keypad::press_clear(calc)),
        Command::Backspace => Outcome::Calculator(keypad::press_backspace(calc)),
        Command::Show => Outcome::Calculator(keypad::get_calculator(calc)),
        Command::Function(function) => {
            Outcome::Calculator(functions::apply_function(calc, function))
        }
        Command::Formula(formula) => {
            Outcome::Formula(functions::apply_formula(calc, settings, formula))
        }
        Command::Recall(target) => Outcome::Calculator(history::recall_entry(calc, &target)?),
        Command::History => Outcome::History(history::get_history(calc)),
        Command::ClearHistory => Outcome::Calculator(history::clear_history(calc)),
        Command::Rates => Outcome::Config(config::get_config(settings)),
        Command::SetRate(formula, rate) => {
            Outcome::Config(config::set_rate(settings, formula, rate)?)
        }
        Command::Help => Outcome::Help,
        Command::Quit => Outcome::Quit,
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::parse_line;

    fn run(session: &Session, line: &str) -> Vec<Outcome> {
        parse_line(line)
            .unwrap()
            .into_iter()
            .map(|command| dispatch(session, command).unwrap())
            .collect()
    }

    #[test]
    fn test_line_of_keys() {
        let session = Session::default();
        let outcomes = run(&session, "2+3*4=");
        match outcomes.last() {
            Some(Outcome::Calculator(response)) => assert_eq!(response.display, "20"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_recall_mid_line_feeds_chain() {
        let session = Session::default();
        run(&session, "6*7=");
        let outcomes = run(&session, "1 + recall 1 * 2 =");
        match outcomes.last() {
            Some(Outcome::Calculator(response)) => assert_eq!(response.display, "86"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_rate_change_applies_to_next_formula() {
        let session = Session::default();
        run(&session, "rate tip 20");
        let outcomes = run(&session, "50 tip");
        match outcomes.last() {
            Some(Outcome::Formula(response)) => {
                assert_eq!(response.breakdown.delta, 10.0);
                assert_eq!(response.calculator.display, "60.00");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_outcome_json_shape() {
        let session = Session::default();
        let outcome = run(&session, "history").remove(0);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "history");
        assert!(json["data"].as_array().unwrap().is_empty());

        let json = serde_json::to_value(Outcome::Quit).unwrap();
        assert_eq!(json["kind"], "quit");
    }

    #[test]
    fn test_recall_error_propagates() {
        let session = Session::default();
        let command = parse_line("recall 3").unwrap().remove(0);
        assert!(dispatch(&session, command).is_err());
    }
}
