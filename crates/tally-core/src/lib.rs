//! # tally-core: Calculation Engine for Tally
//!
//! This crate is the **heart** of the Tally calculator. It holds the keypad
//! state machine, the operation tables and the history log, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Caller (web UI, terminal host, tests)              │   │
//! │  │    keypad presses ──► display string + history list             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  engine   │  │   types   │  │  history  │  │  format   │  │   │
//! │  │   │Calculator │  │ Operation │  │  bounded  │  │ display   │  │   │
//! │  │   │  Phase    │  │ Function  │  │  newest   │  │ strings   │  │   │
//! │  │   │ Snapshot  │  │ Formula   │  │  first    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING • TIME ONLY THROUGH `Clock`               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - The `Calculator` state machine
//! - [`types`] - Operations, functions, formulas, rates, digits
//! - [`history`] - Bounded calculation history
//! - [`format`] - Number ↔ display-string conversion
//! - [`clock`] - Time source for history timestamps
//! - [`error`] - Error types for caller input
//! - [`validation`] - Rate and literal checks
//!
//! ## Design Principles
//!
//! 1. **Never interrupt**: arithmetic edge cases become display values
//!    (`"0"` for division by zero, `"NaN"`, `"-Infinity"`), never errors
//! 2. **Closed vocabularies**: operators, functions and formulas are enums
//! 3. **Caller-owned rates**: business formulas take rates as an argument
//! 4. **Explicit bounds**: history capacity is a constant, enforced on insert
//!
//! ## Example Usage
//!
//! ```rust
//! use tally_core::{Calculator, Digit, OperationKind};
//!
//! let mut calc = Calculator::new();
//! let press = |calc: &mut Calculator, n: u8| calc.enter_digit(Digit::try_from(n).unwrap());
//!
//! press(&mut calc, 2);
//! calc.enter_operator(OperationKind::Add);
//! press(&mut calc, 3);
//! calc.enter_operator(OperationKind::Multiply);
//! press(&mut calc, 4);
//! calc.equals();
//!
//! // Left to right, no precedence: (2 + 3) * 4
//! assert_eq!(calc.display(), "20");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod clock;
pub mod engine;
pub mod error;
pub mod format;
pub mod history;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{Calculator, CalculatorSnapshot, Phase, READY_STATUS};
pub use error::{CoreError, ValidationError};
pub use history::{History, HistoryEntry};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of history entries kept. The 11th evaluation evicts the oldest.
pub const HISTORY_CAPACITY: usize = 10;

/// Upper bound for configured percentage rates.
///
/// Markups above 100% are normal, so the cap is generous.
pub const MAX_RATE_PERCENT: f64 = 1000.0;
