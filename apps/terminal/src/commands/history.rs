//! # History Commands
//!
//! Entries can be addressed by id or by their 1-based position in the
//! newest-first list, which is what the `history` listing prints.

use tally_core::{CoreError, HistoryEntry};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CalculatorResponse, CalculatorState};

/// Returns all entries, newest first.
pub fn get_history(calc: &CalculatorState) -> Vec<HistoryEntry> {
    debug!("get_history command");
    calc.with_calculator(|c| c.history().to_vec())
}

/// Puts a past result back on the display.
///
/// ## Arguments
/// * `target` - Entry id, or position `1..=len` (1 is the newest)
///
/// ## Errors
/// `NOT_FOUND` when no entry matches; the calculator is unchanged.
pub fn recall_entry(calc: &CalculatorState, target: &str) -> Result<CalculatorResponse, ApiError> {
    debug!(target = %target, "recall_entry command");

    let recalled = calc.with_calculator_mut(|c| {
        let id = match target.parse::<usize>() {
            Ok(position) => position
                .checked_sub(1)
                .and_then(|index| c.history().nth(index))
                .map(|entry| entry.id.clone()),
            Err(_) => Some(target.to_string()),
        };
        id.is_some_and(|id| c.recall(&id))
    });

    if !recalled {
        return Err(CoreError::HistoryEntryNotFound(target.to_string()).into());
    }
    Ok(calc.response())
}

/// Empties the history. The display and pending operation are untouched.
pub fn clear_history(calc: &CalculatorState) -> CalculatorResponse {
    debug!("clear_history command");
    calc.with_calculator_mut(|c| c.clear_history());
    info!("History cleared");
    calc.response()
}
