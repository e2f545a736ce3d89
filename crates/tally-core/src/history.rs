//! # Calculation History
//!
//! A bounded, newest-first log of completed evaluations.
//!
//! ## Eviction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  capacity = 10                                                          │
//! │                                                                         │
//! │  push(e11)                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  front ─► [e11] [e10] [e9] ... [e2] [e1] ◄─ back                        │
//! │                                        └── evicted before the insert    │
//! │                                                                         │
//! │  Entries are never edited. They leave only through eviction or clear(). │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use ts_rs::TS;
use uuid::Uuid;

use crate::HISTORY_CAPACITY;

/// One completed evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// What was evaluated, e.g. `"2 + 3"`, `"sqrt(16)"`, `"100 + 8.25% tax"`.
    pub expression: String,

    /// When the evaluation completed.
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,

    /// The display string the evaluation produced.
    pub result: String,
}

impl HistoryEntry {
    /// Creates an entry with a fresh id.
    pub fn new(expression: String, result: String, timestamp: DateTime<Utc>) -> Self {
        HistoryEntry {
            id: Uuid::new_v4().to_string(),
            expression,
            timestamp,
            result,
        }
    }
}

/// Bounded history, newest first.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl History {
    /// Creates an empty history holding [`HISTORY_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    /// Creates an empty history with a custom bound (at least 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        History {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts an entry at the front, evicting the oldest when full.
    ///
    /// Returns the evicted entry, if any.
    pub fn push(&mut self, entry: HistoryEntry) -> Option<HistoryEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_back()
        } else {
            None
        };
        self.entries.push_front(entry);
        evicted
    }

    /// Looks up an entry by id.
    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Returns the entry at a 0-based position (0 = newest).
    pub fn nth(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// Returns the most recent entry.
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Iterates newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Copies the entries out, newest first.
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
