//! # Clock
//!
//! Time source for history timestamps.
//!
//! The engine itself is pure; "now" is the one thing it reads from the
//! outside world, so it goes through a trait. Production code uses
//! [`SystemClock`]; tests pin time with [`FixedClock`].

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// A source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock for tests.
///
/// Returns `start`, then advances by `step` on every call, so consecutive
/// history entries get distinct, predictable timestamps.
///
/// ## Example
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use tally_core::clock::{Clock, FixedClock};
///
/// let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
/// let clock = FixedClock::stepping(start, Duration::seconds(1));
/// assert_eq!(clock.now(), start);
/// assert_eq!(clock.now(), start + Duration::seconds(1));
/// ```
#[derive(Debug)]
pub struct FixedClock {
    start: DateTime<Utc>,
    step_ms: i64,
    ticks: AtomicI64,
}

impl FixedClock {
    /// A clock that always returns `at`.
    pub fn at(at: DateTime<Utc>) -> Self {
        Self::stepping(at, Duration::zero())
    }

    /// A clock that starts at `start` and advances by `step` per reading.
    pub fn stepping(start: DateTime<Utc>, step: Duration) -> Self {
        FixedClock {
            start,
            step_ms: step.num_milliseconds(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::Relaxed);
        self.start + Duration::milliseconds(self.step_ms * tick)
    }
}
