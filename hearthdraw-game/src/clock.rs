//! Time sources injected into the energy model and profile rehydration.

use std::cell::Cell;
use std::rc::Rc;

/// Number of clock ticks in one second (one tick is 100 nanoseconds).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Supplies UTC time as ticks.
pub trait Clock {
    /// Current UTC time in ticks.
    fn now_ticks(&self) -> i64;
}

/// Wall clock backed by `chrono::Utc`, measured in ticks since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ticks(&self) -> i64 {
        chrono::Utc::now().timestamp_micros().saturating_mul(10)
    }
}

/// Settable clock shared between clones; advancing one handle advances all.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    ticks: Rc<Cell<i64>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start_ticks: i64) -> Self {
        Self {
            ticks: Rc::new(Cell::new(start_ticks)),
        }
    }

    /// Start at the given number of whole seconds.
    #[must_use]
    pub fn at_seconds(seconds: i64) -> Self {
        Self::new(seconds.saturating_mul(TICKS_PER_SECOND))
    }

    pub fn set_ticks(&self, ticks: i64) {
        self.ticks.set(ticks);
    }

    pub fn advance_ticks(&self, ticks: i64) {
        self.ticks.set(self.ticks.get().saturating_add(ticks));
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.advance_ticks(seconds.saturating_mul(TICKS_PER_SECOND));
    }
}

impl Clock for ManualClock {
    fn now_ticks(&self) -> i64 {
        self.ticks.get()
    }
}
