//! Time-based regeneration policy.
//!
//! Regeneration is computed lazily from the elapsed time since a regen
//! anchor. Advancing the anchor by whole intervals only keeps partial
//! progress towards the next unit across calls.

use crate::clock::TICKS_PER_SECOND;
use crate::numbers::saturate_count;

/// Interval lengths of zero or less are treated as one second.
#[must_use]
pub const fn normalize_interval(interval_seconds: i32) -> i32 {
    if interval_seconds <= 0 { 1 } else { interval_seconds }
}

/// Interval length in clock ticks.
#[must_use]
pub const fn interval_ticks(interval_seconds: i32) -> i64 {
    normalize_interval(interval_seconds) as i64 * TICKS_PER_SECOND
}

/// Whole units regenerated between `last_ticks` and `now_ticks`.
#[must_use]
pub fn gained(now_ticks: i64, last_ticks: i64, interval_seconds: i32) -> i32 {
    if now_ticks <= last_ticks {
        return 0;
    }
    let elapsed = now_ticks.saturating_sub(last_ticks);
    saturate_count(elapsed / interval_ticks(interval_seconds))
}

/// Move the anchor forward by exactly `units` intervals.
#[must_use]
pub fn advance(last_ticks: i64, units: i32, interval_seconds: i32) -> i64 {
    if units <= 0 {
        return last_ticks;
    }
    let step = i64::from(units).saturating_mul(interval_ticks(interval_seconds));
    last_ticks.saturating_add(step)
}

/// Whole seconds until the next unit becomes available.
#[must_use]
pub fn seconds_until_next(now_ticks: i64, last_ticks: i64, interval_seconds: i32) -> i32 {
    let interval_seconds = normalize_interval(interval_seconds);
    if now_ticks <= last_ticks {
        return interval_seconds;
    }
    let interval = interval_ticks(interval_seconds);
    let elapsed = now_ticks.saturating_sub(last_ticks);
    let remaining = interval - elapsed % interval;
    saturate_count(remaining / TICKS_PER_SECOND)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60 * TICKS_PER_SECOND;

    #[test]
    fn gained_counts_whole_intervals_only() {
        assert_eq!(gained(3 * MINUTE + 59 * TICKS_PER_SECOND, 0, 60), 3);
        assert_eq!(gained(MINUTE - 1, 0, 60), 0);
    }

    #[test]
    fn gained_is_zero_when_time_runs_backwards() {
        assert_eq!(gained(10, 10, 60), 0);
        assert_eq!(gained(5, 10, 60), 0);
    }

    #[test]
    fn non_positive_interval_is_one_second() {
        assert_eq!(gained(5 * TICKS_PER_SECOND, 0, 0), 5);
        assert_eq!(gained(5 * TICKS_PER_SECOND, 0, -30), 5);
        assert_eq!(advance(0, 2, 0), 2 * TICKS_PER_SECOND);
    }

    #[test]
    fn gained_saturates_to_i32() {
        assert_eq!(gained(i64::MAX, 0, 1), i32::MAX);
    }

    #[test]
    fn advance_keeps_remainder() {
        let last = 0;
        let now = 2 * MINUTE + 25 * TICKS_PER_SECOND;
        let units = gained(now, last, 60);
        let anchor = advance(last, units, 60);
        assert_eq!(anchor, 2 * MINUTE);
        assert_eq!(now - anchor, 25 * TICKS_PER_SECOND);
        assert_eq!(advance(anchor, 0, 60), anchor);
        assert_eq!(advance(anchor, -3, 60), anchor);
    }

    #[test]
    fn seconds_until_next_counts_down() {
        assert_eq!(seconds_until_next(0, 0, 300), 300);
        assert_eq!(seconds_until_next(0, 10, 300), 300);
        assert_eq!(seconds_until_next(100 * TICKS_PER_SECOND, 0, 300), 200);
        // Partial seconds are floored.
        assert_eq!(
            seconds_until_next(100 * TICKS_PER_SECOND + 1, 0, 300),
            199
        );
        assert_eq!(seconds_until_next(300 * TICKS_PER_SECOND, 0, 300), 300);
    }
}
