//! Scheduled interval model.
//!
//! A `TimeRange` is a start offset and a duration, both in minutes since
//! midnight of the owning day track. Every value the engine commits is a
//! multiple of the snap tick and at least the minimum duration long.

use serde::{Deserialize, Serialize};

/// Default snap granularity in minutes.
pub const DEFAULT_TICK_MINUTES: u32 = 10;
/// Default minimum duration of a scheduled item in minutes.
pub const DEFAULT_MIN_DURATION_MINUTES: u32 = 30;
/// Number of minutes in one day track.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Snap `value` to the nearest multiple of `tick`. An exact half goes to
/// the even multiple, so 25 snaps to 20 and 95 snaps to 100.
///
/// Works for negative inputs too (`-5` with tick 10 snaps to `0`), which is
/// what resize deltas need before they are clamped.
pub fn snap(value: i32, tick: u32) -> i32 {
    let tick = tick.max(1) as i32;
    let mut steps = value.div_euclid(tick);
    let twice_rest = 2 * value.rem_euclid(tick);
    if twice_rest > tick || (twice_rest == tick && steps % 2 != 0) {
        steps += 1;
    }
    steps * tick
}

/// Granularity rules shared by every component that produces intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapRules {
    pub tick_minutes: u32,
    pub min_duration_minutes: u32,
}

impl Default for SnapRules {
    fn default() -> Self {
        Self {
            tick_minutes: DEFAULT_TICK_MINUTES,
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES,
        }
    }
}

impl SnapRules {
    pub fn snap(&self, value: i32) -> i32 {
        snap(value, self.tick_minutes)
    }

    /// Snap a duration and lift it to the minimum.
    pub fn snap_duration(&self, minutes: i32) -> u32 {
        let snapped = self.snap(minutes).max(0) as u32;
        snapped.max(self.min_duration_minutes)
    }

    /// True when `range` satisfies the tick and minimum-duration invariant.
    pub fn admits(&self, range: &TimeRange) -> bool {
        let tick = self.tick_minutes.max(1);
        range.start_minutes % tick == 0
            && range.duration_minutes % tick == 0
            && range.duration_minutes >= self.min_duration_minutes
    }
}

/// Half-open interval `[start, start + duration)` on a day track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_minutes: u32,
    pub duration_minutes: u32,
}

impl TimeRange {
    pub fn new(start_minutes: u32, duration_minutes: u32) -> Self {
        Self {
            start_minutes,
            duration_minutes,
        }
    }

    /// Build a range from clock values, e.g. `from_clock(9, 30, 60)`.
    pub fn from_clock(hour: u32, minute: u32, duration_minutes: u32) -> Self {
        Self::new(hour * 60 + minute, duration_minutes)
    }

    /// Saturates instead of wrapping so out-of-range input stays out of range.
    pub fn end_minutes(&self) -> u32 {
        self.start_minutes.saturating_add(self.duration_minutes)
    }

    /// True when the whole range ends by midnight.
    pub fn fits_in_day(&self) -> bool {
        self.start_minutes
            .checked_add(self.duration_minutes)
            .is_some_and(|end| end <= MINUTES_PER_DAY)
    }

    /// Half-open overlap test. Touching ranges do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_minutes < other.end_minutes() && self.end_minutes() > other.start_minutes
    }

    pub fn with_start(self, start_minutes: u32) -> Self {
        Self {
            start_minutes,
            ..self
        }
    }

    /// Whole hours this range touches, e.g. 09:20–10:20 touches 9 and 10.
    pub fn touched_hours(&self) -> std::ops::RangeInclusive<u32> {
        let first = self.start_minutes / 60;
        let last = self.end_minutes().saturating_sub(1) / 60;
        first..=last.max(first)
    }
}

/// A range bound to a day track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub day_index: usize,
    pub range: TimeRange,
}

impl Placement {
    pub fn new(day_index: usize, range: TimeRange) -> Self {
        Self { day_index, range }
    }
}
