//! Absolute UTC intervals and the merge that turns them into free capacity.
//!
//! Intervals are half-open `[start, end)`. Merging sorts by start time and folds
//! every interval that overlaps or touches the running one, so the result is a
//! minimal, ascending, non-touching list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A half-open `[start, end)` span of absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// True for zero-length and inverted intervals.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Clip to `[window_start, window_end)`, returning `None` if nothing is left.
    pub fn clip(&self, window_start: DateTime<Utc>, window_end: DateTime<Utc>) -> Option<Interval> {
        let clipped = Interval {
            start: self.start.max(window_start),
            end: self.end.min(window_end),
        };
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// Merge overlapping or adjacent intervals.
///
/// Empty intervals are discarded. Returns a sorted, non-overlapping list in
/// which no two intervals touch.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|i| !i.is_empty());
    if intervals.is_empty() {
        return Vec::new();
    }

    // Sort by start time (then by end time for stability).
    intervals.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                // Overlapping or adjacent: extend the current interval.
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Sum of interval durations in minutes.
pub fn total_minutes(intervals: &[Interval]) -> i64 {
    intervals.iter().map(Interval::duration_minutes).sum()
}
