//! Time segments: one time-of-day range plus the dates it applies to.
//!
//! Expansion anchors a segment on a calendar date at UTC midnight. A range that
//! crosses midnight contributes its overflow to the following day, so
//! `22:00-02:00` anchored on the 5th yields `[5th 22:00, 6th 00:00)` and
//! `[6th 00:00, 6th 02:00)`.

use chrono::{Days, Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};
use crate::interval::Interval;
use crate::rules::SegmentRules;
use crate::time_range::TimeRange;

/// A recurring time-of-day window and the rules deciding where it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TimeSegmentRepr", into = "TimeSegmentRepr")]
pub struct TimeSegment {
    id: String,
    time_range: TimeRange,
    rules: SegmentRules,
}

impl TimeSegment {
    /// # Errors
    /// Returns `AgendaError::EmptySegmentId` for a blank id and
    /// `AgendaError::SegmentWithoutRules` when `rules` is empty.
    pub fn new(id: impl Into<String>, time_range: TimeRange, rules: SegmentRules) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(AgendaError::EmptySegmentId);
        }
        if rules.is_empty() {
            return Err(AgendaError::SegmentWithoutRules(id));
        }
        Ok(Self {
            id,
            time_range,
            rules,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn rules(&self) -> &SegmentRules {
        &self.rules
    }

    /// A copy of this segment with a different time range.
    pub fn with_time_range(&self, time_range: TimeRange) -> Self {
        Self {
            time_range,
            ..self.clone()
        }
    }

    /// A copy of this segment with different rules.
    pub fn with_rules(&self, rules: SegmentRules) -> Result<Self> {
        Self::new(self.id.clone(), self.time_range, rules)
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.rules.applies_to(date)
    }

    /// Absolute intervals produced by anchoring this segment on `base_date`.
    ///
    /// Returns no interval if the segment does not apply to `base_date`, one
    /// for a plain range and two for a range crossing midnight.
    pub fn expand_intervals(&self, base_date: NaiveDate) -> Vec<Interval> {
        if !self.applies_to(base_date) {
            return Vec::new();
        }

        let anchor = base_date.and_time(NaiveTime::MIN).and_utc();
        self.time_range
            .split_by_midnight()
            .into_iter()
            .filter_map(|piece| {
                let day = if piece.next_day {
                    anchor.checked_add_days(Days::new(1))?
                } else {
                    anchor
                };
                Some(Interval::new(
                    day + Duration::minutes(i64::from(piece.start)),
                    day + Duration::minutes(i64::from(piece.end)),
                ))
            })
            .collect()
    }
}

#[derive(Serialize, Deserialize)]
struct TimeSegmentRepr {
    id: String,
    #[serde(flatten)]
    time_range: TimeRange,
    #[serde(flatten)]
    rules: SegmentRules,
}

impl TryFrom<TimeSegmentRepr> for TimeSegment {
    type Error = AgendaError;

    fn try_from(repr: TimeSegmentRepr) -> Result<Self> {
        TimeSegment::new(repr.id, repr.time_range, repr.rules)
    }
}

impl From<TimeSegment> for TimeSegmentRepr {
    fn from(segment: TimeSegment) -> Self {
        Self {
            id: segment.id,
            time_range: segment.time_range,
            rules: segment.rules,
        }
    }
}
