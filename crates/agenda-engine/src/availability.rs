//! The availability aggregate: a project's recurring working windows.
//!
//! An [`Availability`] owns a [`DateRange`] and an ordered list of
//! [`TimeSegment`]s and turns them into the merged set of absolute intervals
//! during which work may be scheduled. Instances are immutable; every mutator
//! returns a new instance with the change applied and a domain event appended.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::date_range::DateRange;
use crate::error::{AgendaError, Result};
use crate::interval::{self, Interval};
use crate::segment::TimeSegment;

/// Lifecycle state. Only `Active` availabilities can be planned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvailabilityState {
    #[default]
    Active,
    Archived,
}

impl fmt::Display for AvailabilityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityState::Active => f.write_str("ACTIVE"),
            AvailabilityState::Archived => f.write_str("ARCHIVED"),
        }
    }
}

/// Domain events recorded by the aggregate, waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AvailabilityEvent {
    Created {
        availability_id: String,
        project_id: String,
    },
    SegmentAdded {
        availability_id: String,
        segment_id: String,
    },
    SegmentReplaced {
        availability_id: String,
        segment_id: String,
    },
    SegmentRemoved {
        availability_id: String,
        segment_id: String,
    },
    DateRangeChanged {
        availability_id: String,
        date_range: DateRange,
    },
    Archived {
        availability_id: String,
    },
    Reactivated {
        availability_id: String,
    },
}

/// A project-scoped declaration of recurring time windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AvailabilitySnapshot", into = "AvailabilitySnapshot")]
pub struct Availability {
    id: String,
    project_id: String,
    date_range: DateRange,
    segments: Vec<TimeSegment>,
    state: AvailabilityState,
    events: Vec<AvailabilityEvent>,
}

impl Availability {
    /// Create a new, active availability and record a `Created` event.
    ///
    /// # Errors
    /// Returns `AgendaError::DuplicateSegment` if two segments share an id.
    pub fn create(
        id: impl Into<String>,
        project_id: impl Into<String>,
        date_range: DateRange,
        segments: Vec<TimeSegment>,
    ) -> Result<Self> {
        let mut availability = Self::restore(
            id,
            project_id,
            date_range,
            segments,
            AvailabilityState::Active,
        )?;
        availability.events.push(AvailabilityEvent::Created {
            availability_id: availability.id.clone(),
            project_id: availability.project_id.clone(),
        });
        Ok(availability)
    }

    /// Rehydrate a stored availability. No event is recorded.
    pub fn restore(
        id: impl Into<String>,
        project_id: impl Into<String>,
        date_range: DateRange,
        segments: Vec<TimeSegment>,
        state: AvailabilityState,
    ) -> Result<Self> {
        ensure_unique_ids(&segments)?;
        Ok(Self {
            id: id.into(),
            project_id: project_id.into(),
            date_range,
            segments,
            state,
            events: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn date_range(&self) -> DateRange {
        self.date_range
    }

    pub fn segments(&self) -> &[TimeSegment] {
        &self.segments
    }

    pub fn segment(&self, segment_id: &str) -> Option<&TimeSegment> {
        self.segments.iter().find(|s| s.id() == segment_id)
    }

    pub fn state(&self) -> AvailabilityState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == AvailabilityState::Active
    }

    /// Events recorded since the last [`clear_events`](Self::clear_events).
    pub fn events(&self) -> &[AvailabilityEvent] {
        &self.events
    }

    pub fn clear_events(&self) -> Self {
        Self {
            events: Vec::new(),
            ..self.clone()
        }
    }

    /// # Errors
    /// Returns `AgendaError::DuplicateSegment` if a segment with the same id exists.
    pub fn add_segment(&self, segment: TimeSegment) -> Result<Self> {
        if self.segment(segment.id()).is_some() {
            return Err(AgendaError::DuplicateSegment(segment.id().to_string()));
        }
        let event = AvailabilityEvent::SegmentAdded {
            availability_id: self.id.clone(),
            segment_id: segment.id().to_string(),
        };
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(self.patched(|a| a.segments = segments, event))
    }

    /// Replace the segment sharing `segment`'s id, keeping its position.
    pub fn replace_segment(&self, segment: TimeSegment) -> Result<Self> {
        let index = self.position_of(segment.id())?;
        let event = AvailabilityEvent::SegmentReplaced {
            availability_id: self.id.clone(),
            segment_id: segment.id().to_string(),
        };
        let mut segments = self.segments.clone();
        segments[index] = segment;
        Ok(self.patched(|a| a.segments = segments, event))
    }

    pub fn remove_segment(&self, segment_id: &str) -> Result<Self> {
        let index = self.position_of(segment_id)?;
        let event = AvailabilityEvent::SegmentRemoved {
            availability_id: self.id.clone(),
            segment_id: segment_id.to_string(),
        };
        let mut segments = self.segments.clone();
        segments.remove(index);
        Ok(self.patched(|a| a.segments = segments, event))
    }

    pub fn change_date_range(&self, date_range: DateRange) -> Self {
        let event = AvailabilityEvent::DateRangeChanged {
            availability_id: self.id.clone(),
            date_range,
        };
        self.patched(|a| a.date_range = date_range, event)
    }

    /// # Errors
    /// Returns `AgendaError::InvalidState` if already archived.
    pub fn archive(&self) -> Result<Self> {
        if !self.is_active() {
            return Err(self.invalid_state());
        }
        let event = AvailabilityEvent::Archived {
            availability_id: self.id.clone(),
        };
        Ok(self.patched(|a| a.state = AvailabilityState::Archived, event))
    }

    /// # Errors
    /// Returns `AgendaError::InvalidState` if already active.
    pub fn reactivate(&self) -> Result<Self> {
        if self.is_active() {
            return Err(self.invalid_state());
        }
        let event = AvailabilityEvent::Reactivated {
            availability_id: self.id.clone(),
        };
        Ok(self.patched(|a| a.state = AvailabilityState::Active, event))
    }

    pub(crate) fn invalid_state(&self) -> AgendaError {
        AgendaError::InvalidState {
            availability_id: self.id.clone(),
            state: self.state,
        }
    }

    /// The merged intervals of working time inside the date range.
    ///
    /// Every segment is expanded on every day from the day before the range
    /// start through the range end; the lookback day lets a segment crossing
    /// midnight spill into the first day of the range. Results are clipped to
    /// `[start 00:00, end + 1 day 00:00)` and merged.
    pub fn valid_intervals(&self) -> Vec<Interval> {
        let window_start = midnight(self.date_range.start());
        let window_end = midnight(self.date_range.end_exclusive());

        let first_anchor = self
            .date_range
            .start()
            .checked_sub_days(Days::new(1))
            .unwrap_or(NaiveDate::MIN);
        let last_anchor = self.date_range.end();

        let mut intervals = Vec::new();
        for anchor in first_anchor.iter_days().take_while(|d| *d <= last_anchor) {
            for segment in &self.segments {
                intervals.extend(
                    segment
                        .expand_intervals(anchor)
                        .iter()
                        .filter_map(|i| i.clip(window_start, window_end)),
                );
            }
        }

        interval::merge_intervals(intervals)
    }

    pub fn valid_minutes(&self) -> i64 {
        interval::total_minutes(&self.valid_intervals())
    }

    pub fn valid_hours(&self) -> f64 {
        self.valid_minutes() as f64 / 60.0
    }

    /// Working minutes per UTC calendar day.
    ///
    /// Merged intervals spanning midnight are split so that each day is only
    /// credited with the minutes that fall on it. Days without capacity are
    /// absent from the map.
    pub fn valid_minutes_by_day(&self) -> BTreeMap<NaiveDate, i64> {
        let mut by_day = BTreeMap::new();
        for interval in self.valid_intervals() {
            let mut cursor = interval.start;
            while cursor < interval.end {
                let day = cursor.date_naive();
                let next_midnight = day
                    .checked_add_days(Days::new(1))
                    .map(midnight)
                    .unwrap_or(interval.end);
                let piece_end = next_midnight.min(interval.end);
                *by_day.entry(day).or_insert(0) += (piece_end - cursor).num_minutes();
                cursor = piece_end;
            }
        }
        by_day
    }

    fn position_of(&self, segment_id: &str) -> Result<usize> {
        self.segments
            .iter()
            .position(|s| s.id() == segment_id)
            .ok_or_else(|| AgendaError::SegmentNotFound(segment_id.to_string()))
    }

    fn patched(&self, patch: impl FnOnce(&mut Self), event: AvailabilityEvent) -> Self {
        let mut next = self.clone();
        patch(&mut next);
        next.events.push(event);
        next
    }
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn ensure_unique_ids(segments: &[TimeSegment]) -> Result<()> {
    for (i, segment) in segments.iter().enumerate() {
        if segments[..i].iter().any(|s| s.id() == segment.id()) {
            return Err(AgendaError::DuplicateSegment(segment.id().to_string()));
        }
    }
    Ok(())
}

/// Serialized form of an [`Availability`]. Pending events are not persisted.
#[derive(Serialize, Deserialize)]
struct AvailabilitySnapshot {
    id: String,
    project_id: String,
    date_range: DateRange,
    #[serde(default)]
    segments: Vec<TimeSegment>,
    #[serde(default)]
    state: AvailabilityState,
}

impl TryFrom<AvailabilitySnapshot> for Availability {
    type Error = AgendaError;

    fn try_from(snapshot: AvailabilitySnapshot) -> Result<Self> {
        Availability::restore(
            snapshot.id,
            snapshot.project_id,
            snapshot.date_range,
            snapshot.segments,
            snapshot.state,
        )
    }
}

impl From<Availability> for AvailabilitySnapshot {
    fn from(availability: Availability) -> Self {
        Self {
            id: availability.id,
            project_id: availability.project_id,
            date_range: availability.date_range,
            segments: availability.segments,
            state: availability.state,
        }
    }
}
