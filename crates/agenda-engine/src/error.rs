//! Error types for agenda-engine operations.
//!
//! Two families exist: validation errors, raised eagerly when a value object or
//! aggregate is constructed, and the invalid-state error raised by
//! [`SchedulingPolicy`](crate::policy::SchedulingPolicy) when asked to plan
//! against an availability that is not active.

use thiserror::Error;

use crate::availability::AvailabilityState;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgendaError {
    /// Not a strict `HH:mm` time between `00:00` and `24:00`.
    #[error("Invalid time: '{0}' (expected HH:mm between 00:00 and 24:00)")]
    InvalidTime(String),

    /// Not a strict `YYYY-MM-DD` calendar date.
    #[error("Invalid date: '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Invalid weekday: {0} (expected 1-7, Monday=1)")]
    InvalidWeekday(u8),

    #[error("Invalid day of month: {0} (expected 1-31)")]
    InvalidMonthDay(u8),

    /// Start and end denote the same time of day.
    #[error("Empty time range: {start}-{end}")]
    EmptyTimeRange { start: String, end: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvertedDateRange { start: String, end: String },

    #[error("Time segment '{0}' has no applicability rule")]
    SegmentWithoutRules(String),

    #[error("Time segment id must not be empty")]
    EmptySegmentId,

    #[error("Duplicate time segment id: '{0}'")]
    DuplicateSegment(String),

    #[error("Time segment not found: '{0}'")]
    SegmentNotFound(String),

    #[error("Availability '{availability_id}' is {state}, expected ACTIVE")]
    InvalidState {
        availability_id: String,
        state: AvailabilityState,
    },
}

impl AgendaError {
    /// Whether this error was raised while validating input values.
    pub fn is_validation(&self) -> bool {
        !self.is_invalid_state()
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, AgendaError::InvalidState { .. })
    }
}

pub type Result<T> = std::result::Result<T, AgendaError>;
