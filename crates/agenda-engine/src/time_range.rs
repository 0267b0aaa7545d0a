//! Time-of-day ranges, possibly crossing midnight.
//!
//! A range is stored as two minute offsets from midnight. `24:00` is accepted as
//! an end-of-day marker so that a range can run up to, but not past, midnight.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AgendaError, Result};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// An immutable `[start, end)` range of time of day.
///
/// When `end <= start` the range crosses midnight and covers
/// `[start, 24:00)` followed by `[00:00, end)` on the next day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TimeRangeRepr", into = "TimeRangeRepr")]
pub struct TimeRange {
    start: u16,
    end: u16,
}

/// One piece of a [`TimeRange`] that does not cross midnight, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayPiece {
    /// Minutes after the anchor day's midnight.
    pub start: u16,
    pub end: u16,
    /// Whether this piece belongs to the day after the anchor day.
    pub next_day: bool,
}

impl DayPiece {
    pub fn duration_minutes(&self) -> u16 {
        self.end - self.start
    }
}

impl TimeRange {
    /// Parse a range from two strict `HH:mm` strings.
    ///
    /// # Errors
    /// Returns `AgendaError::InvalidTime` for a malformed time and
    /// `AgendaError::EmptyTimeRange` for `HH:mm-HH:mm` with equal ends or for `24:00-00:00`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::from_minutes(parse_hhmm(start)?, parse_hhmm(end)?)
    }

    /// Build a range from minute offsets (`0..=1440`).
    pub fn from_minutes(start: u16, end: u16) -> Result<Self> {
        for m in [start, end] {
            if m > MINUTES_PER_DAY {
                return Err(AgendaError::InvalidTime(format_minutes(m)));
            }
        }
        // 00:00-24:00 is the whole day; 24:00-00:00 covers nothing.
        if start == end || (start == MINUTES_PER_DAY && end == 0) {
            return Err(AgendaError::EmptyTimeRange {
                start: format_minutes(start),
                end: format_minutes(end),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start_minutes(&self) -> u16 {
        self.start
    }

    pub fn end_minutes(&self) -> u16 {
        self.end
    }

    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }

    /// Split into pieces that each fit inside a single day.
    ///
    /// A non-crossing range yields one piece; a crossing range yields
    /// `[start, 24:00)` and `[00:00, end)`, the latter flagged `next_day`.
    /// Zero-length pieces (e.g. a range starting at `24:00`) are omitted.
    pub fn split_by_midnight(&self) -> Vec<DayPiece> {
        let pieces = if self.crosses_midnight() {
            vec![
                DayPiece {
                    start: self.start,
                    end: MINUTES_PER_DAY,
                    next_day: false,
                },
                DayPiece {
                    start: 0,
                    end: self.end,
                    next_day: true,
                },
            ]
        } else {
            vec![DayPiece {
                start: self.start,
                end: self.end,
                next_day: false,
            }]
        };
        pieces.into_iter().filter(|p| p.end > p.start).collect()
    }

    pub fn duration_minutes(&self) -> u32 {
        self.split_by_midnight()
            .iter()
            .map(|p| u32::from(p.duration_minutes()))
            .sum()
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}",
            format_minutes(self.start),
            format_minutes(self.end)
        )
    }
}

/// Parse a strict `HH:mm` time into minutes after midnight.
///
/// Hours run from `00` to `24`; `24` is only valid as `24:00`.
pub fn parse_hhmm(s: &str) -> Result<u16> {
    let invalid = || AgendaError::InvalidTime(s.to_string());
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return Err(invalid());
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return Err(invalid());
    }
    let hours = u16::from(digits[0] - b'0') * 10 + u16::from(digits[1] - b'0');
    let minutes = u16::from(digits[2] - b'0') * 10 + u16::from(digits[3] - b'0');
    if hours > 24 || minutes > 59 || (hours == 24 && minutes != 0) {
        return Err(invalid());
    }
    Ok(hours * 60 + minutes)
}

/// Render minutes after midnight as `HH:mm`.
pub fn format_minutes(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[derive(Serialize, Deserialize)]
struct TimeRangeRepr {
    start: String,
    end: String,
}

impl TryFrom<TimeRangeRepr> for TimeRange {
    type Error = AgendaError;

    fn try_from(repr: TimeRangeRepr) -> Result<Self> {
        TimeRange::parse(&repr.start, &repr.end)
    }
}

impl From<TimeRange> for TimeRangeRepr {
    fn from(range: TimeRange) -> Self {
        Self {
            start: format_minutes(range.start),
            end: format_minutes(range.end),
        }
    }
}
