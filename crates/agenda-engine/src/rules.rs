//! Date-applicability rules for time segments.
//!
//! Each rule set is a deduplicated, ordered set of domain-valid values. A
//! [`SegmentRules`] combines the three kinds; a date matches when ANY of them
//! matches.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_range::parse_iso_date;
use crate::error::{AgendaError, Result};

/// ISO weekdays, Monday = 1 through Sunday = 7.
///
/// `0` is accepted as an alias for Sunday and stored as `7`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DayOfWeekSet(BTreeSet<u8>);

impl DayOfWeekSet {
    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self> {
        days.into_iter()
            .map(|d| match d {
                0 => Ok(7),
                1..=7 => Ok(d),
                _ => Err(AgendaError::InvalidWeekday(d)),
            })
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn contains(&self, iso_weekday: u8) -> bool {
        self.0.contains(&iso_weekday)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        // number_from_monday() is 1..=7, so the cast cannot truncate.
        self.contains(date.weekday().number_from_monday() as u8)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

/// Days of the month, 1 through 31.
///
/// A day that does not exist in a given month (the 31st of April) simply never
/// matches that month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct DayOfMonthSet(BTreeSet<u8>);

impl DayOfMonthSet {
    pub fn new(days: impl IntoIterator<Item = u8>) -> Result<Self> {
        days.into_iter()
            .map(|d| match d {
                1..=31 => Ok(d),
                _ => Err(AgendaError::InvalidMonthDay(d)),
            })
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn contains(&self, day: u8) -> bool {
        self.0.contains(&day)
    }

    pub fn matches(&self, date: NaiveDate) -> bool {
        self.contains(date.day() as u8)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }
}

/// Explicit calendar dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SpecificDateSet(BTreeSet<NaiveDate>);

impl SpecificDateSet {
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self(dates.into_iter().collect())
    }

    /// Parse each entry as a strict `YYYY-MM-DD` date.
    pub fn parse<S: AsRef<str>>(dates: impl IntoIterator<Item = S>) -> Result<Self> {
        dates
            .into_iter()
            .map(|d| parse_iso_date(d.as_ref()))
            .collect::<Result<BTreeSet<_>>>()
            .map(Self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }
}

/// The union of all applicability rules for one segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentRules {
    #[serde(default)]
    pub specific_dates: SpecificDateSet,
    #[serde(default)]
    pub weekdays: DayOfWeekSet,
    #[serde(default)]
    pub month_days: DayOfMonthSet,
}

impl SegmentRules {
    pub fn weekdays(days: impl IntoIterator<Item = u8>) -> Result<Self> {
        Ok(Self {
            weekdays: DayOfWeekSet::new(days)?,
            ..Self::default()
        })
    }

    pub fn month_days(days: impl IntoIterator<Item = u8>) -> Result<Self> {
        Ok(Self {
            month_days: DayOfMonthSet::new(days)?,
            ..Self::default()
        })
    }

    pub fn specific_dates<S: AsRef<str>>(dates: impl IntoIterator<Item = S>) -> Result<Self> {
        Ok(Self {
            specific_dates: SpecificDateSet::parse(dates)?,
            ..Self::default()
        })
    }

    /// True when no rule of any kind is set.
    pub fn is_empty(&self) -> bool {
        self.specific_dates.is_empty() && self.weekdays.is_empty() && self.month_days.is_empty()
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        self.specific_dates.contains(date)
            || self.weekdays.matches(date)
            || self.month_days.matches(date)
    }
}

impl TryFrom<Vec<u8>> for DayOfWeekSet {
    type Error = AgendaError;

    fn try_from(days: Vec<u8>) -> Result<Self> {
        Self::new(days)
    }
}

impl From<DayOfWeekSet> for Vec<u8> {
    fn from(set: DayOfWeekSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl TryFrom<Vec<u8>> for DayOfMonthSet {
    type Error = AgendaError;

    fn try_from(days: Vec<u8>) -> Result<Self> {
        Self::new(days)
    }
}

impl From<DayOfMonthSet> for Vec<u8> {
    fn from(set: DayOfMonthSet) -> Self {
        set.0.into_iter().collect()
    }
}

impl TryFrom<Vec<String>> for SpecificDateSet {
    type Error = AgendaError;

    fn try_from(dates: Vec<String>) -> Result<Self> {
        Self::parse(dates)
    }
}

impl From<SpecificDateSet> for Vec<String> {
    fn from(set: SpecificDateSet) -> Self {
        set.0.into_iter().map(|d| d.to_string()).collect()
    }
}
