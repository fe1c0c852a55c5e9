//! Availability rule data model and the wire-record boundary.
//!
//! A rule is exactly one of two kinds, decided solely by the presence of a
//! `date` field on the incoming record: a [`Recurring`](AvailabilityRule::Recurring)
//! rule applies every week on a set of weekdays, while an
//! [`Override`](AvailabilityRule::Override) applies to one specific calendar
//! date and supersedes any recurring rule on that date.
//!
//! Rule times are [`TimeOfDay`] values — naive wall-clock times with hour and
//! minute only. They are deliberately kept distinct from zoned instants so the
//! stored value can never be pushed through a UTC-offset conversion by
//! accident; interpretation in a concrete timezone happens only inside the
//! materializer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// A naive wall-clock time of day with hour/minute precision.
///
/// Upstream systems transmit these as full datetime strings whose date (and
/// second/offset) components are meaningless; deserialization discards
/// everything but hour and minute. Plain `"HH:MM"` and `"HH:MM:SS"` strings
/// are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
}

impl TimeOfDay {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = AvailabilityError;

    fn from_str(s: &str) -> Result<Self> {
        // Full datetime: read the clock fields back as transmitted (the
        // source labels them UTC) and drop the date outright.
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            let utc = dt.with_timezone(&Utc);
            return Ok(Self::new(utc.hour() as u8, utc.minute() as u8));
        }
        let time = NaiveTime::parse_from_str(s, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map_err(|_| {
                AvailabilityError::InvalidRule(format!("unparseable time of day: {s:?}"))
            })?;
        Ok(Self::new(time.hour() as u8, time.minute() as u8))
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = AvailabilityError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// A set of weekdays, indexed 0–6 with 0 = Sunday (the source system's day
/// numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Build a set from raw day indices. Out-of-range indices are rejected
    /// here, at the boundary, so the materializer never sees them.
    pub fn from_indices(indices: &[u8]) -> Result<Self> {
        let mut mask = 0u8;
        for &idx in indices {
            if idx > 6 {
                return Err(AvailabilityError::InvalidRule(format!(
                    "weekday index out of range (0-6): {idx}"
                )));
            }
            mask |= 1 << idx;
        }
        Ok(Self(mask))
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_sunday()) != 0
    }

    /// Day indices present in the set, ascending.
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|idx| self.0 & (1 << idx) != 0).collect()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = AvailabilityError;

    fn try_from(indices: Vec<u8>) -> Result<Self> {
        Self::from_indices(&indices)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices()
    }
}

/// A validated availability rule — exactly recurring or override, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityRule {
    /// Weekly working hours on a set of weekdays.
    Recurring {
        days: WeekdaySet,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    /// Working hours for one specific calendar date. Supersedes all recurring
    /// intervals on that date.
    Override {
        date: NaiveDate,
        start: TimeOfDay,
        end: TimeOfDay,
    },
}

impl AvailabilityRule {
    pub fn recurring(days: WeekdaySet, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self::Recurring { days, start, end }
    }

    pub fn override_on(date: NaiveDate, start: TimeOfDay, end: TimeOfDay) -> Self {
        Self::Override { date, start, end }
    }
}

/// The optional-field wire shape supplied by the rule source.
///
/// `startTime`/`endTime` arrive as datetime or clock strings (date components
/// ignored, see [`TimeOfDay`]); `date` marks an override, `days` marks a
/// recurring rule. Conversion to [`AvailabilityRule`] is the validation
/// boundary: the materializer itself trusts its input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleRecord {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(default)]
    pub days: Option<Vec<u8>>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl TryFrom<RuleRecord> for AvailabilityRule {
    type Error = AvailabilityError;

    fn try_from(record: RuleRecord) -> Result<Self> {
        // Presence of `date` alone decides the kind; a stray `days` field on
        // an override record is ignored rather than rejected.
        match record.date {
            Some(date) => Ok(Self::override_on(date, record.start_time, record.end_time)),
            None => {
                let days = record.days.ok_or_else(|| {
                    AvailabilityError::InvalidRule(
                        "rule has neither `date` nor `days`".to_string(),
                    )
                })?;
                Ok(Self::recurring(
                    WeekdaySet::from_indices(&days)?,
                    record.start_time,
                    record.end_time,
                ))
            }
        }
    }
}
