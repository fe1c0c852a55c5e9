//! Day-by-day expansion of availability rules into concrete bookable intervals.
//!
//! The pipeline is a pure transform: partition rules into recurring and
//! override sets, expand each into a mapping keyed by target-zone calendar
//! date, merge with override keys replacing recurring keys wholesale, then
//! flatten.
//!
//! Times are *wall-clock anchored*: a walked day's civil date plus a rule's
//! stored time-of-day is interpreted directly as a local time in the target
//! timezone, never derived by converting a UTC instant into that zone. A
//! rule's weekday set is therefore tested against the target zone's calendar,
//! not UTC's.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AvailabilityError, Result};
use crate::rule::{AvailabilityRule, TimeOfDay};

/// A concrete bookable time window in the requested target timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Intervals grouped by target-zone `YYYY-MM-DD` date key.
type MergedDays = BTreeMap<String, Vec<Interval>>;

/// Materialize availability rules into concrete intervals within
/// `[date_from, date_to)`, expressed in `timezone`.
///
/// The day walk runs over UTC calendar days from `date_from` truncated to its
/// day, while the walked day's UTC midnight is strictly before `date_to`.
/// When `date_to <= date_from` no recurring expansion occurs and the result
/// is the override-only set; this is a documented no-expansion case, not an
/// error.
///
/// For every date that carries at least one override, the override intervals
/// completely replace the recurring intervals for that date — key-level
/// overwrite, never a per-interval merge.
///
/// Output ordering is unspecified by contract; consumers needing a
/// deterministic order must sort by `start` themselves.
///
/// # Errors
///
/// Returns [`AvailabilityError::InvalidTimezone`] if `timezone` is not a
/// valid IANA identifier. Rule shapes are not validated here — that is the
/// job of the [`RuleRecord`](crate::rule::RuleRecord) conversion boundary.
pub fn materialize(
    timezone: &str,
    rules: &[AvailabilityRule],
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
) -> Result<Vec<Interval>> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| AvailabilityError::InvalidTimezone(timezone.to_string()))?;

    let (recurring, overrides): (Vec<&AvailabilityRule>, Vec<&AvailabilityRule>) = rules
        .iter()
        .partition(|rule| matches!(rule, AvailabilityRule::Recurring { .. }));

    let mut merged = expand_recurring(tz, &recurring, date_from, date_to);

    // Override keys replace recurring keys wholesale.
    for (key, intervals) in expand_overrides(tz, &overrides) {
        merged.insert(key, intervals);
    }

    Ok(merged.into_values().flatten().collect())
}

/// Walk UTC calendar days through `[date_from, date_to)` and emit one
/// interval per matching (day, rule) pair.
fn expand_recurring(
    tz: Tz,
    rules: &[&AvailabilityRule],
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
) -> MergedDays {
    let mut days_map = MergedDays::new();
    let mut day = date_from.date_naive();

    // Exclusive bound: the walked day's UTC midnight must precede `date_to`,
    // so e.g. date_to = 2024-01-04T00:00Z stops after walking Jan 3.
    while utc_midnight(day) < date_to {
        for rule in rules {
            let AvailabilityRule::Recurring { days, start, end } = rule else {
                continue;
            };
            let Some(start_at) = anchor(tz, day, *start) else {
                continue;
            };
            // Weekday test happens after anchoring: the rule's day set refers
            // to the target zone's calendar.
            if !days.contains(start_at.weekday()) {
                continue;
            }
            let Some(end_at) = anchor(tz, day, *end) else {
                continue;
            };
            days_map
                .entry(date_key(&start_at))
                .or_default()
                .push(Interval {
                    start: start_at,
                    end: end_at,
                });
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    days_map
}

/// Expand override rules: one entry per rule, no day walk. Overrides sharing
/// a date accumulate under that date's key.
fn expand_overrides(tz: Tz, rules: &[&AvailabilityRule]) -> MergedDays {
    let mut days_map = MergedDays::new();
    for rule in rules {
        let AvailabilityRule::Override { date, start, end } = rule else {
            continue;
        };
        let (Some(start_at), Some(end_at)) = (anchor(tz, *date, *start), anchor(tz, *date, *end))
        else {
            continue;
        };
        days_map
            .entry(date_key(&start_at))
            .or_default()
            .push(Interval {
                start: start_at,
                end: end_at,
            });
    }
    days_map
}

/// Widest spring-forward gap worth scanning across, in minutes. Real-world
/// transitions move clocks by two hours at most.
const MAX_DST_GAP_MINUTES: u32 = 180;

/// Wall-clock anchoring: interpret `time` on `date` as a civil local time in
/// `tz`, with no UTC-offset conversion of the stored value.
///
/// An ambiguous local time (DST fall-back) resolves to the earlier offset. A
/// nonexistent one (spring-forward gap) shifts forward to the first valid
/// instant after the transition, so a rule always yields an interval on its
/// date — overrides in particular must always reach the merge map, or the
/// recurring intervals they are meant to replace would survive.
fn anchor(tz: Tz, date: NaiveDate, time: TimeOfDay) -> Option<DateTime<Tz>> {
    let mut naive = date.and_hms_opt(u32::from(time.hour), u32::from(time.minute), 0)?;
    for _ in 0..=MAX_DST_GAP_MINUTES {
        if let Some(at) = tz.from_local_datetime(&naive).earliest() {
            return Some(at);
        }
        naive += Duration::minutes(1);
    }
    None
}

fn utc_midnight(day: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN))
}

fn date_key(at: &DateTime<Tz>) -> String {
    at.format("%Y-%m-%d").to_string()
}
