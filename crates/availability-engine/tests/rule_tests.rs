//! Tests for the rule data model and the wire-record validation boundary.

use availability_engine::{AvailabilityError, AvailabilityRule, RuleRecord, TimeOfDay, WeekdaySet};
use chrono::Weekday;

fn convert(json: &str) -> Result<AvailabilityRule, AvailabilityError> {
    let record: RuleRecord = serde_json::from_str(json).expect("record should deserialize");
    record.try_into()
}

// ── TimeOfDay parsing ───────────────────────────────────────────────────────

#[test]
fn time_of_day_parses_clock_strings() {
    assert_eq!("09:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(9, 30));
    assert_eq!(
        "23:05:59".parse::<TimeOfDay>().unwrap(),
        TimeOfDay::new(23, 5)
    );
    assert_eq!("00:00".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(0, 0));
}

#[test]
fn time_of_day_ignores_date_components() {
    // Upstream transmits times as UTC-labelled datetimes on arbitrary dates;
    // only hour and minute survive.
    assert_eq!(
        "1970-01-01T09:30:00.000Z".parse::<TimeOfDay>().unwrap(),
        TimeOfDay::new(9, 30)
    );
    assert_eq!(
        "2023-06-15T22:15:45Z".parse::<TimeOfDay>().unwrap(),
        TimeOfDay::new(22, 15)
    );
}

#[test]
fn time_of_day_rejects_garbage() {
    assert!("not a time".parse::<TimeOfDay>().is_err());
    assert!("25:00".parse::<TimeOfDay>().is_err());
}

// ── WeekdaySet ──────────────────────────────────────────────────────────────

#[test]
fn weekday_set_uses_sunday_zero_indexing() {
    let set = WeekdaySet::from_indices(&[0, 1, 6]).unwrap();
    assert!(set.contains(Weekday::Sun));
    assert!(set.contains(Weekday::Mon));
    assert!(set.contains(Weekday::Sat));
    assert!(!set.contains(Weekday::Tue));
    assert_eq!(set.indices(), vec![0, 1, 6]);
}

#[test]
fn weekday_set_rejects_out_of_range_indices() {
    assert!(matches!(
        WeekdaySet::from_indices(&[1, 7]),
        Err(AvailabilityError::InvalidRule(_))
    ));
}

#[test]
fn empty_weekday_set_matches_nothing() {
    let set = WeekdaySet::from_indices(&[]).unwrap();
    assert!(!set.contains(Weekday::Sun));
    assert!(!set.contains(Weekday::Mon));
    assert!(set.indices().is_empty());
}

// ── Record classification ───────────────────────────────────────────────────

#[test]
fn record_with_days_becomes_recurring() {
    let rule = convert(
        r#"{
            "startTime": "1970-01-01T09:00:00.000Z",
            "endTime": "1970-01-01T17:00:00.000Z",
            "days": [1, 2, 3, 4, 5]
        }"#,
    )
    .unwrap();

    match rule {
        AvailabilityRule::Recurring { days, start, end } => {
            assert_eq!(days.indices(), vec![1, 2, 3, 4, 5]);
            assert_eq!(start, TimeOfDay::new(9, 0));
            assert_eq!(end, TimeOfDay::new(17, 0));
        }
        other => panic!("expected recurring rule, got {other:?}"),
    }
}

#[test]
fn record_with_date_becomes_override() {
    let rule = convert(
        r#"{
            "startTime": "10:00",
            "endTime": "12:00",
            "date": "2024-03-15"
        }"#,
    )
    .unwrap();

    match rule {
        AvailabilityRule::Override { date, start, end } => {
            assert_eq!(date.to_string(), "2024-03-15");
            assert_eq!(start, TimeOfDay::new(10, 0));
            assert_eq!(end, TimeOfDay::new(12, 0));
        }
        other => panic!("expected override rule, got {other:?}"),
    }
}

#[test]
fn date_presence_alone_decides_the_kind() {
    // A stray `days` field on a dated record is ignored, not rejected.
    let rule = convert(
        r#"{
            "startTime": "10:00",
            "endTime": "12:00",
            "date": "2024-03-15",
            "days": [1, 2]
        }"#,
    )
    .unwrap();
    assert!(matches!(rule, AvailabilityRule::Override { .. }));
}

#[test]
fn record_with_neither_date_nor_days_is_rejected() {
    let result = convert(r#"{"startTime": "10:00", "endTime": "12:00"}"#);
    assert!(matches!(result, Err(AvailabilityError::InvalidRule(_))));
}

#[test]
fn record_with_out_of_range_day_is_rejected() {
    let result = convert(
        r#"{
            "startTime": "10:00",
            "endTime": "12:00",
            "days": [1, 9]
        }"#,
    );
    assert!(matches!(result, Err(AvailabilityError::InvalidRule(_))));
}
