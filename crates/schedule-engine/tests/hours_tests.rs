//! Tests for working-hour resolution.

use chrono::{NaiveDate, NaiveTime};
use schedule_engine::hours::parse_weekday;
use schedule_engine::{is_within_hours, resolve_hours, OpenWindow, WorkingHourRule};

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Monday 2026-03-16.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn weekday_rules() -> Vec<WorkingHourRule> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .into_iter()
        .map(|day| WorkingHourRule::new(day, "09:00", "17:00", true))
        .collect()
}

// ── Boundaries ──────────────────────────────────────────────────────────────

#[test]
fn open_boundary_is_inclusive() {
    assert!(is_within_hours(monday(), time(9, 0), &weekday_rules()));
}

#[test]
fn close_boundary_is_exclusive() {
    let rules = weekday_rules();
    assert!(is_within_hours(monday(), time(16, 59), &rules));
    assert!(!is_within_hours(monday(), time(17, 0), &rules));
}

#[test]
fn before_opening_is_outside() {
    assert!(!is_within_hours(monday(), time(8, 45), &weekday_rules()));
}

#[test]
fn resolved_window_in_minutes() {
    let window = resolve_hours(monday(), &weekday_rules()).unwrap();
    assert_eq!(
        window,
        OpenWindow {
            open_minute: 540,
            close_minute: 1020
        }
    );
    assert_eq!(window.duration_minutes(), 480);
}

// ── Closed days ─────────────────────────────────────────────────────────────

#[test]
fn weekday_without_rule_is_closed_all_day() {
    // Saturday 2026-03-21
    let saturday = NaiveDate::from_ymd_opt(2026, 3, 21).unwrap();
    assert_eq!(resolve_hours(saturday, &weekday_rules()), None);
    assert!(!is_within_hours(saturday, time(12, 0), &weekday_rules()));
}

#[test]
fn inactive_rule_is_ignored() {
    let rules = vec![WorkingHourRule::new("Monday", "09:00", "17:00", false)];
    assert!(!is_within_hours(monday(), time(10, 0), &rules));
}

#[test]
fn holiday_rule_closes_the_weekday() {
    let rules = vec![WorkingHourRule::new("Monday", "09:00", "17:00", true).with_holiday(true)];
    assert!(!is_within_hours(monday(), time(10, 0), &rules));
}

#[test]
fn missing_or_malformed_times_mean_closed() {
    let mut missing = WorkingHourRule::new("Monday", "09:00", "17:00", true);
    missing.end_time = None;
    assert!(!is_within_hours(monday(), time(10, 0), &[missing]));

    let garbled = WorkingHourRule::new("Monday", "nine", "17:00", true);
    assert!(!is_within_hours(monday(), time(10, 0), &[garbled]));

    let inverted = WorkingHourRule::new("Monday", "17:00", "09:00", true);
    assert!(!is_within_hours(monday(), time(10, 0), &[inverted]));
}

#[test]
fn unknown_weekday_never_matches() {
    let rules = vec![WorkingHourRule::new("Moonday", "00:00", "24:00", true)];
    assert!(!is_within_hours(monday(), time(10, 0), &rules));
}

// ── Rule selection ──────────────────────────────────────────────────────────

#[test]
fn first_active_match_wins_over_duplicates() {
    let rules = vec![
        WorkingHourRule::new("Monday", "13:00", "15:00", false),
        WorkingHourRule::new("Monday", "08:00", "12:00", true),
        WorkingHourRule::new("Monday", "14:00", "20:00", true),
    ];
    assert!(is_within_hours(monday(), time(8, 0), &rules));
    assert!(!is_within_hours(monday(), time(14, 0), &rules));
}

#[test]
fn midnight_close_covers_last_slot() {
    let rules = vec![WorkingHourRule::new("mon", "18:00", "24:00", true)];
    assert!(is_within_hours(monday(), time(23, 45), &rules));
    assert!(!is_within_hours(monday(), time(17, 59), &rules));
}

#[test]
fn weekday_identifiers_are_flexible() {
    assert_eq!(parse_weekday("monday"), parse_weekday("MON"));
    assert_eq!(parse_weekday("1"), parse_weekday("Monday"));
    let rules = vec![WorkingHourRule::new("1", "09:00", "10:00", true)];
    assert!(is_within_hours(monday(), time(9, 30), &rules));
}

// ── Deserialization ─────────────────────────────────────────────────────────

#[test]
fn rules_deserialize_with_yn_flags() {
    let json = r#"[
        {"weekday": "Monday", "start_time": "09:00", "end_time": "17:00", "active": "Y"},
        {"weekday": "Tuesday", "start_time": "09:00", "end_time": "17:00", "active": "N", "holiday": "N"},
        {"weekday": "Wednesday", "start_time": "09:00:00", "end_time": "13:00:00", "active": true, "holiday": "Y"}
    ]"#;
    let rules: Vec<WorkingHourRule> = serde_json::from_str(json).unwrap();
    assert!(rules[0].active);
    assert!(!rules[0].holiday);
    assert!(!rules[1].active);
    assert!(rules[2].active);
    assert!(rules[2].holiday);
}

#[test]
fn invalid_flag_is_a_deserialization_error() {
    let json = r#"{"weekday": "Monday", "start_time": "09:00", "end_time": "17:00", "active": "perhaps"}"#;
    assert!(serde_json::from_str::<WorkingHourRule>(json).is_err());
}
