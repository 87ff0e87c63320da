//! Tests for schedule document conversion.

use chrono::{NaiveDate, Weekday};
use schedule_engine::document::resolve_records;
use schedule_engine::{
    compute_layout, AppointmentRecord, AppointmentStatus, EngineConfig, EngineError,
    IntervalError, ScheduleDocument,
};

const DOCUMENT: &str = r#"{
    "config": {"granularity_minutes": 30, "timezone": "Europe/Madrid", "first_day_of_week": "Sun"},
    "rules": [
        {"weekday": "Monday", "start_time": "09:00", "end_time": "17:00", "active": "Y"}
    ],
    "appointments": [
        {"id": "a", "start": "2026-03-16T08:00:00Z", "end": "2026-03-16T08:30:00Z", "status": "confirmed", "subject": "Ana"},
        {"id": "b", "start": "2026-03-16T09:15:00", "end": "2026-03-16T09:45:00", "duration_minutes": 30},
        {"id": "c", "start": "yesterday", "end": "2026-03-16T10:00:00"}
    ]
}"#;

#[test]
fn document_parses_config_and_rules() {
    let doc = ScheduleDocument::from_json(DOCUMENT).unwrap();
    assert_eq!(doc.config.granularity_minutes, 30);
    assert_eq!(doc.config.first_day_of_week, Weekday::Sun);
    assert_eq!(doc.rules.len(), 1);
    assert!(doc.rules[0].active);
    assert!(doc.config.validate().unwrap().is_some());
}

#[test]
fn records_convert_to_local_intervals() {
    let doc = ScheduleDocument::from_json(DOCUMENT).unwrap();
    let resolved = doc.resolve_appointments().unwrap();

    assert_eq!(resolved.appointments.len(), 2);
    let a = &resolved.appointments[0];
    let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    assert_eq!(a.start, monday.and_hms_opt(9, 0, 0).unwrap());
    assert_eq!(a.end, monday.and_hms_opt(9, 30, 0).unwrap());
    assert_eq!(a.status, AppointmentStatus::Confirmed);
    assert_eq!(a.subject.as_deref(), Some("Ana"));

    let b = &resolved.appointments[1];
    assert_eq!(b.status, AppointmentStatus::Scheduled);
    assert_eq!(b.duration_minutes, Some(30));
}

#[test]
fn unparseable_records_are_rejected_individually() {
    let doc = ScheduleDocument::from_json(DOCUMENT).unwrap();
    let resolved = doc.resolve_appointments().unwrap();

    assert_eq!(resolved.rejected.len(), 1);
    assert_eq!(resolved.rejected[0].appointment_id, "c");
    assert!(matches!(
        resolved.rejected[0].reason,
        IntervalError::Unparseable { .. }
    ));

    let outcome = compute_layout(&resolved.appointments);
    assert_eq!(outcome.total_columns, 2);
}

#[test]
fn empty_document_uses_defaults() {
    let doc = ScheduleDocument::from_json("{}").unwrap();
    assert_eq!(doc.config, EngineConfig::default());
    assert_eq!(doc.config.granularity_minutes, 15);
    assert!(doc.rules.is_empty());
    assert!(doc.resolve_appointments().unwrap().appointments.is_empty());
}

#[test]
fn invalid_timezone_is_fatal() {
    let doc = ScheduleDocument::from_json(r#"{"config": {"timezone": "Nowhere/Land"}}"#).unwrap();
    assert_eq!(
        doc.resolve_appointments().unwrap_err(),
        EngineError::InvalidTimezone("Nowhere/Land".to_string())
    );
}

#[test]
fn invalid_granularity_fails_config_validation() {
    let doc = ScheduleDocument::from_json(r#"{"config": {"granularity_minutes": 7}}"#).unwrap();
    assert!(matches!(
        doc.config.validate(),
        Err(EngineError::Configuration(_))
    ));
}

#[test]
fn malformed_json_is_an_invalid_document() {
    assert!(matches!(
        ScheduleDocument::from_json("{not json"),
        Err(EngineError::InvalidDocument(_))
    ));
}

#[test]
fn resolve_records_keeps_readable_records_without_a_document() {
    let records: Vec<AppointmentRecord> = serde_json::from_str(
        r#"[
            {"id": "ok", "start": "2026-03-16T09:00:00", "end": "2026-03-16T09:30:00"},
            {"id": "bad", "start": "not-a-time", "end": "2026-03-16T10:00:00"}
        ]"#,
    )
    .unwrap();
    let resolved = resolve_records(&records, None);

    assert_eq!(resolved.appointments.len(), 1);
    assert_eq!(resolved.appointments[0].id, "ok");
    assert_eq!(resolved.rejected.len(), 1);
    assert_eq!(resolved.rejected[0].appointment_id, "bad");
    assert!(matches!(resolved.rejected[0].reason, IntervalError::Unparseable { .. }));
}
