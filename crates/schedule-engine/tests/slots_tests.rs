//! Tests for the day slot grid.

use chrono::NaiveTime;
use schedule_engine::{generate_slots, slot_at, EngineError, TimeSlot};

#[test]
fn fifteen_minute_grid_has_96_slots() {
    let slots: Vec<TimeSlot> = generate_slots(15).unwrap().collect();
    assert_eq!(slots.len(), 96);
    assert_eq!(slots[0].label, "00:00");
    assert_eq!(slots[1].label, "00:15");
    assert_eq!(slots[95].label, "23:45");
    assert_eq!(slots[95].hour, 23);
    assert_eq!(slots[95].minute, 45);
}

#[test]
fn slots_tile_the_day_contiguously() {
    for granularity in [1, 5, 10, 15, 20, 30, 60, 90, 120, 1440] {
        let slots: Vec<TimeSlot> = generate_slots(granularity).unwrap().collect();
        assert_eq!(slots.len() as u32, 1440 / granularity);
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(slot.minute_of_day(), i as u32 * granularity);
        }
        let last = slots.last().unwrap();
        assert_eq!(last.minute_of_day() + granularity, 1440);
    }
}

#[test]
fn slot_start_matches_hour_and_minute() {
    for slot in generate_slots(30).unwrap() {
        assert_eq!(
            slot.start,
            NaiveTime::from_hms_opt(slot.hour, slot.minute, 0).unwrap()
        );
    }
}

#[test]
fn sequence_is_restartable_by_cloning() {
    let slots = generate_slots(60).unwrap();
    let first: Vec<TimeSlot> = slots.clone().collect();
    let second: Vec<TimeSlot> = slots.collect();
    assert_eq!(first, second);
}

#[test]
fn granularity_must_divide_the_day() {
    for bad in [0, 7, 25, 1441, 2880] {
        let err = generate_slots(bad).unwrap_err();
        assert!(
            matches!(err, EngineError::Configuration(_)),
            "granularity {} should be rejected, got {:?}",
            bad,
            err
        );
    }
}

#[test]
fn slot_at_rounds_down_to_containing_slot() {
    let t = NaiveTime::from_hms_opt(9, 44, 30).unwrap();
    let slot = slot_at(15, t).unwrap();
    assert_eq!(slot.label, "09:30");

    let exact = slot_at(15, NaiveTime::from_hms_opt(9, 45, 0).unwrap()).unwrap();
    assert_eq!(exact.label, "09:45");

    assert!(slot_at(7, t).is_err());
}
