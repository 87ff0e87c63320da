//! Per-slot interaction state.
//!
//! Classification combines business hours, appointment coverage and the
//! caller's "now". The state decides which booking callback, if any, a slot
//! may fire. The engine itself performs no side effects.

use std::borrow::Borrow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::appointment::AppointmentInterval;
use crate::hours::{is_within_hours, resolve_hours, OpenWindow, WorkingHourRule};
use crate::slots::TimeSlot;

/// Interaction state of one (date, slot) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotState {
    /// Outside business hours. Never bookable, whatever covers it.
    OutsideHours,
    /// Within hours, in the future, nothing booked.
    Available,
    /// Within hours, in the future, covered by at least one appointment.
    Occupied,
    /// Within hours, already past, nothing booked. Bookable after confirmation.
    ElapsedAvailable,
    /// Within hours, already past, covered by at least one appointment.
    ElapsedOccupied,
}

/// What activating a slot is allowed to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingIntent {
    /// Start the new-booking flow directly.
    Book,
    /// Ask for explicit confirmation first; the slot is in the past.
    ConfirmElapsed,
}

impl SlotState {
    pub const ALL: [SlotState; 5] = [
        SlotState::OutsideHours,
        SlotState::Available,
        SlotState::Occupied,
        SlotState::ElapsedAvailable,
        SlotState::ElapsedOccupied,
    ];

    pub fn is_occupied(self) -> bool {
        matches!(self, SlotState::Occupied | SlotState::ElapsedOccupied)
    }

    pub fn is_elapsed(self) -> bool {
        matches!(self, SlotState::ElapsedAvailable | SlotState::ElapsedOccupied)
    }

    /// The booking flow this state may trigger. Only free slots within hours book.
    pub fn booking_intent(self) -> Option<BookingIntent> {
        match self {
            SlotState::Available => Some(BookingIntent::Book),
            SlotState::ElapsedAvailable => Some(BookingIntent::ConfirmElapsed),
            SlotState::OutsideHours | SlotState::Occupied | SlotState::ElapsedOccupied => None,
        }
    }
}

/// A classified slot with the payload booking callbacks receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedSlot {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub hour: u32,
    pub minute: u32,
    pub label: String,
    pub state: SlotState,
}

impl ClassifiedSlot {
    pub fn instant(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn booking_intent(&self) -> Option<BookingIntent> {
        self.state.booking_intent()
    }
}

/// Classify one slot of `date`.
///
/// Evaluated in order:
/// 1. outside business hours → `OutsideHours`
/// 2. covered by an appointment's `[start, end)` → `ElapsedOccupied` if before
///    `now`, else `Occupied`
/// 3. otherwise → `ElapsedAvailable` if before `now`, else `Available`
pub fn classify_slot(
    date: NaiveDate,
    slot: &TimeSlot,
    rules: &[WorkingHourRule],
    appointments: &[AppointmentInterval],
    now: NaiveDateTime,
) -> SlotState {
    if !is_within_hours(date, slot.start, rules) {
        return SlotState::OutsideHours;
    }
    state_within_hours(date.and_time(slot.start), appointments, now)
}

/// Classify every slot of `date`, resolving working hours once.
pub fn classify_day<I>(
    date: NaiveDate,
    slots: I,
    rules: &[WorkingHourRule],
    appointments: &[AppointmentInterval],
    now: NaiveDateTime,
) -> Vec<ClassifiedSlot>
where
    I: IntoIterator,
    I::Item: Borrow<TimeSlot>,
{
    let window = resolve_hours(date, rules);
    let classified: Vec<ClassifiedSlot> = slots
        .into_iter()
        .map(|slot| {
            let slot: &TimeSlot = slot.borrow();
            ClassifiedSlot {
                date,
                time: slot.start,
                hour: slot.hour,
                minute: slot.minute,
                label: slot.label.clone(),
                state: state_in_window(window, date, slot, appointments, now),
            }
        })
        .collect();

    debug!(
        %date,
        %now,
        slots = classified.len(),
        open = window.is_some(),
        "classified day"
    );
    classified
}

fn state_in_window(
    window: Option<OpenWindow>,
    date: NaiveDate,
    slot: &TimeSlot,
    appointments: &[AppointmentInterval],
    now: NaiveDateTime,
) -> SlotState {
    match window {
        Some(window) if window.contains_time(slot.start) => {
            state_within_hours(date.and_time(slot.start), appointments, now)
        }
        _ => SlotState::OutsideHours,
    }
}

fn state_within_hours(
    instant: NaiveDateTime,
    appointments: &[AppointmentInterval],
    now: NaiveDateTime,
) -> SlotState {
    let covered = appointments.iter().any(|appt| appt.covers(instant));
    let elapsed = instant < now;
    match (covered, elapsed) {
        (true, true) => SlotState::ElapsedOccupied,
        (true, false) => SlotState::Occupied,
        (false, true) => SlotState::ElapsedAvailable,
        (false, false) => SlotState::Available,
    }
}
