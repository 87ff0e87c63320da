//! WASM bindings for schedule-engine.
//!
//! Exposes the slot grid, working-hours check, column layout and slot
//! classification to the JavaScript calendar views via `wasm-bindgen`. All
//! complex types are passed as JSON strings.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p schedule-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/schedule_engine_wasm.wasm
//! ```
//!
//! The rendering layer wires its callbacks from the returned states:
//! `onSlotDoubleClick` only for `bookingIntent == "Book"`, the elapsed-slot
//! confirmation only for `"ConfirmElapsed"`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use schedule_engine::document::{resolve_records, AppointmentRecord, ResolvedAppointments};
use schedule_engine::{
    BookingIntent, ClassifiedSlot, SlotState, TimeSlot, WorkingHourRule,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimeSlotDto {
    hour: u32,
    minute: u32,
    label: String,
}

impl From<&TimeSlot> for TimeSlotDto {
    fn from(s: &TimeSlot) -> Self {
        Self {
            hour: s.hour,
            minute: s.minute,
            label: s.label.clone(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AssignmentDto {
    appointment_id: String,
    column: usize,
    total_columns: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutDto {
    assignments: Vec<AssignmentDto>,
    skipped_ids: Vec<String>,
    total_columns: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifiedSlotDto {
    date: String,
    hour: u32,
    minute: u32,
    label: String,
    state: SlotState,
    booking_intent: Option<BookingIntent>,
}

impl From<&ClassifiedSlot> for ClassifiedSlotDto {
    fn from(c: &ClassifiedSlot) -> Self {
        Self {
            date: c.date.to_string(),
            hour: c.hour,
            minute: c.minute,
            label: c.label.clone(),
            state: c.state,
            booking_intent: c.booking_intent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers: parse boundary values
// ---------------------------------------------------------------------------

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date '{}': {}", s, e)))
}

fn parse_time(s: &str) -> Result<NaiveTime, JsValue> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .map_err(|e| JsValue::from_str(&format!("Invalid time '{}': {}", s, e)))
}

/// Parse a timestamp into calendar-local time, converting through `timezone` when given.
fn parse_instant(s: &str, timezone: Option<&str>) -> Result<NaiveDateTime, JsValue> {
    let tz = timezone
        .map(schedule_engine::zone::parse_timezone)
        .transpose()
        .map_err(js_err)?;
    schedule_engine::zone::parse_instant(s, tz.as_ref()).map_err(js_err)
}

fn parse_rules_json(json: &str) -> Result<Vec<WorkingHourRule>, JsValue> {
    serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid rules JSON: {}", e)))
}

/// Convert a JSON array of appointment records into intervals.
///
/// Records with unparseable timestamps are set aside in
/// [`ResolvedAppointments::rejected`] instead of failing the call.
fn parse_appointments_json(
    json: &str,
    timezone: Option<&str>,
) -> Result<ResolvedAppointments, JsValue> {
    let records: Vec<AppointmentRecord> = serde_json::from_str(json)
        .map_err(|e| JsValue::from_str(&format!("Invalid appointments JSON: {}", e)))?;
    let tz = timezone
        .map(schedule_engine::zone::parse_timezone)
        .transpose()
        .map_err(js_err)?;

    Ok(resolve_records(&records, tz.as_ref()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Generate the slot grid of a day.
///
/// Returns a JSON array of `{hour, minute, label}` objects.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(granularity_minutes: u32) -> Result<String, JsValue> {
    let slots = schedule_engine::generate_slots(granularity_minutes).map_err(js_err)?;
    let dtos: Vec<TimeSlotDto> = slots.map(|s| TimeSlotDto::from(&s)).collect();
    to_json(&dtos)
}

/// Whether `time` (`HH:MM`) on `date` (`YYYY-MM-DD`) is within business hours.
///
/// `rules_json` is a JSON array of working-hour rules.
#[wasm_bindgen(js_name = "isWithinHours")]
pub fn is_within_hours(date: &str, time: &str, rules_json: &str) -> Result<bool, JsValue> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    let rules = parse_rules_json(rules_json)?;
    Ok(schedule_engine::is_within_hours(date, time, &rules))
}

/// Compute the column layout of one date's appointments.
///
/// Returns `{assignments: [{appointmentId, column, totalColumns}], skippedIds, totalColumns}`.
#[wasm_bindgen(js_name = "computeLayout")]
pub fn compute_layout(
    appointments_json: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let resolved = parse_appointments_json(appointments_json, timezone.as_deref())?;
    let outcome = schedule_engine::compute_layout(&resolved.appointments);

    let dto = LayoutDto {
        assignments: outcome
            .assignments
            .iter()
            .map(|a| AssignmentDto {
                appointment_id: a.appointment_id.clone(),
                column: a.column,
                total_columns: a.total_columns,
            })
            .collect(),
        skipped_ids: resolved
            .rejected
            .iter()
            .chain(&outcome.skipped)
            .map(|s| s.appointment_id.clone())
            .collect(),
        total_columns: outcome.total_columns,
    };
    to_json(&dto)
}

/// Classify one slot. Returns the state name, e.g. `"ElapsedAvailable"`.
#[wasm_bindgen(js_name = "classifySlot")]
pub fn classify_slot(
    date: &str,
    time: &str,
    granularity_minutes: u32,
    rules_json: &str,
    appointments_json: &str,
    now: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let date = parse_date(date)?;
    let slot = schedule_engine::slot_at(granularity_minutes, parse_time(time)?).map_err(js_err)?;
    let rules = parse_rules_json(rules_json)?;
    let appointments =
        parse_appointments_json(appointments_json, timezone.as_deref())?.appointments;
    let now = parse_instant(now, timezone.as_deref())?;

    let state = schedule_engine::classify_slot(date, &slot, &rules, &appointments, now);
    Ok(format!("{:?}", state))
}

/// Classify every slot of a date.
///
/// Returns a JSON array of `{date, hour, minute, label, state, bookingIntent}`.
#[wasm_bindgen(js_name = "classifyDay")]
pub fn classify_day(
    date: &str,
    granularity_minutes: u32,
    rules_json: &str,
    appointments_json: &str,
    now: &str,
    timezone: Option<String>,
) -> Result<String, JsValue> {
    let date = parse_date(date)?;
    let slots = schedule_engine::generate_slots(granularity_minutes).map_err(js_err)?;
    let rules = parse_rules_json(rules_json)?;
    let appointments =
        parse_appointments_json(appointments_json, timezone.as_deref())?.appointments;
    let now = parse_instant(now, timezone.as_deref())?;

    let classified = schedule_engine::classify_day(date, slots, &rules, &appointments, now);
    let dtos: Vec<ClassifiedSlotDto> = classified.iter().map(ClassifiedSlotDto::from).collect();
    to_json(&dtos)
}
