//! Projection of engine output onto day, week and month presentations.
//!
//! Only the arithmetic lives here: minute and row offsets, column fractions,
//! and the dates a week or month grid shows. Pixels, colours and widgets
//! belong to the renderer.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::appointment::AppointmentInterval;
use crate::error::Result;
use crate::layout::{LayoutAssignment, LayoutOutcome};
use crate::slots::{minute_of_day, validate_granularity, MINUTES_PER_DAY};

/// Placement of one appointment within a day column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayBlock {
    pub appointment_id: String,
    /// Minutes from midnight to the appointment start.
    pub offset_minutes: u32,
    pub span_minutes: u32,
    /// Index of the slot row the block starts in.
    pub first_row: u32,
    /// Number of slot rows the block touches, at least 1.
    pub row_span: u32,
    pub column: usize,
    pub total_columns: usize,
}

impl DayBlock {
    /// Horizontal start as a fraction of the day column width.
    pub fn left_fraction(&self) -> f64 {
        self.column as f64 / self.total_columns as f64
    }

    /// Width as a fraction of the day column width.
    pub fn width_fraction(&self) -> f64 {
        1.0 / self.total_columns as f64
    }
}

/// Project a layout outcome onto slot rows of the given granularity.
///
/// Appointments without an assignment in `outcome` (skipped or from another
/// date) produce no block. Blocks come back in input order.
///
/// # Errors
/// Returns `EngineError::Configuration` for a granularity that does not tile a day.
pub fn project_day(
    appointments: &[AppointmentInterval],
    outcome: &LayoutOutcome,
    granularity_minutes: u32,
) -> Result<Vec<DayBlock>> {
    validate_granularity(granularity_minutes)?;

    let by_id: HashMap<&str, &LayoutAssignment> = outcome
        .assignments
        .iter()
        .map(|a| (a.appointment_id.as_str(), a))
        .collect();

    let blocks = appointments
        .iter()
        .filter(|appt| appt.validate().is_ok())
        .filter_map(|appt| {
            let assignment = by_id.get(appt.id.as_str())?;
            let offset = minute_of_day(appt.start.time());
            let end = if appt.end.date() > appt.start.date() {
                MINUTES_PER_DAY
            } else {
                minute_of_day(appt.end.time())
            };
            let span = end.saturating_sub(offset);
            let first_row = offset / granularity_minutes;
            let last_row = end.div_ceil(granularity_minutes);
            Some(DayBlock {
                appointment_id: appt.id.clone(),
                offset_minutes: offset,
                span_minutes: span,
                first_row,
                row_span: last_row.saturating_sub(first_row).max(1),
                column: assignment.column,
                total_columns: assignment.total_columns,
            })
        })
        .collect();

    Ok(blocks)
}

/// Minutes from midnight of `date` to `now`, when `now` falls on `date`.
///
/// Positions the current-time indicator in day and week views.
pub fn now_offset(date: NaiveDate, now: NaiveDateTime) -> Option<u32> {
    (now.date() == date).then(|| minute_of_day(now.time()))
}

/// First day of the week containing `date`.
pub fn week_start(date: NaiveDate, first_day: Weekday) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    let offset = (weekday + 7 - first_day.num_days_from_monday()) % 7;
    date - Duration::days(i64::from(offset))
}

/// The seven dates of the week containing `date`.
pub fn week_dates(date: NaiveDate, first_day: Weekday) -> Vec<NaiveDate> {
    let start = week_start(date, first_day);
    (0..7).map(|i| start + Duration::days(i)).collect()
}

/// The 6×7 grid of dates a month view shows for the month containing `date`,
/// starting on the week that contains the 1st.
pub fn month_grid(date: NaiveDate, first_day: Weekday) -> Vec<NaiveDate> {
    let first_of_month = date - Duration::days(i64::from(date.day0()));
    let start = week_start(first_of_month, first_day);
    (0..42).map(|i| start + Duration::days(i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_start_respects_first_day() {
        // Wednesday 2026-03-18
        let date = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        assert_eq!(
            week_start(date, Weekday::Mon),
            NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
        );
        assert_eq!(
            week_start(date, Weekday::Sun),
            NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
        );
    }

    #[test]
    fn week_start_of_first_day_is_itself() {
        let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
        assert_eq!(week_start(monday, Weekday::Mon), monday);
    }
}
