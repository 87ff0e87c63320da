//! Fixed-granularity slot grid covering one day.
//!
//! A day is cut into `1440 / granularity` equal slots starting at 00:00. The
//! grid is produced lazily by [`TimeSlots`]; clone the iterator to restart it.

use std::iter::FusedIterator;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// One quantized unit of the day's grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Time of day at which the slot begins.
    pub start: NaiveTime,
    pub hour: u32,
    pub minute: u32,
    /// `HH:MM` display label.
    pub label: String,
}

impl TimeSlot {
    fn from_minute_of_day(minute_of_day: u32) -> Self {
        let start = NaiveTime::MIN + Duration::minutes(i64::from(minute_of_day));
        let hour = minute_of_day / 60;
        let minute = minute_of_day % 60;
        Self {
            start,
            hour,
            minute,
            label: format!("{:02}:{:02}", hour, minute),
        }
    }

    /// Minutes elapsed since midnight at the start of this slot.
    pub fn minute_of_day(&self) -> u32 {
        self.hour * 60 + self.minute
    }
}

/// Lazy, finite sequence of the slots of one day.
#[derive(Debug, Clone)]
pub struct TimeSlots {
    granularity: u32,
    next: u32,
}

impl TimeSlots {
    /// Width of each slot in minutes.
    pub fn granularity(&self) -> u32 {
        self.granularity
    }
}

impl Iterator for TimeSlots {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<TimeSlot> {
        if self.next >= MINUTES_PER_DAY {
            return None;
        }
        let slot = TimeSlot::from_minute_of_day(self.next);
        self.next += self.granularity;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (MINUTES_PER_DAY.saturating_sub(self.next) / self.granularity) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TimeSlots {}

impl FusedIterator for TimeSlots {}

/// Generate the slot grid for a day at the given granularity.
///
/// # Errors
/// Returns `EngineError::Configuration` if `granularity_minutes` is zero or does
/// not evenly divide the 1440 minutes of a day.
pub fn generate_slots(granularity_minutes: u32) -> Result<TimeSlots> {
    validate_granularity(granularity_minutes)?;
    Ok(TimeSlots {
        granularity: granularity_minutes,
        next: 0,
    })
}

/// Return the slot of the given granularity that contains `time`.
///
/// # Errors
/// Same as [`generate_slots`].
pub fn slot_at(granularity_minutes: u32, time: NaiveTime) -> Result<TimeSlot> {
    validate_granularity(granularity_minutes)?;
    let minute = minute_of_day(time);
    Ok(TimeSlot::from_minute_of_day(
        minute - minute % granularity_minutes,
    ))
}

pub(crate) fn validate_granularity(granularity_minutes: u32) -> Result<()> {
    if granularity_minutes == 0 || MINUTES_PER_DAY % granularity_minutes != 0 {
        return Err(EngineError::Configuration(format!(
            "slot granularity of {} minutes does not evenly divide a day",
            granularity_minutes
        )));
    }
    Ok(())
}

/// Minutes since midnight, ignoring seconds.
pub(crate) fn minute_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}
