//! Column packing for concurrent appointments.
//!
//! Appointments are placed greedily in start order into the first column whose
//! previous occupant has already ended. This is interval-graph colouring by
//! earliest start, so the number of columns opened equals the peak number of
//! appointments in progress at any single instant.
//!
//! Malformed appointments are rejected individually and reported on the
//! outcome. One bad record never blanks the rest of the day.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::appointment::{AppointmentInterval, IntervalError};
use crate::error::{EngineError, Result};

/// Column placement of one appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutAssignment {
    pub appointment_id: String,
    /// 0-based column index.
    pub column: usize,
    /// Columns needed for the whole date. Identical across one outcome.
    pub total_columns: usize,
}

/// An appointment left out of the layout, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAppointment {
    pub appointment_id: String,
    pub reason: IntervalError,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    /// One entry per accepted appointment, in input order.
    pub assignments: Vec<LayoutAssignment>,
    /// Rejected appointments, in input order.
    pub skipped: Vec<SkippedAppointment>,
    /// Columns needed to render the date; at least 1.
    pub total_columns: usize,
}

impl LayoutOutcome {
    pub fn assignment(&self, appointment_id: &str) -> Option<&LayoutAssignment> {
        self.assignments
            .iter()
            .find(|a| a.appointment_id == appointment_id)
    }

    pub fn column_of(&self, appointment_id: &str) -> Option<usize> {
        self.assignment(appointment_id).map(|a| a.column)
    }

    pub fn skipped_ids(&self) -> Vec<&str> {
        self.skipped
            .iter()
            .map(|s| s.appointment_id.as_str())
            .collect()
    }

    /// Fail on the first skipped appointment, for callers that treat any
    /// invalid interval as fatal.
    pub fn ensure_complete(&self) -> Result<()> {
        match self.skipped.first() {
            Some(skipped) => Err(skipped.clone().into()),
            None => Ok(()),
        }
    }
}

impl From<SkippedAppointment> for EngineError {
    fn from(skipped: SkippedAppointment) -> Self {
        EngineError::InvalidInterval {
            id: skipped.appointment_id,
            reason: skipped.reason,
        }
    }
}

/// Assign a column to every appointment of one date.
///
/// Appointments are sorted by start time; equal starts keep their input order.
/// Each is placed in the lowest-indexed column whose last end time is `<=` its
/// start, or in a new column when none has freed up. Appointments failing
/// [`AppointmentInterval::validate`] are excluded and listed in
/// [`LayoutOutcome::skipped`].
///
/// The input is expected to hold a single date. Mixed dates still receive a
/// collision-free layout, but `total_columns` then spans all of them; use
/// [`compute_layout_by_date`] for multi-day views.
pub fn compute_layout(appointments: &[AppointmentInterval]) -> LayoutOutcome {
    let refs: Vec<&AppointmentInterval> = appointments.iter().collect();
    layout_refs(&refs)
}

/// Group appointments by start date and lay out each date independently.
pub fn compute_layout_by_date(
    appointments: &[AppointmentInterval],
) -> BTreeMap<NaiveDate, LayoutOutcome> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&AppointmentInterval>> = BTreeMap::new();
    for appt in appointments {
        by_date.entry(appt.date()).or_default().push(appt);
    }

    by_date
        .into_iter()
        .map(|(date, appts)| (date, layout_refs(&appts)))
        .collect()
}

/// Maximum number of valid appointments in progress at any single instant.
///
/// Invalid intervals are ignored. An appointment ending at `T` and one starting
/// at `T` are not concurrent.
pub fn peak_concurrency(appointments: &[AppointmentInterval]) -> usize {
    let mut edges: Vec<(NaiveDateTime, i32)> = appointments
        .iter()
        .filter(|a| a.validate().is_ok())
        .flat_map(|a| [(a.start, 1), (a.end, -1)])
        .collect();

    // Ends (-1) sort before starts (+1) at the same instant.
    edges.sort();

    let mut current: i32 = 0;
    let mut peak: i32 = 0;
    for (_, delta) in edges {
        current += delta;
        peak = peak.max(current);
    }
    peak as usize
}

fn layout_refs(appointments: &[&AppointmentInterval]) -> LayoutOutcome {
    let mut skipped = Vec::new();
    let mut accepted: Vec<usize> = Vec::with_capacity(appointments.len());

    for (index, appt) in appointments.iter().enumerate() {
        match appt.validate() {
            Ok(()) => accepted.push(index),
            Err(reason) => {
                warn!(appointment = %appt.id, %reason, "skipping appointment from layout");
                skipped.push(SkippedAppointment {
                    appointment_id: appt.id.clone(),
                    reason,
                });
            }
        }
    }

    // Stable sort: equal starts keep input order.
    let mut order = accepted.clone();
    order.sort_by_key(|&index| appointments[index].start);

    let mut column_ends: Vec<NaiveDateTime> = Vec::new();
    let mut columns: Vec<Option<usize>> = vec![None; appointments.len()];

    for index in order {
        let appt = appointments[index];
        let column = match column_ends.iter().position(|end| *end <= appt.start) {
            Some(free) => {
                column_ends[free] = appt.end;
                free
            }
            None => {
                column_ends.push(appt.end);
                column_ends.len() - 1
            }
        };
        columns[index] = Some(column);
    }

    let total_columns = column_ends.len().max(1);

    let assignments: Vec<LayoutAssignment> = accepted
        .iter()
        .filter_map(|&index| {
            columns[index].map(|column| LayoutAssignment {
                appointment_id: appointments[index].id.clone(),
                column,
                total_columns,
            })
        })
        .collect();

    debug!(
        placed = assignments.len(),
        skipped = skipped.len(),
        total_columns,
        "computed appointment layout"
    );

    LayoutOutcome {
        assignments,
        skipped,
        total_columns,
    }
}
