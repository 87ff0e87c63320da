//! JSON documents exchanged with the appointment data service.
//!
//! Appointment records arrive with string timestamps that may carry an offset.
//! Converting a document yields engine values in calendar-local time. Records
//! that cannot be parsed are set aside as skipped, like any other invalid
//! interval.

use chrono::Weekday;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::appointment::{AppointmentInterval, AppointmentStatus, IntervalError};
use crate::error::{EngineError, Result};
use crate::hours::WorkingHourRule;
use crate::layout::SkippedAppointment;
use crate::slots::validate_granularity;
use crate::zone;

/// Caller parameters bundled for front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub granularity_minutes: u32,
    /// IANA timezone of the calendar. Absent means timestamps are already local.
    pub timezone: Option<String>,
    pub first_day_of_week: Weekday,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            granularity_minutes: 15,
            timezone: None,
            first_day_of_week: Weekday::Mon,
        }
    }
}

impl EngineConfig {
    /// Check the granularity and timezone, returning the parsed timezone.
    pub fn validate(&self) -> Result<Option<Tz>> {
        validate_granularity(self.granularity_minutes)?;
        self.timezone.as_deref().map(zone::parse_timezone).transpose()
    }
}

/// An appointment as stored by the data service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: String,
    pub start: String,
    pub end: String,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub resource: Option<String>,
}

impl AppointmentRecord {
    /// Convert to calendar-local wall time. Structural validation is left to
    /// the layout pass.
    pub fn to_interval(
        &self,
        tz: Option<&Tz>,
    ) -> std::result::Result<AppointmentInterval, IntervalError> {
        let parse = |raw: &str| {
            zone::parse_instant(raw, tz).map_err(|e| IntervalError::Unparseable {
                detail: e.to_string(),
            })
        };
        let start = parse(&self.start)?;
        let end = parse(&self.end)?;

        Ok(AppointmentInterval {
            id: self.id.clone(),
            start,
            end,
            duration_minutes: self.duration_minutes,
            status: self
                .status
                .clone()
                .map(AppointmentStatus::from)
                .unwrap_or_default(),
            subject: self.subject.clone(),
            resource: self.resource.clone(),
        })
    }
}

/// Appointments converted from records, plus the records that could not be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAppointments {
    pub appointments: Vec<AppointmentInterval>,
    pub rejected: Vec<SkippedAppointment>,
}

/// Everything needed to lay out and classify a calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub rules: Vec<WorkingHourRule>,
    #[serde(default)]
    pub appointments: Vec<AppointmentRecord>,
}

impl ScheduleDocument {
    /// # Errors
    /// Returns `EngineError::InvalidDocument` if the JSON does not match the schema.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| EngineError::InvalidDocument(e.to_string()))
    }

    /// Convert every appointment record into calendar-local time.
    ///
    /// # Errors
    /// Fails only on an invalid configured timezone. Unparseable records are
    /// returned in [`ResolvedAppointments::rejected`].
    pub fn resolve_appointments(&self) -> Result<ResolvedAppointments> {
        let tz = self
            .config
            .timezone
            .as_deref()
            .map(zone::parse_timezone)
            .transpose()?;

        Ok(resolve_records(&self.appointments, tz.as_ref()))
    }
}

/// Convert appointment records one at a time, setting aside the ones whose
/// timestamps cannot be read.
pub fn resolve_records(records: &[AppointmentRecord], tz: Option<&Tz>) -> ResolvedAppointments {
    let mut resolved = ResolvedAppointments::default();
    for record in records {
        match record.to_interval(tz) {
            Ok(interval) => resolved.appointments.push(interval),
            Err(reason) => {
                warn!(appointment = %record.id, %reason, "rejecting appointment record");
                resolved.rejected.push(SkippedAppointment {
                    appointment_id: record.id.clone(),
                    reason,
                });
            }
        }
    }
    resolved
}
