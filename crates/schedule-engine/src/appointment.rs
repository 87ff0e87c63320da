//! Appointment intervals as seen by the layout and classification passes.
//!
//! Appointments are created and edited by the booking service. The engine only
//! reads them, and treats each as an immutable value for one computation.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Booking status. Passed through untouched; layout and classification ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    /// Any status string the data service sends that is not recognised.
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::InProgress => "InProgress",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
            AppointmentStatus::NoShow => "NoShow",
            AppointmentStatus::Other(raw) => raw,
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = std::convert::Infallible;

    /// Lenient parse: case, spaces, hyphens and underscores are ignored.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        Ok(match key.as_str() {
            "scheduled" | "booked" => AppointmentStatus::Scheduled,
            "confirmed" => AppointmentStatus::Confirmed,
            "inprogress" => AppointmentStatus::InProgress,
            "completed" | "done" => AppointmentStatus::Completed,
            "cancelled" | "canceled" => AppointmentStatus::Cancelled,
            "noshow" => AppointmentStatus::NoShow,
            _ => AppointmentStatus::Other(raw.to_string()),
        })
    }
}

impl From<String> for AppointmentStatus {
    fn from(raw: String) -> Self {
        match raw.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an appointment was rejected from layout.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntervalError {
    #[error("end is not after start")]
    EndNotAfterStart,

    #[error("interval spans more than one calendar date")]
    SpansMultipleDates,

    #[error("declared duration of {declared} minutes does not match {actual} minutes between start and end")]
    DurationMismatch { declared: i64, actual: i64 },

    #[error("unparseable timestamp: {detail}")]
    Unparseable { detail: String },
}

/// One scheduled appointment occupying the half-open range `[start, end)`.
///
/// Instants are calendar-local wall time; see [`crate::zone`] for converting
/// absolute timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentInterval {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Duration as recorded by the booking service. Must equal `end - start` when present.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub status: AppointmentStatus,
    /// Display name of the person booked (e.g. patient).
    #[serde(default)]
    pub subject: Option<String>,
    /// Display name of the assigned resource (e.g. physician or room).
    #[serde(default)]
    pub resource: Option<String>,
}

impl AppointmentInterval {
    pub fn new(id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            duration_minutes: None,
            status: AppointmentStatus::default(),
            subject: None,
            resource: None,
        }
    }

    pub fn with_status(mut self, status: AppointmentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_duration_minutes(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Calendar date the appointment belongs to.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `instant` lies in `[start, end)`.
    pub fn covers(&self, instant: NaiveDateTime) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether two appointments share any instant. Touching end-to-start is not an overlap.
    pub fn overlaps(&self, other: &AppointmentInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Check that the interval is non-empty, confined to one calendar date and
    /// consistent with its declared duration.
    ///
    /// An interval ending exactly at the following midnight still belongs to
    /// its start date.
    pub fn validate(&self) -> Result<(), IntervalError> {
        if self.end <= self.start {
            return Err(IntervalError::EndNotAfterStart);
        }

        let start_date = self.start.date();
        let ends_at_next_midnight =
            self.end.time() == NaiveTime::MIN && start_date.succ_opt() == Some(self.end.date());
        if self.end.date() != start_date && !ends_at_next_midnight {
            return Err(IntervalError::SpansMultipleDates);
        }

        if let Some(declared) = self.duration_minutes {
            if self.duration() != Duration::minutes(declared) {
                return Err(IntervalError::DurationMismatch {
                    declared,
                    actual: self.duration().num_minutes(),
                });
            }
        }

        Ok(())
    }
}
