//! Calendar-local wall time.
//!
//! The engine compares instants against slot times of day, so everything is
//! normalised to the calendar's wall clock before it reaches layout or
//! classification. Absolute timestamps from the data service are converted
//! through `chrono-tz`.

use chrono::{DateTime, NaiveDateTime, Utc};
pub use chrono_tz::Tz;

use crate::error::{EngineError, Result};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse an IANA timezone name (e.g. `"Europe/Madrid"`).
///
/// # Errors
/// Returns `EngineError::InvalidTimezone` for unknown names.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| EngineError::InvalidTimezone(name.to_string()))
}

/// Wall-clock time of `instant` in `tz`.
pub fn to_local(instant: DateTime<Utc>, tz: &Tz) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Parse a timestamp into calendar-local wall time.
///
/// RFC 3339 strings carry their own offset and are converted into `tz`; when no
/// timezone is given they keep the wall time of their own offset. Naive strings
/// (`YYYY-MM-DDTHH:MM[:SS]`, `T` or space separated) are taken as already local.
///
/// # Errors
/// Returns `EngineError::InvalidDateTime` if no accepted format matches.
pub fn parse_instant(raw: &str, tz: Option<&Tz>) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(match tz {
            Some(tz) => to_local(dt.with_timezone(&Utc), tz),
            None => dt.naive_local(),
        });
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| EngineError::InvalidDateTime(raw.to_string()))
}
