//! Weekly working-hour rules and the open/closed resolver.
//!
//! Rules come from an external hours-management service as loosely typed
//! records: weekday names, `HH:MM` strings and `Y`/`N` flags. Resolution never
//! fails. Anything missing or malformed makes the weekday closed, so slot
//! classification stays total.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::slots::{minute_of_day, MINUTES_PER_DAY};

/// A recurring weekly availability window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHourRule {
    /// Weekday name (`"Monday"`, `"mon"`) or number (1 = Monday .. 7 = Sunday, 0 = Sunday).
    pub weekday: String,
    /// Opening time, `HH:MM` or `HH:MM:SS`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Closing time, exclusive. `24:00` closes at midnight.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Accepts `"Y"`/`"N"` or a boolean.
    #[serde(deserialize_with = "deserialize_flag")]
    pub active: bool,
    /// An active holiday rule closes the weekday.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub holiday: bool,
}

impl WorkingHourRule {
    pub fn new(weekday: impl Into<String>, start_time: &str, end_time: &str, active: bool) -> Self {
        Self {
            weekday: weekday.into(),
            start_time: Some(start_time.to_string()),
            end_time: Some(end_time.to_string()),
            active,
            holiday: false,
        }
    }

    pub fn with_holiday(mut self, holiday: bool) -> Self {
        self.holiday = holiday;
        self
    }

    /// The weekday this rule applies to, if the identifier is recognised.
    pub fn weekday(&self) -> Option<Weekday> {
        parse_weekday(&self.weekday)
    }
}

/// The resolved half-open business-hours window `[open, close)` of one date,
/// in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenWindow {
    pub open_minute: u32,
    pub close_minute: u32,
}

impl OpenWindow {
    /// Whether `minute_of_day` falls inside the window. The closing minute is excluded.
    pub fn contains(&self, minute_of_day: u32) -> bool {
        self.open_minute <= minute_of_day && minute_of_day < self.close_minute
    }

    pub fn contains_time(&self, time: NaiveTime) -> bool {
        self.contains(minute_of_day(time))
    }

    pub fn duration_minutes(&self) -> u32 {
        self.close_minute - self.open_minute
    }
}

/// Resolve the business-hours window for `date`.
///
/// Selects the first active rule whose weekday matches `date`. Returns `None`
/// (closed all day) when no such rule exists, when it is flagged as a holiday,
/// or when its start/end times are missing, unparseable or not ordered.
pub fn resolve_hours(date: NaiveDate, rules: &[WorkingHourRule]) -> Option<OpenWindow> {
    let weekday = date.weekday();
    let mut matching = rules
        .iter()
        .filter(|rule| rule.active && rule.weekday() == Some(weekday));

    let Some(rule) = matching.next() else {
        debug!(%date, ?weekday, "no active working-hour rule, closed");
        return None;
    };

    let duplicates = matching.count();
    if duplicates > 0 {
        warn!(
            ?weekday,
            duplicates, "multiple active working-hour rules for weekday, using the first"
        );
    }

    if rule.holiday {
        debug!(%date, ?weekday, "holiday rule, closed");
        return None;
    }

    let open = rule.start_time.as_deref().and_then(parse_time_of_day);
    let close = rule.end_time.as_deref().and_then(parse_time_of_day);
    match (open, close) {
        (Some(open_minute), Some(close_minute)) if open_minute < close_minute => Some(OpenWindow {
            open_minute,
            close_minute,
        }),
        _ => {
            debug!(
                ?weekday,
                start = ?rule.start_time,
                end = ?rule.end_time,
                "malformed working-hour rule, closed"
            );
            None
        }
    }
}

/// Whether `time` on `date` falls inside business hours.
///
/// A time exactly at the closing boundary is outside.
pub fn is_within_hours(date: NaiveDate, time: NaiveTime, rules: &[WorkingHourRule]) -> bool {
    resolve_hours(date, rules).is_some_and(|window| window.contains_time(time))
}

/// Parse a weekday identifier: English name or three-letter abbreviation in
/// any case, or a number where 1..=7 is Monday..Sunday and 0 is Sunday.
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" | "1" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" | "2" => Some(Weekday::Tue),
        "wednesday" | "wed" | "3" => Some(Weekday::Wed),
        "thursday" | "thu" | "thur" | "thurs" | "4" => Some(Weekday::Thu),
        "friday" | "fri" | "5" => Some(Weekday::Fri),
        "saturday" | "sat" | "6" => Some(Weekday::Sat),
        "sunday" | "sun" | "7" | "0" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Parse `HH:MM` or `HH:MM:SS` into minutes since midnight. `24:00` maps to 1440.
pub fn parse_time_of_day(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw == "24:00" || raw == "24:00:00" {
        return Some(MINUTES_PER_DAY);
    }
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
        .map(minute_of_day)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" | "" => Some(false),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Text(String),
}

fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match FlagRepr::deserialize(deserializer)? {
        FlagRepr::Bool(flag) => Ok(flag),
        FlagRepr::Text(text) => parse_flag(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid Y/N flag '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_of_day_formats() {
        assert_eq!(parse_time_of_day("09:00"), Some(540));
        assert_eq!(parse_time_of_day("17:30:00"), Some(1050));
        assert_eq!(parse_time_of_day(" 08:15 "), Some(495));
        assert_eq!(parse_time_of_day("24:00"), Some(1440));
        assert_eq!(parse_time_of_day("25:00"), None);
        assert_eq!(parse_time_of_day("nine"), None);
        assert_eq!(parse_time_of_day(""), None);
    }

    #[test]
    fn weekday_identifiers() {
        assert_eq!(parse_weekday("Monday"), Some(Weekday::Mon));
        assert_eq!(parse_weekday("THU"), Some(Weekday::Thu));
        assert_eq!(parse_weekday("7"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("0"), Some(Weekday::Sun));
        assert_eq!(parse_weekday("Funday"), None);
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("Y"), Some(true));
        assert_eq!(parse_flag("n"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
