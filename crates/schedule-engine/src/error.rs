//! Error types for schedule-engine operations.

use thiserror::Error;

use crate::appointment::IntervalError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Structural misconfiguration, e.g. a slot granularity that does not tile a day.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid interval for appointment '{id}': {reason}")]
    InvalidInterval { id: String, reason: IntervalError },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDateTime(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
