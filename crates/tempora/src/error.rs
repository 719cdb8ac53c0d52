//! Error types for tempora operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Calendar mismatch: {0}")]
    CalendarMismatch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid format: {0}")]
    Format(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Skipped local time: {0}")]
    SkippedTime(String),

    #[error("Ambiguous local time: {0}")]
    AmbiguousTime(String),
}

/// Broad category of a [`TemporalError`].
///
/// Strict zone resolution failures ([`TemporalError::SkippedTime`] and
/// [`TemporalError::AmbiguousTime`]) are reported as [`ErrorKind::Format`]:
/// the local value could not be given exactly one meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Range,
    CalendarMismatch,
    NotFound,
    Format,
    Parse,
}

impl TemporalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TemporalError::OutOfRange(_) | TemporalError::Argument(_) => ErrorKind::Range,
            TemporalError::CalendarMismatch(_) => ErrorKind::CalendarMismatch,
            TemporalError::NotFound(_) => ErrorKind::NotFound,
            TemporalError::Format(_)
            | TemporalError::SkippedTime(_)
            | TemporalError::AmbiguousTime(_) => ErrorKind::Format,
            TemporalError::Parse(_) => ErrorKind::Parse,
        }
    }

    pub(crate) fn out_of_range(what: &str, value: impl std::fmt::Display) -> Self {
        TemporalError::OutOfRange(format!("{what} {value}"))
    }
}

pub type Result<T> = std::result::Result<T, TemporalError>;
