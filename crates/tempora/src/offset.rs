//! Offsets from UTC.

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::units::*;

/// A signed deviation of local time from UTC, with millisecond precision.
///
/// The valid range is strictly less than one day in either direction.
///
/// # Text forms
///
/// [`Offset::to_string_with_format`] accepts these specifiers:
///
/// | spec | form | example |
/// |---|---|---|
/// | `G` (or empty) | shortest exact `PT` form | `+PT5H30M` |
/// | `L` | hours, minutes, seconds and milliseconds | `+PT5H30M00.000S` |
/// | `S` | hours and minutes, seconds dropped | `+PT5H30M` |
/// | `I` | ISO 8601 `±HH:MM`, seconds only when non-zero | `+05:30` |
///
/// # Examples
///
/// ```
/// use tempora::Offset;
///
/// assert_eq!(Offset::ZERO.to_string_with_format("G").unwrap(), "+PT0H");
/// assert_eq!(Offset::ZERO.to_string_with_format("S").unwrap(), "+PT0H00M");
/// assert!(Offset::ZERO.to_string_with_format("Q").is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "OffsetFields", into = "OffsetFields")]
pub struct Offset {
    milliseconds: i32,
}

const MAX_MILLISECONDS: i32 = (MILLISECONDS_PER_DAY - 1) as i32;

impl Offset {
    pub const ZERO: Offset = Offset { milliseconds: 0 };
    pub const MIN_VALUE: Offset = Offset {
        milliseconds: -MAX_MILLISECONDS,
    };
    pub const MAX_VALUE: Offset = Offset {
        milliseconds: MAX_MILLISECONDS,
    };

    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when the magnitude is a day or more.
    pub fn from_milliseconds(milliseconds: i64) -> Result<Self> {
        let limit = i64::from(MAX_MILLISECONDS);
        match i32::try_from(milliseconds) {
            Ok(milliseconds) if (-limit..=limit).contains(&i64::from(milliseconds)) => {
                Ok(Offset { milliseconds })
            }
            _ => Err(TemporalError::OutOfRange(format!(
                "offset of {milliseconds}ms must be strictly within one day"
            ))),
        }
    }

    pub fn from_seconds(seconds: i64) -> Result<Self> {
        let milliseconds = seconds
            .checked_mul(MILLISECONDS_PER_SECOND)
            .ok_or_else(|| TemporalError::out_of_range("offset seconds", seconds))?;
        Self::from_milliseconds(milliseconds)
    }

    pub fn from_hours(hours: i32) -> Result<Self> {
        Self::from_milliseconds(i64::from(hours) * MILLISECONDS_PER_HOUR)
    }

    /// Combines hours and minutes, e.g. `(5, 30)` for `+05:30` and `(-3, -30)`
    /// for `-03:30`. Minutes are added as given, so their sign must agree
    /// with the hours for the usual meaning.
    pub fn from_hours_and_minutes(hours: i32, minutes: i32) -> Result<Self> {
        Self::from_milliseconds(
            i64::from(hours) * MILLISECONDS_PER_HOUR + i64::from(minutes) * MILLISECONDS_PER_MINUTE,
        )
    }

    pub const fn total_milliseconds(&self) -> i32 {
        self.milliseconds
    }

    pub fn to_duration(&self) -> Duration {
        Duration::from_milliseconds(i64::from(self.milliseconds))
    }

    pub(crate) fn nanoseconds(&self) -> i128 {
        i128::from(self.milliseconds) * i128::from(NANOSECONDS_PER_MILLISECOND)
    }

    pub const fn is_negative(&self) -> bool {
        self.milliseconds < 0
    }

    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] if the sum leaves the offset range.
    pub fn plus(&self, other: Offset) -> Result<Offset> {
        Self::from_milliseconds(i64::from(self.milliseconds) + i64::from(other.milliseconds))
    }

    pub fn minus(&self, other: Offset) -> Result<Offset> {
        Self::from_milliseconds(i64::from(self.milliseconds) - i64::from(other.milliseconds))
    }

    /// Renders the offset using one of the specifiers listed on [`Offset`].
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Format`] for an unrecognized specifier.
    pub fn to_string_with_format(&self, spec: &str) -> Result<String> {
        let parts = OffsetParts::of(self);
        match spec {
            "" | "G" => Ok(parts.general()),
            "L" => Ok(parts.long()),
            "S" => Ok(parts.short()),
            "I" => Ok(parts.iso()),
            other => Err(TemporalError::Format(format!(
                "unknown offset format specifier '{other}'"
            ))),
        }
    }

    /// The `I` form, which never fails.
    pub(crate) fn to_iso_string(&self) -> String {
        OffsetParts::of(self).iso()
    }
}

struct OffsetParts {
    sign: char,
    hours: i32,
    minutes: i32,
    seconds: i32,
    milliseconds: i32,
}

impl OffsetParts {
    fn of(offset: &Offset) -> Self {
        let sign = if offset.milliseconds < 0 { '-' } else { '+' };
        let abs = offset.milliseconds.abs();
        OffsetParts {
            sign,
            hours: abs / MILLISECONDS_PER_HOUR as i32,
            minutes: (abs / MILLISECONDS_PER_MINUTE as i32) % 60,
            seconds: (abs / MILLISECONDS_PER_SECOND as i32) % 60,
            milliseconds: abs % MILLISECONDS_PER_SECOND as i32,
        }
    }

    fn general(&self) -> String {
        if self.milliseconds != 0 {
            self.long()
        } else if self.seconds != 0 {
            format!(
                "{}PT{}H{:02}M{:02}S",
                self.sign, self.hours, self.minutes, self.seconds
            )
        } else if self.minutes != 0 {
            self.short()
        } else {
            format!("{}PT{}H", self.sign, self.hours)
        }
    }

    fn long(&self) -> String {
        format!(
            "{}PT{}H{:02}M{:02}.{:03}S",
            self.sign, self.hours, self.minutes, self.seconds, self.milliseconds
        )
    }

    fn short(&self) -> String {
        format!("{}PT{}H{:02}M", self.sign, self.hours, self.minutes)
    }

    fn iso(&self) -> String {
        let mut text = format!("{}{:02}:{:02}", self.sign, self.hours, self.minutes);
        if self.seconds != 0 || self.milliseconds != 0 {
            text.push_str(&format!(":{:02}", self.seconds));
        }
        if self.milliseconds != 0 {
            text.push_str(&format!(".{:03}", self.milliseconds));
        }
        text
    }
}

impl Neg for Offset {
    type Output = Offset;

    fn neg(self) -> Offset {
        Offset {
            milliseconds: -self.milliseconds,
        }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&OffsetParts::of(self).general())
    }
}

#[derive(Serialize, Deserialize)]
struct OffsetFields {
    milliseconds: i64,
}

impl From<Offset> for OffsetFields {
    fn from(offset: Offset) -> Self {
        OffsetFields {
            milliseconds: i64::from(offset.milliseconds),
        }
    }
}

impl TryFrom<OffsetFields> for Offset {
    type Error = TemporalError;

    fn try_from(fields: OffsetFields) -> Result<Self> {
        Offset::from_milliseconds(fields.milliseconds)
    }
}
