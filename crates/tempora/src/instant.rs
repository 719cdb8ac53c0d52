//! Points on the global timeline.

use std::fmt;
use std::ops::Sub;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calendar::gregorian::GregorianCalculator;
use crate::calendar::{CalendarSystem, YearMonthDayCalculator};
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::offset::Offset;
use crate::units::*;
use crate::zone::DateTimeZone;
use crate::zoned_date_time::ZonedDateTime;

/// First day of the representable range (-9998-01-01 ISO).
pub(crate) const MIN_DAYS: i32 = -4_371_222;
/// Last day of the representable range (9999-12-31 ISO).
pub(crate) const MAX_DAYS: i32 = 2_932_896;

const MIN_NANOSECONDS: i128 = MIN_DAYS as i128 * NANOSECONDS_PER_DAY as i128;
const MAX_NANOSECONDS: i128 = (MAX_DAYS as i128 + 1) * NANOSECONDS_PER_DAY as i128 - 1;

/// A point on the UTC timeline, as nanoseconds since 1970-01-01T00:00:00Z.
///
/// Instants span -9998-01-01T00:00:00Z to 9999-12-31T23:59:59.999999999Z.
/// Arithmetic that would leave that range fails rather than wrapping.
///
/// # Examples
///
/// ```
/// use tempora::{Duration, Instant};
///
/// let start = Instant::from_unix_seconds(1_700_000_000).unwrap();
/// let later = start.plus(Duration::from_hours(2)).unwrap();
/// assert_eq!(later - start, Duration::from_hours(2));
/// assert!(Instant::MAX_VALUE.plus(Duration::EPSILON).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "InstantFields", into = "InstantFields")]
pub struct Instant {
    nanoseconds: i128,
}

impl Instant {
    pub const UNIX_EPOCH: Instant = Instant { nanoseconds: 0 };
    pub const MIN_VALUE: Instant = Instant {
        nanoseconds: MIN_NANOSECONDS,
    };
    pub const MAX_VALUE: Instant = Instant {
        nanoseconds: MAX_NANOSECONDS,
    };

    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] outside the representable range.
    pub fn from_unix_nanoseconds(nanoseconds: i128) -> Result<Self> {
        if (MIN_NANOSECONDS..=MAX_NANOSECONDS).contains(&nanoseconds) {
            Ok(Instant { nanoseconds })
        } else {
            Err(TemporalError::OutOfRange(format!(
                "{nanoseconds}ns since the Unix epoch is outside the instant range"
            )))
        }
    }

    pub fn from_unix_ticks(ticks: i64) -> Result<Self> {
        Self::from_unix_nanoseconds(i128::from(ticks) * i128::from(NANOSECONDS_PER_TICK))
    }

    pub fn from_unix_milliseconds(milliseconds: i64) -> Result<Self> {
        Self::from_unix_nanoseconds(
            i128::from(milliseconds) * i128::from(NANOSECONDS_PER_MILLISECOND),
        )
    }

    pub fn from_unix_seconds(seconds: i64) -> Result<Self> {
        Self::from_unix_nanoseconds(i128::from(seconds) * i128::from(NANOSECONDS_PER_SECOND))
    }

    /// Nearest representable instant, for lookups that only need a guess.
    pub(crate) fn clamped(nanoseconds: i128) -> Self {
        Instant {
            nanoseconds: nanoseconds.clamp(MIN_NANOSECONDS, MAX_NANOSECONDS),
        }
    }

    pub const fn to_unix_nanoseconds(&self) -> i128 {
        self.nanoseconds
    }

    /// Whole ticks since the epoch, rounded towards negative infinity.
    pub fn to_unix_ticks(&self) -> i64 {
        self.nanoseconds.div_euclid(i128::from(NANOSECONDS_PER_TICK)) as i64
    }

    /// Whole milliseconds since the epoch, rounded towards negative infinity.
    pub fn to_unix_milliseconds(&self) -> i64 {
        self.nanoseconds
            .div_euclid(i128::from(NANOSECONDS_PER_MILLISECOND)) as i64
    }

    /// Whole seconds since the epoch, rounded towards negative infinity.
    pub fn to_unix_seconds(&self) -> i64 {
        self.nanoseconds.div_euclid(i128::from(NANOSECONDS_PER_SECOND)) as i64
    }

    pub(crate) fn days_since_epoch(&self) -> i32 {
        self.nanoseconds.div_euclid(i128::from(NANOSECONDS_PER_DAY)) as i32
    }

    pub(crate) fn nanosecond_of_day(&self) -> i64 {
        self.nanoseconds.rem_euclid(i128::from(NANOSECONDS_PER_DAY)) as i64
    }

    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] if the result leaves the range.
    pub fn plus(&self, duration: Duration) -> Result<Instant> {
        let nanoseconds = self
            .nanoseconds
            .checked_add(duration.total_nanoseconds())
            .ok_or_else(|| TemporalError::out_of_range("instant plus", duration))?;
        Self::from_unix_nanoseconds(nanoseconds)
    }

    pub fn minus(&self, duration: Duration) -> Result<Instant> {
        let nanoseconds = self
            .nanoseconds
            .checked_sub(duration.total_nanoseconds())
            .ok_or_else(|| TemporalError::out_of_range("instant minus", duration))?;
        Self::from_unix_nanoseconds(nanoseconds)
    }

    /// The local timeline value for this instant at `offset`.
    pub(crate) fn plus_offset(&self, offset: Offset) -> LocalInstant {
        LocalInstant {
            nanoseconds: self.nanoseconds + offset.nanoseconds(),
        }
    }

    /// This instant in UTC, in the ISO calendar.
    pub fn in_utc(&self) -> ZonedDateTime {
        ZonedDateTime::from_utc_instant(*self)
    }

    /// This instant in `zone`, in the ISO calendar.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when the local date at the
    /// zone's offset falls outside the ISO calendar.
    pub fn in_zone(&self, zone: Arc<dyn DateTimeZone>) -> Result<ZonedDateTime> {
        ZonedDateTime::from_instant(*self, zone, CalendarSystem::iso())
    }

    pub fn in_zone_with_calendar(
        &self,
        zone: Arc<dyn DateTimeZone>,
        calendar: CalendarSystem,
    ) -> Result<ZonedDateTime> {
        ZonedDateTime::from_instant(*self, zone, calendar)
    }
}

impl Sub for Instant {
    type Output = Duration;

    fn sub(self, rhs: Instant) -> Duration {
        Duration::from_nanoseconds(self.nanoseconds - rhs.nanoseconds)
    }
}

/// ISO 8601 in UTC, e.g. `2024-03-10T07:00:00Z`.
impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (year, month, day) = GregorianCalculator.fields_from_days(self.days_since_epoch());
        let nanos = self.nanosecond_of_day();
        let seconds = nanos / NANOSECONDS_PER_SECOND;
        let fraction = nanos % NANOSECONDS_PER_SECOND;
        if year < 0 {
            write!(f, "-{:04}", -year)?;
        } else {
            write!(f, "{year:04}")?;
        }
        write!(
            f,
            "-{month:02}-{day:02}T{:02}:{:02}:{:02}",
            seconds / SECONDS_PER_HOUR,
            (seconds / SECONDS_PER_MINUTE) % 60,
            seconds % 60
        )?;
        if fraction != 0 {
            let digits = format!("{fraction:09}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        f.write_str("Z")
    }
}

#[derive(Serialize, Deserialize)]
struct InstantFields {
    seconds: i64,
    nanoseconds: u32,
}

impl From<Instant> for InstantFields {
    fn from(instant: Instant) -> Self {
        InstantFields {
            seconds: instant.to_unix_seconds(),
            nanoseconds: instant
                .nanoseconds
                .rem_euclid(i128::from(NANOSECONDS_PER_SECOND)) as u32,
        }
    }
}

impl TryFrom<InstantFields> for Instant {
    type Error = TemporalError;

    fn try_from(fields: InstantFields) -> Result<Self> {
        if i64::from(fields.nanoseconds) >= NANOSECONDS_PER_SECOND {
            return Err(TemporalError::out_of_range(
                "nanosecond of second",
                fields.nanoseconds,
            ));
        }
        Instant::from_unix_nanoseconds(
            i128::from(fields.seconds) * i128::from(NANOSECONDS_PER_SECOND)
                + i128::from(fields.nanoseconds),
        )
    }
}

// ── Local timeline ──────────────────────────────────────────────────────────

/// Nanoseconds since 1970-01-01T00:00 on a local (zone-less) timeline.
///
/// May lie slightly outside the instant range, by at most one offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct LocalInstant {
    nanoseconds: i128,
}

impl LocalInstant {
    pub(crate) fn new(days: i32, nanosecond_of_day: i64) -> Self {
        LocalInstant {
            nanoseconds: i128::from(days) * i128::from(NANOSECONDS_PER_DAY)
                + i128::from(nanosecond_of_day),
        }
    }

    pub(crate) fn nanoseconds(&self) -> i128 {
        self.nanoseconds
    }

    pub(crate) fn days(&self) -> i32 {
        self.nanoseconds.div_euclid(i128::from(NANOSECONDS_PER_DAY)) as i32
    }

    pub(crate) fn nanosecond_of_day(&self) -> i64 {
        self.nanoseconds.rem_euclid(i128::from(NANOSECONDS_PER_DAY)) as i64
    }

    /// The instant at which this local value is observed at `offset`.
    pub(crate) fn minus_offset(&self, offset: Offset) -> Result<Instant> {
        Instant::from_unix_nanoseconds(self.nanoseconds - offset.nanoseconds())
    }
}
