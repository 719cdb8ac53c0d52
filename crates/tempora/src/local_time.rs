//! Time of day, independent of calendar and zone.

use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::units::*;

/// A time of day with nanosecond precision, in `[00:00, 24:00)`.
///
/// Arithmetic wraps around midnight using floor division, so moving
/// backwards past midnight lands on the previous evening rather than on a
/// negative time.
///
/// # Examples
///
/// ```
/// use tempora::LocalTime;
///
/// let time = LocalTime::new(12, 15, 8).unwrap();
/// assert_eq!(time.plus_hours(241), LocalTime::new(13, 15, 8).unwrap());
/// assert_eq!(time.plus_hours(-20), LocalTime::new(16, 15, 8).unwrap());
///
/// let (wrapped, days) = time.plus_hours_with_wrap(-20);
/// assert_eq!(wrapped, LocalTime::new(16, 15, 8).unwrap());
/// assert_eq!(days, -1);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "LocalTimeFields", into = "LocalTimeFields")]
pub struct LocalTime {
    nanoseconds: i64,
}

impl LocalTime {
    pub const MIDNIGHT: LocalTime = LocalTime { nanoseconds: 0 };
    pub const NOON: LocalTime = LocalTime {
        nanoseconds: 12 * NANOSECONDS_PER_HOUR,
    };
    pub const MIN_VALUE: LocalTime = LocalTime::MIDNIGHT;
    pub const MAX_VALUE: LocalTime = LocalTime {
        nanoseconds: NANOSECONDS_PER_DAY - 1,
    };

    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] for an hour outside `0..24` or
    /// a minute or second outside `0..60`.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self> {
        Self::with_nanos(hour, minute, second, 0)
    }

    pub fn with_millis(hour: u32, minute: u32, second: u32, millisecond: u32) -> Result<Self> {
        if millisecond >= 1_000 {
            return Err(TemporalError::out_of_range("millisecond", millisecond));
        }
        Self::with_nanos(
            hour,
            minute,
            second,
            millisecond * NANOSECONDS_PER_MILLISECOND as u32,
        )
    }

    pub fn with_millis_and_ticks(
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
        tick_within_millisecond: u32,
    ) -> Result<Self> {
        if tick_within_millisecond >= TICKS_PER_MILLISECOND as u32 {
            return Err(TemporalError::out_of_range(
                "tick within millisecond",
                tick_within_millisecond,
            ));
        }
        let time = Self::with_millis(hour, minute, second, millisecond)?;
        Ok(LocalTime {
            nanoseconds: time.nanoseconds
                + i64::from(tick_within_millisecond) * NANOSECONDS_PER_TICK,
        })
    }

    pub fn with_nanos(hour: u32, minute: u32, second: u32, nanosecond: u32) -> Result<Self> {
        if hour >= 24 {
            return Err(TemporalError::out_of_range("hour", hour));
        }
        if minute >= 60 {
            return Err(TemporalError::out_of_range("minute", minute));
        }
        if second >= 60 {
            return Err(TemporalError::out_of_range("second", second));
        }
        if i64::from(nanosecond) >= NANOSECONDS_PER_SECOND {
            return Err(TemporalError::out_of_range("nanosecond", nanosecond));
        }
        Ok(LocalTime {
            nanoseconds: i64::from(hour) * NANOSECONDS_PER_HOUR
                + i64::from(minute) * NANOSECONDS_PER_MINUTE
                + i64::from(second) * NANOSECONDS_PER_SECOND
                + i64::from(nanosecond),
        })
    }

    pub fn from_nanosecond_of_day(nanoseconds: i64) -> Result<Self> {
        if (0..NANOSECONDS_PER_DAY).contains(&nanoseconds) {
            Ok(LocalTime { nanoseconds })
        } else {
            Err(TemporalError::out_of_range("nanosecond of day", nanoseconds))
        }
    }

    pub fn from_tick_of_day(ticks: i64) -> Result<Self> {
        if (0..TICKS_PER_DAY).contains(&ticks) {
            Ok(LocalTime {
                nanoseconds: ticks * NANOSECONDS_PER_TICK,
            })
        } else {
            Err(TemporalError::out_of_range("tick of day", ticks))
        }
    }

    /// Caller guarantees `0 <= nanoseconds < NANOSECONDS_PER_DAY`.
    pub(crate) const fn from_nanosecond_of_day_unchecked(nanoseconds: i64) -> Self {
        LocalTime { nanoseconds }
    }

    pub fn hour(&self) -> u32 {
        (self.nanoseconds / NANOSECONDS_PER_HOUR) as u32
    }

    pub fn minute(&self) -> u32 {
        ((self.nanoseconds / NANOSECONDS_PER_MINUTE) % 60) as u32
    }

    pub fn second(&self) -> u32 {
        ((self.nanoseconds / NANOSECONDS_PER_SECOND) % 60) as u32
    }

    pub fn millisecond(&self) -> u32 {
        ((self.nanoseconds / NANOSECONDS_PER_MILLISECOND) % 1_000) as u32
    }

    pub fn tick_of_second(&self) -> u32 {
        ((self.nanoseconds % NANOSECONDS_PER_SECOND) / NANOSECONDS_PER_TICK) as u32
    }

    pub fn nanosecond_of_second(&self) -> u32 {
        (self.nanoseconds % NANOSECONDS_PER_SECOND) as u32
    }

    pub fn tick_of_day(&self) -> i64 {
        self.nanoseconds / NANOSECONDS_PER_TICK
    }

    pub fn nanosecond_of_day(&self) -> i64 {
        self.nanoseconds
    }

    // ── Wrapping arithmetic ─────────────────────────────────────────────

    /// Adds `nanoseconds`, returning the wrapped time and the number of
    /// whole days crossed (negative when moving backwards).
    pub fn plus_nanoseconds_with_wrap(&self, nanoseconds: i128) -> (LocalTime, i64) {
        let total = i128::from(self.nanoseconds) + nanoseconds;
        let day = i128::from(NANOSECONDS_PER_DAY);
        let days = total.div_euclid(day) as i64;
        let time = LocalTime {
            nanoseconds: total.rem_euclid(day) as i64,
        };
        (time, days)
    }

    pub fn plus_nanoseconds(&self, nanoseconds: i128) -> LocalTime {
        self.plus_nanoseconds_with_wrap(nanoseconds).0
    }

    fn plus_units_with_wrap(&self, count: i64, nanos_per_unit: i64) -> (LocalTime, i64) {
        self.plus_nanoseconds_with_wrap(i128::from(count) * i128::from(nanos_per_unit))
    }

    pub fn plus_hours(&self, hours: i64) -> LocalTime {
        self.plus_hours_with_wrap(hours).0
    }

    pub fn plus_hours_with_wrap(&self, hours: i64) -> (LocalTime, i64) {
        self.plus_units_with_wrap(hours, NANOSECONDS_PER_HOUR)
    }

    pub fn plus_minutes(&self, minutes: i64) -> LocalTime {
        self.plus_units_with_wrap(minutes, NANOSECONDS_PER_MINUTE).0
    }

    pub fn plus_seconds(&self, seconds: i64) -> LocalTime {
        self.plus_units_with_wrap(seconds, NANOSECONDS_PER_SECOND).0
    }

    pub fn plus_milliseconds(&self, milliseconds: i64) -> LocalTime {
        self.plus_units_with_wrap(milliseconds, NANOSECONDS_PER_MILLISECOND)
            .0
    }

    pub fn plus_ticks(&self, ticks: i64) -> LocalTime {
        self.plus_units_with_wrap(ticks, NANOSECONDS_PER_TICK).0
    }

    pub fn plus_duration(&self, duration: Duration) -> LocalTime {
        self.plus_nanoseconds(duration.total_nanoseconds())
    }
}

/// Signed elapsed time from `rhs` to `self` within a single day.
impl Sub for LocalTime {
    type Output = Duration;

    fn sub(self, rhs: LocalTime) -> Duration {
        Duration::from_nanoseconds(i128::from(self.nanoseconds - rhs.nanoseconds))
    }
}

/// `HH:MM:SS`, followed by the fraction of a second when it is non-zero.
impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )?;
        let fraction = self.nanosecond_of_second();
        if fraction != 0 {
            let digits = format!("{fraction:09}");
            write!(f, ".{}", digits.trim_end_matches('0'))?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct LocalTimeFields {
    hour: u32,
    minute: u32,
    second: u32,
    #[serde(default)]
    nanosecond: u32,
}

impl From<LocalTime> for LocalTimeFields {
    fn from(time: LocalTime) -> Self {
        LocalTimeFields {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
            nanosecond: time.nanosecond_of_second(),
        }
    }
}

impl TryFrom<LocalTimeFields> for LocalTime {
    type Error = TemporalError;

    fn try_from(fields: LocalTimeFields) -> Result<Self> {
        LocalTime::with_nanos(fields.hour, fields.minute, fields.second, fields.nanosecond)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32, second: u32) -> LocalTime {
        LocalTime::new(hour, minute, second).unwrap()
    }

    #[test]
    fn test_plus_hours_across_many_days() {
        let start = time(12, 15, 8);
        assert_eq!(start.plus_hours(241), time(13, 15, 8));
        assert_eq!(start.plus_hours(241).plus_hours(-241), start);
        assert_eq!(start.plus_hours_with_wrap(241).1, 10);
    }

    #[test]
    fn test_negative_wrap_uses_floor_semantics() {
        let (wrapped, days) = time(12, 15, 8).plus_hours_with_wrap(-20);
        assert_eq!(wrapped, time(16, 15, 8));
        assert_eq!(days, -1);
        let (wrapped, days) = LocalTime::MIDNIGHT.plus_nanoseconds_with_wrap(-1);
        assert_eq!(wrapped, LocalTime::MAX_VALUE);
        assert_eq!(days, -1);
        let (wrapped, days) = time(8, 0, 0).plus_hours_with_wrap(-8);
        assert_eq!(wrapped, LocalTime::MIDNIGHT);
        assert_eq!(days, 0);
    }

    #[test]
    fn test_plus_smaller_units() {
        let start = time(23, 59, 59);
        assert_eq!(start.plus_seconds(1), LocalTime::MIDNIGHT);
        assert_eq!(start.plus_minutes(-1), time(23, 58, 59));
        assert_eq!(
            start.plus_milliseconds(500),
            LocalTime::with_millis(23, 59, 59, 500).unwrap()
        );
        assert_eq!(
            LocalTime::MIDNIGHT.plus_ticks(-1).nanosecond_of_day(),
            NANOSECONDS_PER_DAY - NANOSECONDS_PER_TICK
        );
    }

    #[test]
    fn test_construction_validates_fields() {
        assert!(LocalTime::new(24, 0, 0).is_err());
        assert!(LocalTime::new(0, 60, 0).is_err());
        assert!(LocalTime::new(0, 0, 60).is_err());
        assert!(LocalTime::with_millis(0, 0, 0, 1_000).is_err());
        assert!(LocalTime::with_nanos(0, 0, 0, 1_000_000_000).is_err());
        assert!(LocalTime::from_nanosecond_of_day(NANOSECONDS_PER_DAY).is_err());
        assert!(LocalTime::from_nanosecond_of_day(-1).is_err());
        assert!(LocalTime::from_tick_of_day(TICKS_PER_DAY).is_err());
    }

    #[test]
    fn test_field_accessors() {
        let t = LocalTime::with_millis_and_ticks(13, 45, 30, 123, 4_567).unwrap();
        assert_eq!(t.hour(), 13);
        assert_eq!(t.minute(), 45);
        assert_eq!(t.second(), 30);
        assert_eq!(t.millisecond(), 123);
        assert_eq!(t.tick_of_second(), 1_234_567);
        assert_eq!(t.nanosecond_of_second(), 123_456_700);
    }

    #[test]
    fn test_subtraction_and_display() {
        assert_eq!(time(10, 0, 0) - time(8, 30, 0), Duration::from_minutes(90));
        assert_eq!(time(8, 30, 0) - time(10, 0, 0), Duration::from_minutes(-90));
        assert_eq!(time(8, 5, 3).to_string(), "08:05:03");
        assert_eq!(
            LocalTime::with_millis(8, 5, 3, 120).unwrap().to_string(),
            "08:05:03.12"
        );
    }

    #[test]
    fn test_serde_validates_fields() {
        let t = LocalTime::with_nanos(1, 2, 3, 4).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, r#"{"hour":1,"minute":2,"second":3,"nanosecond":4}"#);
        assert_eq!(serde_json::from_str::<LocalTime>(&json).unwrap(), t);
        assert!(serde_json::from_str::<LocalTime>(r#"{"hour":25,"minute":0,"second":0}"#).is_err());
    }
}
