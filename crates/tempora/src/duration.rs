//! Fixed-length elapsed time.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::units::*;

/// A fixed amount of elapsed time with nanosecond resolution.
///
/// Unlike [`crate::Period`], a duration has no calendar meaning: a day is
/// always exactly 24 hours. The `i128` representation covers far more than
/// the difference between any two [`crate::Instant`] values, so subtracting
/// instants never overflows.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Duration {
    nanoseconds: i128,
}

impl Duration {
    pub const ZERO: Duration = Duration { nanoseconds: 0 };
    pub const EPSILON: Duration = Duration { nanoseconds: 1 };
    pub const ONE_DAY: Duration = Duration {
        nanoseconds: NANOSECONDS_PER_DAY as i128,
    };

    pub const fn from_nanoseconds(nanoseconds: i128) -> Self {
        Duration { nanoseconds }
    }

    pub const fn from_ticks(ticks: i64) -> Self {
        Self::from_units(ticks, NANOSECONDS_PER_TICK)
    }

    pub const fn from_milliseconds(milliseconds: i64) -> Self {
        Self::from_units(milliseconds, NANOSECONDS_PER_MILLISECOND)
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self::from_units(seconds, NANOSECONDS_PER_SECOND)
    }

    pub const fn from_minutes(minutes: i64) -> Self {
        Self::from_units(minutes, NANOSECONDS_PER_MINUTE)
    }

    pub const fn from_hours(hours: i64) -> Self {
        Self::from_units(hours, NANOSECONDS_PER_HOUR)
    }

    pub const fn from_days(days: i64) -> Self {
        Self::from_units(days, NANOSECONDS_PER_DAY)
    }

    pub const fn from_weeks(weeks: i64) -> Self {
        Self::from_units(weeks, NANOSECONDS_PER_WEEK)
    }

    const fn from_units(count: i64, nanos_per_unit: i64) -> Self {
        Duration {
            nanoseconds: count as i128 * nanos_per_unit as i128,
        }
    }

    pub const fn total_nanoseconds(&self) -> i128 {
        self.nanoseconds
    }

    /// Whole ticks, truncated towards zero.
    pub const fn total_ticks(&self) -> i128 {
        self.nanoseconds / NANOSECONDS_PER_TICK as i128
    }

    /// Whole milliseconds, truncated towards zero.
    pub const fn total_milliseconds(&self) -> i128 {
        self.nanoseconds / NANOSECONDS_PER_MILLISECOND as i128
    }

    /// Whole seconds, truncated towards zero.
    pub const fn total_seconds(&self) -> i128 {
        self.nanoseconds / NANOSECONDS_PER_SECOND as i128
    }

    /// Whole days, truncated towards zero.
    pub const fn total_days(&self) -> i128 {
        self.nanoseconds / NANOSECONDS_PER_DAY as i128
    }

    pub const fn is_negative(&self) -> bool {
        self.nanoseconds < 0
    }

    pub const fn abs(&self) -> Duration {
        Duration {
            nanoseconds: self.nanoseconds.abs(),
        }
    }

    pub fn checked_add(self, other: Duration) -> Option<Duration> {
        self.nanoseconds
            .checked_add(other.nanoseconds)
            .map(Duration::from_nanoseconds)
    }

    pub fn checked_sub(self, other: Duration) -> Option<Duration> {
        self.nanoseconds
            .checked_sub(other.nanoseconds)
            .map(Duration::from_nanoseconds)
    }

    pub fn checked_neg(self) -> Option<Duration> {
        self.nanoseconds.checked_neg().map(Duration::from_nanoseconds)
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, rhs: Duration) -> Duration {
        Duration::from_nanoseconds(self.nanoseconds + rhs.nanoseconds)
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, rhs: Duration) -> Duration {
        Duration::from_nanoseconds(self.nanoseconds - rhs.nanoseconds)
    }
}

impl Neg for Duration {
    type Output = Duration;

    fn neg(self) -> Duration {
        Duration::from_nanoseconds(-self.nanoseconds)
    }
}

/// Renders as `[-]D:HH:MM:SS.fffffffff`, e.g. `1:02:03:04.000000000`.
impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.nanoseconds < 0 { "-" } else { "" };
        let abs = self.nanoseconds.unsigned_abs();
        let day = NANOSECONDS_PER_DAY as u128;
        let days = abs / day;
        let rem = abs % day;
        let hours = rem / NANOSECONDS_PER_HOUR as u128;
        let minutes = (rem % NANOSECONDS_PER_HOUR as u128) / NANOSECONDS_PER_MINUTE as u128;
        let seconds = (rem % NANOSECONDS_PER_MINUTE as u128) / NANOSECONDS_PER_SECOND as u128;
        let nanos = rem % NANOSECONDS_PER_SECOND as u128;
        write!(
            f,
            "{sign}{days}:{hours:02}:{minutes:02}:{seconds:02}.{nanos:09}"
        )
    }
}
