//! Ranges of dates and times of day.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::local_date::LocalDate;
use crate::local_time::LocalTime;
use crate::period::Period;
use crate::units::NANOSECONDS_PER_DAY;

/// A range of dates in one calendar, with an inclusive or exclusive end.
///
/// # Examples
///
/// ```
/// use tempora::{DateInterval, LocalDate};
///
/// let start = LocalDate::new(2000, 1, 1).unwrap();
/// let end = LocalDate::new(2000, 2, 10).unwrap();
/// assert_eq!(DateInterval::new(start, end, true).unwrap().length(), 41);
/// assert_eq!(DateInterval::new(start, end, false).unwrap().length(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "DateIntervalFields", into = "DateIntervalFields")]
pub struct DateInterval {
    start: LocalDate,
    end: LocalDate,
    inclusive: bool,
}

impl DateInterval {
    /// # Errors
    ///
    /// Returns [`TemporalError::CalendarMismatch`] when the endpoints use
    /// different calendars, or [`TemporalError::OutOfRange`] when `end` is
    /// before `start`. Equal endpoints are allowed.
    pub fn new(start: LocalDate, end: LocalDate, inclusive: bool) -> Result<Self> {
        if start.days_until(&end)? < 0 {
            return Err(TemporalError::OutOfRange(format!(
                "interval end {end} is before its start {start}"
            )));
        }
        Ok(DateInterval {
            start,
            end,
            inclusive,
        })
    }

    pub fn start(&self) -> LocalDate {
        self.start
    }

    pub fn end(&self) -> LocalDate {
        self.end
    }

    pub fn is_inclusive(&self) -> bool {
        self.inclusive
    }

    /// Number of dates in the interval.
    pub fn length(&self) -> i64 {
        let days =
            i64::from(self.end.days_since_epoch()) - i64::from(self.start.days_since_epoch());
        days + i64::from(self.inclusive)
    }

    /// # Errors
    ///
    /// Returns [`TemporalError::CalendarMismatch`] for a date in another
    /// calendar.
    pub fn contains(&self, date: &LocalDate) -> Result<bool> {
        let from_start = self.start.days_until(date)?;
        let to_end = date.days_until(&self.end)?;
        Ok(from_start >= 0 && if self.inclusive { to_end >= 0 } else { to_end > 0 })
    }

    /// The dates of the interval in order.
    pub fn iter(&self) -> impl Iterator<Item = LocalDate> + '_ {
        let first = self.start.days_since_epoch();
        let calendar = self.start.calendar();
        (0..self.length())
            .map(move |offset| LocalDate::from_days_unchecked(first + offset as i32, calendar))
    }
}

/// `[start, end]` or `[start, end)`.
impl fmt::Display for DateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let close = if self.inclusive { ']' } else { ')' };
        write!(f, "[{}, {}{close}", self.start, self.end)
    }
}

#[derive(Serialize, Deserialize)]
struct DateIntervalFields {
    start: LocalDate,
    end: LocalDate,
    inclusive: bool,
}

impl From<DateInterval> for DateIntervalFields {
    fn from(interval: DateInterval) -> Self {
        DateIntervalFields {
            start: interval.start,
            end: interval.end,
            inclusive: interval.inclusive,
        }
    }
}

impl TryFrom<DateIntervalFields> for DateInterval {
    type Error = TemporalError;

    fn try_from(fields: DateIntervalFields) -> Result<Self> {
        DateInterval::new(fields.start, fields.end, fields.inclusive)
    }
}

/// A range of times of day, with an exclusive end.
///
/// A start later than the end wraps past midnight: 23:00 to 01:00 covers two
/// hours. A start equal to the end is empty.
///
/// # Examples
///
/// ```
/// use tempora::{Duration, LocalTime, TimeInterval};
///
/// let eleven = LocalTime::new(23, 0, 0).unwrap();
/// let night = TimeInterval::new(eleven, LocalTime::new(1, 0, 0).unwrap());
/// assert!(night.contains(LocalTime::new(0, 30, 0).unwrap()));
/// assert!(!night.contains(LocalTime::new(13, 0, 0).unwrap()));
/// assert_eq!(night.duration(), Duration::from_hours(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeInterval {
    start: LocalTime,
    end: LocalTime,
}

impl TimeInterval {
    pub fn new(start: LocalTime, end: LocalTime) -> Self {
        TimeInterval { start, end }
    }

    pub fn start(&self) -> LocalTime {
        self.start
    }

    pub fn end(&self) -> LocalTime {
        self.end
    }

    pub fn is_wrapping(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, time: LocalTime) -> bool {
        if self.is_wrapping() {
            time >= self.start || time < self.end
        } else {
            self.start <= time && time < self.end
        }
    }

    pub fn duration(&self) -> Duration {
        let span = self.end - self.start;
        if self.is_wrapping() {
            span + Duration::from_nanoseconds(i128::from(NANOSECONDS_PER_DAY))
        } else {
            span
        }
    }

    /// The duration as hours down to nanoseconds.
    pub fn period(&self) -> Period {
        let nanoseconds = self.duration().total_nanoseconds();
        // Always shorter than a day.
        Period::from_nanosecond_of_day(nanoseconds as i64)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
