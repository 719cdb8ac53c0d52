//! A date and time of day in one calendar, with no zone attached.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSystem;
use crate::duration::Duration;
use crate::error::Result;
use crate::instant::{Instant, LocalInstant};
use crate::local_date::{IsoDayOfWeek, LocalDate};
use crate::local_time::LocalTime;
use crate::offset::Offset;
use crate::period::Period;
use crate::units::*;
use crate::zone::DateTimeZone;
use crate::zoned_date_time::ZonedDateTime;

/// A [`LocalDate`] paired with a [`LocalTime`].
///
/// Time arithmetic carries whole days into the date, so adding 25 hours to
/// 23:00 lands on 00:00 two days later.
///
/// # Examples
///
/// ```
/// use tempora::{LocalDate, LocalDateTime, LocalTime};
///
/// let start = LocalDate::new(2024, 12, 31).unwrap().at(LocalTime::new(23, 0, 0).unwrap());
/// let later = start.plus_hours(25).unwrap();
/// assert_eq!(later.date(), LocalDate::new(2025, 1, 2).unwrap());
/// assert_eq!(later.time(), LocalTime::MIDNIGHT);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalDateTime {
    date: LocalDate,
    time: LocalTime,
}

impl LocalDateTime {
    pub fn new(date: LocalDate, time: LocalTime) -> Self {
        LocalDateTime { date, time }
    }

    /// An ISO date and time to the second.
    pub fn from_fields(
        year: i32,
        month: u8,
        day: u8,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Result<Self> {
        Ok(LocalDateTime {
            date: LocalDate::new(year, month, day)?,
            time: LocalTime::new(hour, minute, second)?,
        })
    }

    pub(crate) fn from_local_instant(
        local: LocalInstant,
        calendar: CalendarSystem,
    ) -> Result<Self> {
        Ok(LocalDateTime {
            date: LocalDate::from_days_since_epoch(local.days(), calendar)?,
            time: LocalTime::from_nanosecond_of_day_unchecked(local.nanosecond_of_day()),
        })
    }

    pub(crate) fn to_local_instant(&self) -> LocalInstant {
        LocalInstant::new(self.date.days_since_epoch(), self.time.nanosecond_of_day())
    }

    pub fn date(&self) -> LocalDate {
        self.date
    }

    pub fn time(&self) -> LocalTime {
        self.time
    }

    pub fn calendar(&self) -> CalendarSystem {
        self.date.calendar()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u8 {
        self.date.month()
    }

    pub fn day(&self) -> u8 {
        self.date.day()
    }

    pub fn day_of_week(&self) -> IsoDayOfWeek {
        self.date.day_of_week()
    }

    pub fn hour(&self) -> u32 {
        self.time.hour()
    }

    pub fn minute(&self) -> u32 {
        self.time.minute()
    }

    pub fn second(&self) -> u32 {
        self.time.second()
    }

    pub fn nanosecond_of_second(&self) -> u32 {
        self.time.nanosecond_of_second()
    }

    pub fn with_calendar(&self, calendar: CalendarSystem) -> Result<Self> {
        Ok(LocalDateTime {
            date: self.date.with_calendar(calendar)?,
            time: self.time,
        })
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    pub fn plus_years(&self, years: i64) -> Result<Self> {
        Ok(LocalDateTime::new(self.date.plus_years(years)?, self.time))
    }

    pub fn plus_months(&self, months: i64) -> Result<Self> {
        Ok(LocalDateTime::new(self.date.plus_months(months)?, self.time))
    }

    pub fn plus_weeks(&self, weeks: i64) -> Result<Self> {
        Ok(LocalDateTime::new(self.date.plus_weeks(weeks)?, self.time))
    }

    pub fn plus_days(&self, days: i64) -> Result<Self> {
        Ok(LocalDateTime::new(self.date.plus_days(days)?, self.time))
    }

    /// Adds nanoseconds to the time of day, carrying into the date.
    ///
    /// # Errors
    ///
    /// Returns a range error when the date leaves the
    /// calendar's range.
    pub fn plus_nanoseconds(&self, nanoseconds: i128) -> Result<Self> {
        let (time, days) = self.time.plus_nanoseconds_with_wrap(nanoseconds);
        let date = if days == 0 {
            self.date
        } else {
            self.date.plus_days(days)?
        };
        Ok(LocalDateTime { date, time })
    }

    fn plus_units(&self, count: i64, nanos_per_unit: i64) -> Result<Self> {
        self.plus_nanoseconds(i128::from(count) * i128::from(nanos_per_unit))
    }

    pub fn plus_hours(&self, hours: i64) -> Result<Self> {
        self.plus_units(hours, NANOSECONDS_PER_HOUR)
    }

    pub fn plus_minutes(&self, minutes: i64) -> Result<Self> {
        self.plus_units(minutes, NANOSECONDS_PER_MINUTE)
    }

    pub fn plus_seconds(&self, seconds: i64) -> Result<Self> {
        self.plus_units(seconds, NANOSECONDS_PER_SECOND)
    }

    pub fn plus_milliseconds(&self, milliseconds: i64) -> Result<Self> {
        self.plus_units(milliseconds, NANOSECONDS_PER_MILLISECOND)
    }

    pub fn plus_ticks(&self, ticks: i64) -> Result<Self> {
        self.plus_units(ticks, NANOSECONDS_PER_TICK)
    }

    pub fn plus_duration(&self, duration: Duration) -> Result<Self> {
        self.plus_nanoseconds(duration.total_nanoseconds())
    }

    /// Adds the date fields of `period` first, then its time fields.
    pub fn plus_period(&self, period: &Period) -> Result<Self> {
        let date = self.date.plus_date_fields(period)?;
        LocalDateTime::new(date, self.time).plus_nanoseconds(period.time_nanoseconds())
    }

    // ── Zones and offsets ───────────────────────────────────────────────

    /// The instant at which this local value is observed at `offset`.
    pub fn to_instant_at(&self, offset: Offset) -> Result<Instant> {
        self.to_local_instant().minus_offset(offset)
    }

    /// Resolves this value in `zone`, failing unless exactly one instant
    /// has this local date and time.
    ///
    /// # Errors
    ///
    /// Returns [`SkippedTime`](crate::TemporalError::SkippedTime) or
    /// [`AmbiguousTime`](crate::TemporalError::AmbiguousTime) around transitions.
    pub fn in_zone_strictly(&self, zone: &Arc<dyn DateTimeZone>) -> Result<ZonedDateTime> {
        ZonedDateTime::at_strictly(*self, Arc::clone(zone))
    }

    /// Resolves this value in `zone` with the lenient policy of
    /// [`DateTimeZone::get_offset_from_local`].
    pub fn in_zone_leniently(&self, zone: &Arc<dyn DateTimeZone>) -> Result<ZonedDateTime> {
        ZonedDateTime::at_leniently(*self, Arc::clone(zone))
    }

    /// Orders two values of the same calendar.
    ///
    /// # Errors
    ///
    /// Returns a calendar mismatch error when the calendars differ.
    pub fn compare(&self, other: &LocalDateTime) -> Result<Ordering> {
        Ok(self
            .date
            .compare(&other.date)?
            .then_with(|| self.time.cmp(&other.time)))
    }

    /// Elapsed local time from `self` to `other`; calendars must match.
    pub(crate) fn nanoseconds_until(&self, other: &LocalDateTime) -> Result<i128> {
        self.date.ensure_same_calendar(&other.date)?;
        Ok(other.to_local_instant().nanoseconds() - self.to_local_instant().nanoseconds())
    }
}

impl PartialOrd for LocalDateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

impl From<LocalDateTime> for LocalDate {
    fn from(value: LocalDateTime) -> Self {
        value.date
    }
}

/// `YYYY-MM-DDTHH:MM:SS[.fff]`, followed by the calendar id for non-ISO
/// calendars.
impl fmt::Display for LocalDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date.fields_text(), self.time)?;
        if self.calendar() != CalendarSystem::iso() {
            write!(f, " ({})", self.calendar().id())?;
        }
        Ok(())
    }
}
