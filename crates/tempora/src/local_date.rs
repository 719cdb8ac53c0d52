//! Calendar dates without a time of day or time zone.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarSystem, Era};
use crate::error::{Result, TemporalError};
use crate::local_date_time::LocalDateTime;
use crate::local_time::LocalTime;
use crate::period::Period;

/// Day of the week, numbered the ISO 8601 way from Monday (1) to Sunday (7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IsoDayOfWeek {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
    Sunday = 7,
}

impl IsoDayOfWeek {
    pub const ALL: [IsoDayOfWeek; 7] = [
        IsoDayOfWeek::Monday,
        IsoDayOfWeek::Tuesday,
        IsoDayOfWeek::Wednesday,
        IsoDayOfWeek::Thursday,
        IsoDayOfWeek::Friday,
        IsoDayOfWeek::Saturday,
        IsoDayOfWeek::Sunday,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Result<Self> {
        match number {
            1..=7 => Ok(Self::ALL[usize::from(number) - 1]),
            other => Err(TemporalError::out_of_range("ISO day of week", other)),
        }
    }

    /// 1970-01-01 was a Thursday.
    pub(crate) fn from_days_since_epoch(days: i32) -> Self {
        Self::ALL[(i64::from(days) + 3).rem_euclid(7) as usize]
    }
}

/// A date in a specific calendar system.
///
/// Equality includes the calendar: the same day in the ISO and Julian
/// calendars gives two unequal values. Ordering is only defined between
/// dates of one calendar, so `partial_cmp` returns `None` across calendars
/// and [`LocalDate::compare`] reports the mismatch as an error.
///
/// # Examples
///
/// ```
/// use tempora::{CalendarSystem, LocalDate};
///
/// let date = LocalDate::new(2000, 1, 31).unwrap();
/// assert_eq!(date.plus_months(1).unwrap(), LocalDate::new(2000, 2, 29).unwrap());
///
/// let julian = date.with_calendar(CalendarSystem::julian()).unwrap();
/// assert_eq!((julian.year(), julian.month(), julian.day()), (2000, 1, 18));
/// assert!(date.compare(&julian).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LocalDateFields", into = "LocalDateFields")]
pub struct LocalDate {
    year: i32,
    month: u8,
    day: u8,
    calendar: CalendarSystem,
}

impl LocalDate {
    /// A date in the ISO calendar.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when any field is invalid.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        Self::new_in_calendar(year, month, day, CalendarSystem::iso())
    }

    pub fn new_in_calendar(
        year: i32,
        month: u8,
        day: u8,
        calendar: CalendarSystem,
    ) -> Result<Self> {
        calendar.validate_year_month_day(year, month, day)?;
        Ok(LocalDate {
            year,
            month,
            day,
            calendar,
        })
    }

    /// A date from a year-of-era rather than an absolute year.
    pub fn from_era(
        era: Era,
        year_of_era: i32,
        month: u8,
        day: u8,
        calendar: CalendarSystem,
    ) -> Result<Self> {
        let year = calendar.get_absolute_year(year_of_era, era)?;
        Self::new_in_calendar(year, month, day, calendar)
    }

    pub fn from_days_since_epoch(days: i32, calendar: CalendarSystem) -> Result<Self> {
        let (year, month, day) = calendar.fields_from_days(days)?;
        Ok(LocalDate {
            year,
            month,
            day,
            calendar,
        })
    }

    /// Caller guarantees `days` lies within the calendar's range.
    pub(crate) fn from_days_unchecked(days: i32, calendar: CalendarSystem) -> Self {
        let (year, month, day) = calendar.raw_fields_from_days(days);
        LocalDate {
            year,
            month,
            day,
            calendar,
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn calendar(&self) -> CalendarSystem {
        self.calendar
    }

    /// The era whose range of years contains this date's year.
    pub fn era(&self) -> Result<Era> {
        self.calendar.get_era(self.year)
    }

    pub fn year_of_era(&self) -> Result<i32> {
        self.calendar.get_year_of_era(self.year)
    }

    pub fn day_of_week(&self) -> IsoDayOfWeek {
        IsoDayOfWeek::from_days_since_epoch(self.days_since_epoch())
    }

    /// One-based day within the year.
    pub fn day_of_year(&self) -> u16 {
        self.calendar.raw_days_before_month(self.year, self.month) + u16::from(self.day)
    }

    pub fn days_since_epoch(&self) -> i32 {
        self.calendar
            .raw_days_since_epoch(self.year, self.month, self.day)
    }

    /// The same day, expressed in `calendar`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] when the day is outside the range
    /// of `calendar`, as happens for very early ISO dates and the Coptic
    /// calendar.
    pub fn with_calendar(&self, calendar: CalendarSystem) -> Result<LocalDate> {
        let days = self.days_since_epoch();
        calendar.validate_days(days).map_err(|_| {
            TemporalError::Argument(format!(
                "{self} cannot be represented in the {} calendar",
                calendar.id()
            ))
        })?;
        Ok(Self::from_days_unchecked(days, calendar))
    }

    pub fn at_midnight(&self) -> LocalDateTime {
        LocalDateTime::new(*self, LocalTime::MIDNIGHT)
    }

    pub fn at(&self, time: LocalTime) -> LocalDateTime {
        LocalDateTime::new(*self, time)
    }

    // ── Arithmetic ──────────────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when the result leaves the
    /// calendar's range.
    pub fn plus_days(&self, days: i64) -> Result<LocalDate> {
        let target = i64::from(self.days_since_epoch())
            .checked_add(days)
            .and_then(|target| i32::try_from(target).ok())
            .ok_or_else(|| TemporalError::out_of_range("days to add", days))?;
        Self::from_days_since_epoch(target, self.calendar)
    }

    pub fn plus_weeks(&self, weeks: i64) -> Result<LocalDate> {
        let days = weeks
            .checked_mul(7)
            .ok_or_else(|| TemporalError::out_of_range("weeks to add", weeks))?;
        self.plus_days(days)
    }

    /// Adds calendar months, clamping the day to the end of the target month.
    pub fn plus_months(&self, months: i64) -> Result<LocalDate> {
        let per_year = i64::from(self.calendar.raw_months_in_year(self.year));
        let total = i64::from(self.year) * per_year + i64::from(self.month) - 1;
        let total = total
            .checked_add(months)
            .ok_or_else(|| TemporalError::out_of_range("months to add", months))?;
        let year = i32::try_from(total.div_euclid(per_year))
            .map_err(|_| TemporalError::out_of_range("months to add", months))?;
        let month = (total.rem_euclid(per_year) + 1) as u8;
        self.clamped(year, month)
    }

    /// Adds calendar years, clamping the day when the anniversary does not
    /// exist (29 February in a common year).
    pub fn plus_years(&self, years: i64) -> Result<LocalDate> {
        let year = i64::from(self.year)
            .checked_add(years)
            .and_then(|year| i32::try_from(year).ok())
            .ok_or_else(|| TemporalError::out_of_range("years to add", years))?;
        self.calendar.validate_year(year)?;
        let month = self.month.min(self.calendar.raw_months_in_year(year));
        self.clamped(year, month)
    }

    fn clamped(&self, year: i32, month: u8) -> Result<LocalDate> {
        self.calendar.validate_year_month(year, month)?;
        let day = self.day.min(self.calendar.raw_days_in_month(year, month));
        Ok(LocalDate {
            year,
            month,
            day,
            calendar: self.calendar,
        })
    }

    /// Adds the date fields of `period`: years, then months, then weeks
    /// and days.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] when `period` has a non-zero time
    /// field, or a range error when the result leaves the calendar.
    pub fn plus_period(&self, period: &Period) -> Result<LocalDate> {
        if period.has_time_fields() {
            return Err(TemporalError::Argument(format!(
                "cannot add {period} to a date: time fields must be zero"
            )));
        }
        self.plus_date_fields(period)
    }

    pub(crate) fn plus_date_fields(&self, period: &Period) -> Result<LocalDate> {
        let mut date = *self;
        if period.years() != 0 {
            date = date.plus_years(period.years())?;
        }
        if period.months() != 0 {
            date = date.plus_months(period.months())?;
        }
        let days = period
            .weeks()
            .checked_mul(7)
            .and_then(|days| days.checked_add(period.days()))
            .ok_or_else(|| TemporalError::out_of_range("period days", period))?;
        if days != 0 {
            date = date.plus_days(days)?;
        }
        Ok(date)
    }

    /// The next date strictly after this one falling on `target`.
    pub fn next(&self, target: IsoDayOfWeek) -> Result<LocalDate> {
        let mut difference = i64::from(target.number()) - i64::from(self.day_of_week().number());
        if difference <= 0 {
            difference += 7;
        }
        self.plus_days(difference)
    }

    /// The latest date strictly before this one falling on `target`.
    pub fn previous(&self, target: IsoDayOfWeek) -> Result<LocalDate> {
        let mut difference = i64::from(target.number()) - i64::from(self.day_of_week().number());
        if difference >= 0 {
            difference -= 7;
        }
        self.plus_days(difference)
    }

    // ── Comparison ──────────────────────────────────────────────────────

    /// Orders two dates of the same calendar.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::CalendarMismatch`] when the calendars differ.
    pub fn compare(&self, other: &LocalDate) -> Result<Ordering> {
        self.ensure_same_calendar(other)?;
        Ok((self.year, self.month, self.day).cmp(&(other.year, other.month, other.day)))
    }

    pub(crate) fn ensure_same_calendar(&self, other: &LocalDate) -> Result<()> {
        if self.calendar == other.calendar {
            Ok(())
        } else {
            Err(TemporalError::CalendarMismatch(format!(
                "{self} and {other} use different calendars"
            )))
        }
    }

    /// `YYYY-MM-DD` without the calendar.
    pub(crate) fn fields_text(&self) -> String {
        if self.year < 0 {
            format!("-{:04}-{:02}-{:02}", -i64::from(self.year), self.month, self.day)
        } else {
            format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
        }
    }

    /// Signed day count from `self` to `other`; calendars must match.
    pub(crate) fn days_until(&self, other: &LocalDate) -> Result<i64> {
        self.ensure_same_calendar(other)?;
        Ok(i64::from(other.days_since_epoch()) - i64::from(self.days_since_epoch()))
    }
}

impl PartialOrd for LocalDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(other).ok()
    }
}

/// `YYYY-MM-DD`, followed by the calendar id for non-ISO calendars.
impl fmt::Display for LocalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fields_text())?;
        if self.calendar != CalendarSystem::iso() {
            write!(f, " ({})", self.calendar.id())?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct LocalDateFields {
    year: i32,
    month: u8,
    day: u8,
    #[serde(default)]
    calendar: CalendarSystem,
}

impl From<LocalDate> for LocalDateFields {
    fn from(date: LocalDate) -> Self {
        LocalDateFields {
            year: date.year,
            month: date.month,
            day: date.day,
            calendar: date.calendar,
        }
    }
}

impl TryFrom<LocalDateFields> for LocalDate {
    type Error = TemporalError;

    fn try_from(fields: LocalDateFields) -> Result<Self> {
        LocalDate::new_in_calendar(fields.year, fields.month, fields.day, fields.calendar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn date(year: i32, month: u8, day: u8) -> LocalDate {
        LocalDate::new(year, month, day).unwrap()
    }

    #[test]
    fn test_construction_validates_fields() {
        assert!(LocalDate::new(2023, 2, 29).is_err());
        assert!(LocalDate::new(2024, 2, 29).is_ok());
        assert!(LocalDate::new(2024, 13, 1).is_err());
        assert!(LocalDate::new(2024, 4, 0).is_err());
        assert!(LocalDate::new(10_000, 1, 1).is_err());
        assert!(LocalDate::new_in_calendar(1700, 13, 6, CalendarSystem::coptic()).is_err());
        assert!(LocalDate::new_in_calendar(1715, 13, 6, CalendarSystem::coptic()).is_ok());
    }

    #[test]
    fn test_era_fields() {
        let d = date(-5, 3, 1);
        assert_eq!(d.era().unwrap(), Era::BEFORE_COMMON);
        assert_eq!(d.year_of_era().unwrap(), 6);
        let d = LocalDate::from_era(Era::BEFORE_COMMON, 6, 3, 1, CalendarSystem::iso()).unwrap();
        assert_eq!(d.year(), -5);
        assert!(LocalDate::from_era(Era::ANNO_MARTYRUM, 1, 1, 1, CalendarSystem::iso()).is_err());
    }

    #[test]
    fn test_day_of_week_and_year() {
        assert_eq!(date(1970, 1, 1).day_of_week(), IsoDayOfWeek::Thursday);
        assert_eq!(date(2024, 3, 10).day_of_week(), IsoDayOfWeek::Sunday);
        assert_eq!(date(1969, 12, 29).day_of_week(), IsoDayOfWeek::Monday);
        assert_eq!(date(2024, 12, 31).day_of_year(), 366);
        assert_eq!(date(2023, 3, 1).day_of_year(), 60);
        assert!(IsoDayOfWeek::from_number(0).is_err());
        assert_eq!(IsoDayOfWeek::from_number(7).unwrap(), IsoDayOfWeek::Sunday);
    }

    #[test]
    fn test_month_arithmetic_clamps_day() {
        assert_eq!(date(2001, 1, 31).plus_months(1).unwrap(), date(2001, 2, 28));
        assert_eq!(date(2000, 3, 31).plus_months(-1).unwrap(), date(2000, 2, 29));
        assert_eq!(date(2000, 11, 15).plus_months(3).unwrap(), date(2001, 2, 15));
        assert_eq!(date(2000, 1, 15).plus_months(-13).unwrap(), date(1998, 12, 15));
        assert_eq!(date(2000, 2, 29).plus_years(1).unwrap(), date(2001, 2, 28));
        assert_eq!(date(2000, 2, 29).plus_years(4).unwrap(), date(2004, 2, 29));
        assert!(date(9999, 12, 1).plus_months(1).is_err());
    }

    #[test]
    fn test_coptic_month_arithmetic() {
        let coptic = CalendarSystem::coptic();
        let d = LocalDate::new_in_calendar(1715, 12, 30, coptic).unwrap();
        let next = d.plus_months(1).unwrap();
        assert_eq!((next.year(), next.month(), next.day()), (1715, 13, 6));
        let after = next.plus_months(1).unwrap();
        assert_eq!((after.year(), after.month(), after.day()), (1716, 1, 6));
    }

    #[test]
    fn test_day_arithmetic_checks_range() {
        assert_eq!(date(2000, 2, 28).plus_days(2).unwrap(), date(2000, 3, 1));
        assert_eq!(date(2000, 1, 1).plus_weeks(-1).unwrap(), date(1999, 12, 25));
        assert!(date(9999, 12, 31).plus_days(1).is_err());
        assert!(date(-9998, 1, 1).plus_days(-1).is_err());
        assert!(date(2000, 1, 1).plus_days(i64::MAX).is_err());
    }

    #[test]
    fn test_plus_period() {
        let period = Period::from_years(1) + Period::from_months(1) + Period::from_days(1);
        assert_eq!(date(2000, 1, 31).plus_period(&period).unwrap(), date(2001, 3, 1));
        let err = date(2000, 1, 1)
            .plus_period(&Period::from_hours(1))
            .unwrap_err();
        assert!(matches!(err, TemporalError::Argument(_)));
    }

    #[test]
    fn test_next_and_previous_are_strict() {
        let sunday = date(2024, 3, 10);
        assert_eq!(sunday.next(IsoDayOfWeek::Sunday).unwrap(), date(2024, 3, 17));
        assert_eq!(sunday.next(IsoDayOfWeek::Monday).unwrap(), date(2024, 3, 11));
        assert_eq!(sunday.previous(IsoDayOfWeek::Sunday).unwrap(), date(2024, 3, 3));
        assert_eq!(sunday.previous(IsoDayOfWeek::Saturday).unwrap(), date(2024, 3, 9));
    }

    #[test]
    fn test_with_calendar_reprojects_same_day() {
        let iso = date(1970, 1, 1);
        let julian = iso.with_calendar(CalendarSystem::julian()).unwrap();
        assert_eq!((julian.year(), julian.month(), julian.day()), (1969, 12, 19));
        assert_eq!(julian.days_since_epoch(), 0);
        assert_eq!(julian.with_calendar(CalendarSystem::iso()).unwrap(), iso);

        let err = date(1, 1, 1)
            .with_calendar(CalendarSystem::coptic())
            .unwrap_err();
        assert!(matches!(err, TemporalError::Argument(_)));
    }

    #[test]
    fn test_comparison_requires_same_calendar() {
        let a = date(2000, 1, 1);
        let b = date(2000, 1, 2);
        assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
        assert!(a < b);
        let julian = a.with_calendar(CalendarSystem::julian()).unwrap();
        assert_eq!(
            a.compare(&julian).unwrap_err().kind(),
            ErrorKind::CalendarMismatch
        );
        assert_eq!(a.partial_cmp(&julian), None);
        assert_ne!(a, julian);
    }

    #[test]
    fn test_display() {
        assert_eq!(date(2024, 3, 9).to_string(), "2024-03-09");
        assert_eq!(date(-44, 3, 15).to_string(), "-0044-03-15");
        let coptic = LocalDate::new_in_calendar(1716, 1, 1, CalendarSystem::coptic()).unwrap();
        assert_eq!(coptic.to_string(), "1716-01-01 (Coptic)");
    }

    #[test]
    fn test_serde_field_tuple() {
        let d = LocalDate::new_in_calendar(2000, 1, 18, CalendarSystem::julian()).unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"year":2000,"month":1,"day":18,"calendar":"Julian"}"#);
        assert_eq!(serde_json::from_str::<LocalDate>(&json).unwrap(), d);

        let iso: LocalDate = serde_json::from_str(r#"{"year":2000,"month":2,"day":29}"#).unwrap();
        assert_eq!(iso, date(2000, 2, 29));

        let err = serde_json::from_str::<LocalDate>(r#"{"year":2000,"month":15,"day":1}"#)
            .unwrap_err();
        assert!(err.to_string().contains("month 15"));
        let err = serde_json::from_str::<LocalDate>(
            r#"{"year":2000,"month":1,"day":1,"calendar":"Mayan"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Mayan"));
    }
}
