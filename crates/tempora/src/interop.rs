//! Conversions to and from `chrono` types.
//!
//! chrono dates are proleptic Gregorian, so values in other calendars are
//! converted to ISO first.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::calendar::CalendarSystem;
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::local_date::LocalDate;
use crate::local_date_time::LocalDateTime;
use crate::local_time::LocalTime;
use crate::offset::Offset;
use crate::units::{MILLISECONDS_PER_SECOND, NANOSECONDS_PER_SECOND};

impl TryFrom<NaiveDate> for LocalDate {
    type Error = TemporalError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        // chrono months and days are 1-based and at most 31.
        LocalDate::new(date.year(), date.month() as u8, date.day() as u8)
    }
}

impl TryFrom<LocalDate> for NaiveDate {
    type Error = TemporalError;

    fn try_from(date: LocalDate) -> Result<Self> {
        let iso = date.with_calendar(CalendarSystem::iso())?;
        NaiveDate::from_ymd_opt(iso.year(), u32::from(iso.month()), u32::from(iso.day()))
            .ok_or_else(|| TemporalError::out_of_range("chrono date", iso))
    }
}

/// Leap seconds, which chrono spells as a nanosecond past one billion, are
/// rejected.
impl TryFrom<NaiveTime> for LocalTime {
    type Error = TemporalError;

    fn try_from(time: NaiveTime) -> Result<Self> {
        LocalTime::with_nanos(time.hour(), time.minute(), time.second(), time.nanosecond())
    }
}

impl From<LocalTime> for NaiveTime {
    fn from(time: LocalTime) -> Self {
        let seconds = time.nanosecond_of_day() / NANOSECONDS_PER_SECOND;
        let nanos = time.nanosecond_of_day() % NANOSECONDS_PER_SECOND;
        // Both parts are in range for any time of day.
        NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, nanos as u32)
            .unwrap_or_default()
    }
}

impl TryFrom<NaiveDateTime> for LocalDateTime {
    type Error = TemporalError;

    fn try_from(value: NaiveDateTime) -> Result<Self> {
        Ok(LocalDateTime::new(value.date().try_into()?, value.time().try_into()?))
    }
}

impl TryFrom<LocalDateTime> for NaiveDateTime {
    type Error = TemporalError;

    fn try_from(value: LocalDateTime) -> Result<Self> {
        let date: NaiveDate = value.date().try_into()?;
        Ok(date.and_time(value.time().into()))
    }
}

impl TryFrom<DateTime<Utc>> for Instant {
    type Error = TemporalError;

    fn try_from(value: DateTime<Utc>) -> Result<Self> {
        let nanoseconds = i128::from(value.timestamp()) * i128::from(NANOSECONDS_PER_SECOND)
            + i128::from(value.timestamp_subsec_nanos());
        Instant::from_unix_nanoseconds(nanoseconds)
    }
}

impl TryFrom<Instant> for DateTime<Utc> {
    type Error = TemporalError;

    fn try_from(instant: Instant) -> Result<Self> {
        let nanoseconds = instant.to_unix_nanoseconds();
        let seconds = nanoseconds.div_euclid(i128::from(NANOSECONDS_PER_SECOND)) as i64;
        let subsec = nanoseconds.rem_euclid(i128::from(NANOSECONDS_PER_SECOND)) as u32;
        DateTime::from_timestamp(seconds, subsec)
            .ok_or_else(|| TemporalError::out_of_range("chrono instant", instant))
    }
}

impl TryFrom<FixedOffset> for Offset {
    type Error = TemporalError;

    fn try_from(offset: FixedOffset) -> Result<Self> {
        Offset::from_seconds(i64::from(offset.local_minus_utc()))
    }
}

/// Offsets with a sub-second part are rejected.
impl TryFrom<Offset> for FixedOffset {
    type Error = TemporalError;

    fn try_from(offset: Offset) -> Result<Self> {
        let milliseconds = i64::from(offset.total_milliseconds());
        if milliseconds % MILLISECONDS_PER_SECOND != 0 {
            return Err(TemporalError::Argument(format!(
                "offset {offset} is not a whole number of seconds"
            )));
        }
        FixedOffset::east_opt((milliseconds / MILLISECONDS_PER_SECOND) as i32)
            .ok_or_else(|| TemporalError::out_of_range("chrono offset", offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_dates_convert_through_iso() {
        let naive = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let date = LocalDate::try_from(naive).unwrap();
        assert_eq!(date, LocalDate::new(2024, 2, 29).unwrap());
        let julian = date.with_calendar(CalendarSystem::julian()).unwrap();
        assert_eq!(NaiveDate::try_from(julian).unwrap(), naive);

        let far = NaiveDate::from_ymd_opt(20_000, 1, 1).unwrap();
        assert_eq!(LocalDate::try_from(far).unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_times_and_leap_seconds() {
        let naive = NaiveTime::from_hms_nano_opt(23, 59, 59, 123_456_789).unwrap();
        let time = LocalTime::try_from(naive).unwrap();
        assert_eq!(time.nanosecond_of_second(), 123_456_789);
        assert_eq!(NaiveTime::from(time), naive);
        let leap = NaiveTime::from_hms_milli_opt(23, 59, 59, 1_500).unwrap();
        assert!(LocalTime::try_from(leap).is_err());
    }

    #[test]
    fn test_date_times_and_instants() {
        let naive = NaiveDate::from_ymd_opt(1969, 7, 20)
            .unwrap()
            .and_hms_opt(20, 17, 40)
            .unwrap();
        let local = LocalDateTime::try_from(naive).unwrap();
        assert_eq!(local, LocalDateTime::from_fields(1969, 7, 20, 20, 17, 40).unwrap());
        assert_eq!(NaiveDateTime::try_from(local).unwrap(), naive);

        let utc = naive.and_utc();
        let instant = Instant::try_from(utc).unwrap();
        assert_eq!(instant.to_unix_seconds(), -14_182_940);
        assert_eq!(DateTime::<Utc>::try_from(instant).unwrap(), utc);
    }

    #[test]
    fn test_offsets() {
        let east = FixedOffset::east_opt(5 * 3_600 + 30 * 60).unwrap();
        let offset = Offset::try_from(east).unwrap();
        assert_eq!(offset, Offset::from_hours_and_minutes(5, 30).unwrap());
        assert_eq!(FixedOffset::try_from(offset).unwrap(), east);
        let west = FixedOffset::west_opt(86_399).unwrap();
        assert_eq!(Offset::try_from(west).unwrap().total_milliseconds(), -86_399_000);
        let odd = Offset::from_milliseconds(1_500).unwrap();
        assert!(FixedOffset::try_from(odd).is_err());
    }
}
