//! Calendar-field magnitudes: years, months and so on down to nanoseconds.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::calendar::CalendarSystem;
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::local_date::LocalDate;
use crate::local_date_time::LocalDateTime;
use crate::local_time::LocalTime;
use crate::units::{
    NANOSECONDS_PER_DAY, NANOSECONDS_PER_HOUR, NANOSECONDS_PER_MILLISECOND,
    NANOSECONDS_PER_MINUTE, NANOSECONDS_PER_SECOND, NANOSECONDS_PER_TICK, NANOSECONDS_PER_WEEK,
};

const FIELD_COUNT: usize = 10;

/// One kind of field a [`Period`] can carry, largest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PeriodFieldType {
    Years = 0,
    Months = 1,
    Weeks = 2,
    Days = 3,
    Hours = 4,
    Minutes = 5,
    Seconds = 6,
    Milliseconds = 7,
    Ticks = 8,
    Nanoseconds = 9,
}

impl PeriodFieldType {
    pub const ALL: [PeriodFieldType; FIELD_COUNT] = [
        PeriodFieldType::Years,
        PeriodFieldType::Months,
        PeriodFieldType::Weeks,
        PeriodFieldType::Days,
        PeriodFieldType::Hours,
        PeriodFieldType::Minutes,
        PeriodFieldType::Seconds,
        PeriodFieldType::Milliseconds,
        PeriodFieldType::Ticks,
        PeriodFieldType::Nanoseconds,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// Hours and smaller.
    pub fn is_time(self) -> bool {
        self >= PeriodFieldType::Hours
    }

    /// Length of one unit, for fields with a fixed length. Years and months
    /// depend on the calendar and have none.
    pub fn nanoseconds_per_unit(self) -> Option<i64> {
        match self {
            PeriodFieldType::Years | PeriodFieldType::Months => None,
            PeriodFieldType::Weeks => Some(NANOSECONDS_PER_WEEK),
            PeriodFieldType::Days => Some(NANOSECONDS_PER_DAY),
            PeriodFieldType::Hours => Some(NANOSECONDS_PER_HOUR),
            PeriodFieldType::Minutes => Some(NANOSECONDS_PER_MINUTE),
            PeriodFieldType::Seconds => Some(NANOSECONDS_PER_SECOND),
            PeriodFieldType::Milliseconds => Some(NANOSECONDS_PER_MILLISECOND),
            PeriodFieldType::Ticks => Some(NANOSECONDS_PER_TICK),
            PeriodFieldType::Nanoseconds => Some(1),
        }
    }
}

use PeriodFieldType::{
    Days, Hours, Milliseconds, Minutes, Months, Nanoseconds, Seconds, Ticks, Weeks, Years,
};

/// A named, ordered set of fields.
///
/// The order is part of the type: [`index_of`](Self::index_of) gives the
/// same position for a field in every period of the type.
///
/// # Examples
///
/// ```
/// use tempora::{PeriodFieldType, PeriodType};
///
/// assert_eq!(PeriodType::DAY_TIME.index_of(PeriodFieldType::Days), Some(0));
/// assert_eq!(PeriodType::DAY_TIME.index_of(PeriodFieldType::Ticks), Some(5));
/// assert_eq!(PeriodType::DAY_TIME.index_of(PeriodFieldType::Years), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeriodType {
    name: &'static str,
    fields: &'static [PeriodFieldType],
}

impl PeriodType {
    pub const ALL_FIELDS: PeriodType = PeriodType {
        name: "AllFields",
        fields: &PeriodFieldType::ALL,
    };
    pub const STANDARD: PeriodType = PeriodType {
        name: "Standard",
        fields: &[Years, Months, Weeks, Days, Hours, Minutes, Seconds, Milliseconds],
    };
    pub const YEAR_MONTH_DAY_TIME: PeriodType = PeriodType {
        name: "YearMonthDayTime",
        fields: &[Years, Months, Days, Hours, Minutes, Seconds, Milliseconds],
    };
    pub const YEAR_MONTH_DAY: PeriodType = PeriodType {
        name: "YearMonthDay",
        fields: &[Years, Months, Days],
    };
    pub const YEAR_WEEK_DAY_TIME: PeriodType = PeriodType {
        name: "YearWeekDayTime",
        fields: &[Years, Weeks, Days, Hours, Minutes, Seconds, Milliseconds],
    };
    pub const YEAR_WEEK_DAY: PeriodType = PeriodType {
        name: "YearWeekDay",
        fields: &[Years, Weeks, Days],
    };
    pub const DAY_TIME: PeriodType = PeriodType {
        name: "DayTime",
        fields: &[Days, Hours, Minutes, Seconds, Milliseconds, Ticks],
    };
    pub const TIME: PeriodType = PeriodType {
        name: "Time",
        fields: &[Hours, Minutes, Seconds, Milliseconds, Ticks, Nanoseconds],
    };
    pub const YEARS: PeriodType = PeriodType {
        name: "Years",
        fields: &[Years],
    };
    pub const MONTHS: PeriodType = PeriodType {
        name: "Months",
        fields: &[Months],
    };
    pub const WEEKS: PeriodType = PeriodType {
        name: "Weeks",
        fields: &[Weeks],
    };
    pub const DAYS: PeriodType = PeriodType {
        name: "Days",
        fields: &[Days],
    };
    pub const HOURS: PeriodType = PeriodType {
        name: "Hours",
        fields: &[Hours],
    };
    pub const MINUTES: PeriodType = PeriodType {
        name: "Minutes",
        fields: &[Minutes],
    };
    pub const SECONDS: PeriodType = PeriodType {
        name: "Seconds",
        fields: &[Seconds],
    };
    pub const MILLISECONDS: PeriodType = PeriodType {
        name: "Milliseconds",
        fields: &[Milliseconds],
    };
    pub const TICKS: PeriodType = PeriodType {
        name: "Ticks",
        fields: &[Ticks],
    };
    pub const NANOSECONDS: PeriodType = PeriodType {
        name: "Nanoseconds",
        fields: &[Nanoseconds],
    };

    pub const PREDEFINED: [PeriodType; 18] = [
        PeriodType::ALL_FIELDS,
        PeriodType::STANDARD,
        PeriodType::YEAR_MONTH_DAY_TIME,
        PeriodType::YEAR_MONTH_DAY,
        PeriodType::YEAR_WEEK_DAY_TIME,
        PeriodType::YEAR_WEEK_DAY,
        PeriodType::DAY_TIME,
        PeriodType::TIME,
        PeriodType::YEARS,
        PeriodType::MONTHS,
        PeriodType::WEEKS,
        PeriodType::DAYS,
        PeriodType::HOURS,
        PeriodType::MINUTES,
        PeriodType::SECONDS,
        PeriodType::MILLISECONDS,
        PeriodType::TICKS,
        PeriodType::NANOSECONDS,
    ];

    /// # Errors
    ///
    /// Returns [`TemporalError::NotFound`] for a name that is not one of
    /// [`PREDEFINED`](Self::PREDEFINED).
    pub fn for_name(name: &str) -> Result<PeriodType> {
        PeriodType::PREDEFINED
            .into_iter()
            .find(|period_type| period_type.name == name)
            .ok_or_else(|| TemporalError::NotFound(format!("period type '{name}'")))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &'static [PeriodFieldType] {
        self.fields
    }

    pub fn size(&self) -> usize {
        self.fields.len()
    }

    pub fn field_at(&self, index: usize) -> Option<PeriodFieldType> {
        self.fields.get(index).copied()
    }

    /// Position of `field`, or `None` when the type lacks it.
    pub fn index_of(&self, field: PeriodFieldType) -> Option<usize> {
        self.fields.iter().position(|candidate| *candidate == field)
    }

    pub fn supports(&self, field: PeriodFieldType) -> bool {
        self.index_of(field).is_some()
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for PeriodType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

impl<'de> Deserialize<'de> for PeriodType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        PeriodType::for_name(&name).map_err(serde::de::Error::custom)
    }
}

/// An amount of time in calendar terms, such as "1 month and 3 hours".
///
/// Unlike a [`Duration`], a period has no fixed length until it is applied
/// to a date: one month from January 31st and one month from February 1st
/// cover different numbers of days. Fields are kept as given and never
/// normalized, so 90 minutes stays 90 minutes.
///
/// # Examples
///
/// ```
/// use tempora::{LocalDate, Period, PeriodType};
///
/// let start = LocalDate::new(2000, 1, 31).unwrap();
/// let end = LocalDate::new(2001, 3, 1).unwrap();
/// let period = Period::between_dates(start, end, PeriodType::YEAR_MONTH_DAY).unwrap();
/// assert_eq!(period.to_string(), "P1Y1M1D");
/// assert_eq!(start.plus_period(&period).unwrap(), end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PeriodFields", into = "PeriodFields")]
pub struct Period {
    period_type: PeriodType,
    /// Indexed by [`PeriodFieldType`]; zero for fields the type lacks.
    values: [i64; FIELD_COUNT],
}

impl Period {
    pub const ZERO: Period = Period {
        period_type: PeriodType::ALL_FIELDS,
        values: [0; FIELD_COUNT],
    };

    /// A period of `period_type` with one value per field, in the type's
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] when the number of values differs
    /// from the type's size.
    pub fn new(period_type: PeriodType, values: &[i64]) -> Result<Period> {
        if values.len() != period_type.size() {
            return Err(TemporalError::Argument(format!(
                "period type {period_type} has {} fields, got {} values",
                period_type.size(),
                values.len()
            )));
        }
        let mut period = Period {
            period_type,
            values: [0; FIELD_COUNT],
        };
        for (field, value) in period_type.fields.iter().zip(values) {
            period.values[field.slot()] = *value;
        }
        Ok(period)
    }

    fn single(period_type: PeriodType, field: PeriodFieldType, value: i64) -> Period {
        let mut values = [0; FIELD_COUNT];
        values[field.slot()] = value;
        Period {
            period_type,
            values,
        }
    }

    pub fn from_years(years: i64) -> Period {
        Period::single(PeriodType::YEARS, Years, years)
    }

    pub fn from_months(months: i64) -> Period {
        Period::single(PeriodType::MONTHS, Months, months)
    }

    pub fn from_weeks(weeks: i64) -> Period {
        Period::single(PeriodType::WEEKS, Weeks, weeks)
    }

    pub fn from_days(days: i64) -> Period {
        Period::single(PeriodType::DAYS, Days, days)
    }

    pub fn from_hours(hours: i64) -> Period {
        Period::single(PeriodType::HOURS, Hours, hours)
    }

    pub fn from_minutes(minutes: i64) -> Period {
        Period::single(PeriodType::MINUTES, Minutes, minutes)
    }

    pub fn from_seconds(seconds: i64) -> Period {
        Period::single(PeriodType::SECONDS, Seconds, seconds)
    }

    pub fn from_milliseconds(milliseconds: i64) -> Period {
        Period::single(PeriodType::MILLISECONDS, Milliseconds, milliseconds)
    }

    pub fn from_ticks(ticks: i64) -> Period {
        Period::single(PeriodType::TICKS, Ticks, ticks)
    }

    pub fn from_nanoseconds(nanoseconds: i64) -> Period {
        Period::single(PeriodType::NANOSECONDS, Nanoseconds, nanoseconds)
    }

    /// Splits a non-negative span shorter than a day across the
    /// [`PeriodType::TIME`] fields.
    pub(crate) fn from_nanosecond_of_day(nanoseconds: i64) -> Period {
        let mut values = [0; FIELD_COUNT];
        let mut remaining = nanoseconds;
        for field in PeriodType::TIME.fields {
            let unit = field.nanoseconds_per_unit().unwrap_or(1);
            values[field.slot()] = remaining / unit;
            remaining %= unit;
        }
        Period {
            period_type: PeriodType::TIME,
            values,
        }
    }

    pub fn period_type(&self) -> PeriodType {
        self.period_type
    }

    /// The value of `field`, zero when the type lacks it.
    pub fn get(&self, field: PeriodFieldType) -> i64 {
        self.values[field.slot()]
    }

    /// The value at `index` in the type's field order.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when `index` is not below the
    /// type's size.
    pub fn value_at(&self, index: usize) -> Result<i64> {
        self.period_type
            .field_at(index)
            .map(|field| self.get(field))
            .ok_or_else(|| TemporalError::out_of_range("period field index", index))
    }

    pub fn years(&self) -> i64 {
        self.get(Years)
    }

    pub fn months(&self) -> i64 {
        self.get(Months)
    }

    pub fn weeks(&self) -> i64 {
        self.get(Weeks)
    }

    pub fn days(&self) -> i64 {
        self.get(Days)
    }

    pub fn hours(&self) -> i64 {
        self.get(Hours)
    }

    pub fn minutes(&self) -> i64 {
        self.get(Minutes)
    }

    pub fn seconds(&self) -> i64 {
        self.get(Seconds)
    }

    pub fn milliseconds(&self) -> i64 {
        self.get(Milliseconds)
    }

    pub fn ticks(&self) -> i64 {
        self.get(Ticks)
    }

    pub fn nanoseconds(&self) -> i64 {
        self.get(Nanoseconds)
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|value| *value == 0)
    }

    pub fn has_time_fields(&self) -> bool {
        PeriodFieldType::ALL
            .iter()
            .any(|field| field.is_time() && self.get(*field) != 0)
    }

    /// Total length of the hour-and-smaller fields.
    pub fn time_nanoseconds(&self) -> i128 {
        PeriodFieldType::ALL
            .iter()
            .filter(|field| field.is_time())
            .map(|field| {
                i128::from(self.get(*field)) * i128::from(field.nanoseconds_per_unit().unwrap_or(1))
            })
            .sum()
    }

    /// The fixed-length equivalent, counting a day as 24 hours.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] when years or months are set.
    pub fn to_duration(&self) -> Result<Duration> {
        if self.years() != 0 || self.months() != 0 {
            return Err(TemporalError::Argument(format!(
                "{self} has years or months and no fixed duration"
            )));
        }
        let days = i128::from(self.weeks()) * 7 + i128::from(self.days());
        Ok(Duration::from_nanoseconds(
            days * i128::from(NANOSECONDS_PER_DAY) + self.time_nanoseconds(),
        ))
    }

    /// Fieldwise sum. Periods of different types sum to
    /// [`PeriodType::ALL_FIELDS`].
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when a field overflows.
    pub fn checked_add(&self, other: &Period) -> Result<Period> {
        let mut values = [0; FIELD_COUNT];
        for (slot, value) in values.iter_mut().enumerate() {
            *value = self.values[slot]
                .checked_add(other.values[slot])
                .ok_or_else(|| TemporalError::out_of_range("sum of periods", self))?;
        }
        let period_type = if self.period_type == other.period_type {
            self.period_type
        } else {
            PeriodType::ALL_FIELDS
        };
        Ok(Period {
            period_type,
            values,
        })
    }

    /// Fieldwise negation.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when a field is `i64::MIN`.
    pub fn checked_neg(&self) -> Result<Period> {
        let mut values = [0; FIELD_COUNT];
        for (slot, value) in values.iter_mut().enumerate() {
            *value = self.values[slot]
                .checked_neg()
                .ok_or_else(|| TemporalError::out_of_range("negated period", self))?;
        }
        Ok(Period {
            period_type: self.period_type,
            values,
        })
    }

    /// The period which, added to `start`, reaches `end`, using only the
    /// fields of `period_type`.
    ///
    /// Fields are filled largest first, each with the most units that do
    /// not pass `end`. Whatever is smaller than the type's smallest field
    /// is dropped. When `end` is before `start` the result is the negation
    /// of the period from `end` to `start`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::CalendarMismatch`] when the values use
    /// different calendars, and [`TemporalError::OutOfRange`] when a field
    /// cannot hold its share of the difference.
    pub fn between(
        start: LocalDateTime,
        end: LocalDateTime,
        period_type: PeriodType,
    ) -> Result<Period> {
        if start.compare(&end)? == Ordering::Greater {
            return Period::between(end, start, period_type)?.checked_neg();
        }

        let mut values = [0; FIELD_COUNT];
        let mut reached = start;
        for field in period_type.fields.iter().filter(|field| !field.is_time()) {
            let (count, landed) = fill_date_field(&reached, &end, *field)?;
            values[field.slot()] = count;
            reached = landed;
        }

        let mut remaining = reached.nanoseconds_until(&end)?;
        for field in period_type.fields.iter().filter(|field| field.is_time()) {
            let unit = i128::from(field.nanoseconds_per_unit().unwrap_or(1));
            let count = remaining / unit;
            values[field.slot()] = i64::try_from(count)
                .map_err(|_| TemporalError::out_of_range("period field value", count))?;
            remaining -= count * unit;
        }

        Ok(Period {
            period_type,
            values,
        })
    }

    pub fn between_dates(
        start: LocalDate,
        end: LocalDate,
        period_type: PeriodType,
    ) -> Result<Period> {
        Period::between(start.at_midnight(), end.at_midnight(), period_type)
    }

    /// Both times are taken on the same day, so date fields stay zero.
    pub fn between_times(
        start: LocalTime,
        end: LocalTime,
        period_type: PeriodType,
    ) -> Result<Period> {
        let day = LocalDate::from_days_unchecked(0, CalendarSystem::iso());
        Period::between(day.at(start), day.at(end), period_type)
    }
}

/// The most units of `field` that can be added to `from` without passing
/// `to`, with the value they land on.
fn fill_date_field(
    from: &LocalDateTime,
    to: &LocalDateTime,
    field: PeriodFieldType,
) -> Result<(i64, LocalDateTime)> {
    let estimate = match field {
        Years => i64::from(to.year()) - i64::from(from.year()),
        Months => {
            let per_year = i64::from(from.calendar().raw_months_in_year(from.year()));
            (i64::from(to.year()) - i64::from(from.year())) * per_year
                + i64::from(to.month())
                - i64::from(from.month())
        }
        Weeks => from.date().days_until(&to.date())? / 7,
        _ => from.date().days_until(&to.date())?,
    };

    let try_add = |count: i64| -> Result<Option<LocalDateTime>> {
        let moved = match field {
            Years => from.plus_years(count),
            Months => from.plus_months(count),
            Weeks => from.plus_weeks(count),
            _ => from.plus_days(count),
        };
        match moved {
            Ok(candidate) if candidate.compare(to)? != Ordering::Greater => Ok(Some(candidate)),
            _ => Ok(None),
        }
    };

    // Zero units always fit, so both loops stop.
    let mut count = estimate.max(0);
    let mut landed = loop {
        if let Some(candidate) = try_add(count)? {
            break candidate;
        }
        count -= 1;
    };
    while let Some(candidate) = try_add(count + 1)? {
        count += 1;
        landed = candidate;
    }
    Ok((count, landed))
}

impl Add for Period {
    type Output = Period;

    /// # Panics
    ///
    /// Panics when a field overflows; see [`Period::checked_add`].
    fn add(self, other: Period) -> Period {
        match self.checked_add(&other) {
            Ok(sum) => sum,
            Err(err) => panic!("{err}"),
        }
    }
}

impl Neg for Period {
    type Output = Period;

    /// # Panics
    ///
    /// Panics when a field is `i64::MIN`; see [`Period::checked_neg`].
    fn neg(self) -> Period {
        match self.checked_neg() {
            Ok(negated) => negated,
            Err(err) => panic!("{err}"),
        }
    }
}

/// ISO 8601 form such as `P1Y2M3DT4H5M6.5S`. Sub-second fields are shown
/// as fractional seconds; a zero period is `P0D`.
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("P0D");
        }
        f.write_str("P")?;
        for (field, designator) in [(Years, 'Y'), (Months, 'M'), (Weeks, 'W'), (Days, 'D')] {
            if self.get(field) != 0 {
                write!(f, "{}{designator}", self.get(field))?;
            }
        }

        let seconds = i128::from(self.seconds()) * i128::from(NANOSECONDS_PER_SECOND)
            + i128::from(self.milliseconds()) * i128::from(NANOSECONDS_PER_MILLISECOND)
            + i128::from(self.ticks()) * i128::from(NANOSECONDS_PER_TICK)
            + i128::from(self.nanoseconds());
        if self.hours() == 0 && self.minutes() == 0 && seconds == 0 {
            return Ok(());
        }
        f.write_str("T")?;
        if self.hours() != 0 {
            write!(f, "{}H", self.hours())?;
        }
        if self.minutes() != 0 {
            write!(f, "{}M", self.minutes())?;
        }
        if seconds != 0 {
            let whole = seconds / i128::from(NANOSECONDS_PER_SECOND);
            let fraction = (seconds % i128::from(NANOSECONDS_PER_SECOND)).abs();
            if seconds < 0 && whole == 0 {
                f.write_str("-")?;
            }
            write!(f, "{whole}")?;
            if fraction != 0 {
                let digits = format!("{fraction:09}");
                write!(f, ".{}", digits.trim_end_matches('0'))?;
            }
            f.write_str("S")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct PeriodFields {
    #[serde(rename = "type")]
    period_type: PeriodType,
    values: Vec<i64>,
}

impl From<Period> for PeriodFields {
    fn from(period: Period) -> Self {
        PeriodFields {
            period_type: period.period_type,
            values: period
                .period_type
                .fields
                .iter()
                .map(|field| period.get(*field))
                .collect(),
        }
    }
}

impl TryFrom<PeriodFields> for Period {
    type Error = TemporalError;

    fn try_from(fields: PeriodFields) -> Result<Self> {
        Period::new(fields.period_type, &fields.values)
    }
}
