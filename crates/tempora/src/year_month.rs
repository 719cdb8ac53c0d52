//! A month within a year of one calendar.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarSystem;
use crate::error::{Result, TemporalError};
use crate::interval::DateInterval;
use crate::local_date::LocalDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "YearMonthFields", into = "YearMonthFields")]
pub struct YearMonth {
    year: i32,
    month: u8,
    calendar: CalendarSystem,
}

impl YearMonth {
    pub fn new(year: i32, month: u8) -> Result<Self> {
        Self::new_in_calendar(year, month, CalendarSystem::iso())
    }

    pub fn new_in_calendar(year: i32, month: u8, calendar: CalendarSystem) -> Result<Self> {
        calendar.validate_year_month(year, month)?;
        Ok(YearMonth {
            year,
            month,
            calendar,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn calendar(&self) -> CalendarSystem {
        self.calendar
    }

    pub fn days_in_month(&self) -> u8 {
        self.calendar.raw_days_in_month(self.year, self.month)
    }

    pub fn start_date(&self) -> Result<LocalDate> {
        self.on_day_of_month(1)
    }

    pub fn end_date(&self) -> Result<LocalDate> {
        self.on_day_of_month(self.days_in_month())
    }

    pub fn on_day_of_month(&self, day: u8) -> Result<LocalDate> {
        LocalDate::new_in_calendar(self.year, self.month, day, self.calendar)
    }

    /// The whole month as an inclusive interval.
    pub fn to_date_interval(&self) -> Result<DateInterval> {
        DateInterval::new(self.start_date()?, self.end_date()?, true)
    }

    pub fn plus_months(&self, months: i64) -> Result<YearMonth> {
        let date = self.start_date()?.plus_months(months)?;
        Ok(YearMonth {
            year: date.year(),
            month: date.month(),
            calendar: self.calendar,
        })
    }

    pub fn contains(&self, date: &LocalDate) -> Result<bool> {
        if date.calendar() != self.calendar {
            return Err(TemporalError::CalendarMismatch(format!(
                "{date} is not in the {} calendar",
                self.calendar.id()
            )));
        }
        Ok(date.year() == self.year && date.month() == self.month)
    }
}

impl From<LocalDate> for YearMonth {
    fn from(date: LocalDate) -> Self {
        YearMonth {
            year: date.year(),
            month: date.month(),
            calendar: date.calendar(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}-{:02}", -i64::from(self.year), self.month)?;
        } else {
            write!(f, "{:04}-{:02}", self.year, self.month)?;
        }
        if self.calendar != CalendarSystem::iso() {
            write!(f, " ({})", self.calendar.id())?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct YearMonthFields {
    year: i32,
    month: u8,
    #[serde(default)]
    calendar: CalendarSystem,
}

impl From<YearMonth> for YearMonthFields {
    fn from(value: YearMonth) -> Self {
        YearMonthFields {
            year: value.year,
            month: value.month,
            calendar: value.calendar,
        }
    }
}

impl TryFrom<YearMonthFields> for YearMonth {
    type Error = TemporalError;

    fn try_from(fields: YearMonthFields) -> Result<Self> {
        YearMonth::new_in_calendar(fields.year, fields.month, fields.calendar)
    }
}
