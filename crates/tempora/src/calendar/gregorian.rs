//! Proleptic Gregorian arithmetic, shared by the ISO and Gregorian calendars.

use super::YearMonthDayCalculator;

/// Days from 0001-01-01 to 1970-01-01 in the proleptic Gregorian calendar.
pub(crate) const DAYS_FROM_YEAR_ONE_TO_UNIX_EPOCH: i64 = 719_162;

const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Debug)]
pub(crate) struct GregorianCalculator;

pub(crate) fn is_gregorian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0 && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0)
}

/// Day number (relative to 1970-01-01) of January 1st of `year`.
pub(crate) const fn gregorian_start_of_year(year: i32) -> i32 {
    let y = year as i64 - 1;
    let days = 365 * y + y.div_euclid(4) - y.div_euclid(100) + y.div_euclid(400);
    (days - DAYS_FROM_YEAR_ONE_TO_UNIX_EPOCH) as i32
}

impl YearMonthDayCalculator for GregorianCalculator {
    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        if month == 2 && is_gregorian_leap_year(year) {
            29
        } else {
            DAYS_IN_MONTH[usize::from(month - 1)]
        }
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_gregorian_leap_year(year)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if is_gregorian_leap_year(year) {
            366
        } else {
            365
        }
    }

    fn start_of_year_in_days(&self, year: i32) -> i32 {
        gregorian_start_of_year(year)
    }

    fn days_before_month(&self, year: i32, month: u8) -> u16 {
        let leap_day = u16::from(month > 2 && is_gregorian_leap_year(year));
        DAYS_BEFORE_MONTH[usize::from(month - 1)] + leap_day
    }

    fn average_days_per_10_years(&self) -> i32 {
        3652
    }
}
