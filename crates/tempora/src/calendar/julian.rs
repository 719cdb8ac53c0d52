//! Julian calendar arithmetic: every fourth year is a leap year.

use super::gregorian::DAYS_FROM_YEAR_ONE_TO_UNIX_EPOCH;
use super::YearMonthDayCalculator;

const DAYS_BEFORE_MONTH: [u16; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DAYS_IN_MONTH: [u8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Julian 0001-01-01 falls two days before Gregorian 0001-01-01.
const JULIAN_YEAR_ONE_OFFSET: i64 = -2;

#[derive(Debug)]
pub(crate) struct JulianCalculator;

fn is_julian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

impl YearMonthDayCalculator for JulianCalculator {
    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        if month == 2 && is_julian_leap_year(year) {
            29
        } else {
            DAYS_IN_MONTH[usize::from(month - 1)]
        }
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_julian_leap_year(year)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if is_julian_leap_year(year) {
            366
        } else {
            365
        }
    }

    fn start_of_year_in_days(&self, year: i32) -> i32 {
        let y = year as i64 - 1;
        let days = 365 * y + y.div_euclid(4) + JULIAN_YEAR_ONE_OFFSET;
        (days - DAYS_FROM_YEAR_ONE_TO_UNIX_EPOCH) as i32
    }

    fn days_before_month(&self, year: i32, month: u8) -> u16 {
        let leap_day = u16::from(month > 2 && is_julian_leap_year(year));
        DAYS_BEFORE_MONTH[usize::from(month - 1)] + leap_day
    }

    fn average_days_per_10_years(&self) -> i32 {
        3653
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::gregorian::GregorianCalculator;

    #[test]
    fn test_julian_lags_gregorian_by_thirteen_days_in_modern_era() {
        // Julian 1970-01-01 is Gregorian 1970-01-14.
        assert_eq!(JulianCalculator.days_since_epoch(1970, 1, 1), 13);
        let gregorian = GregorianCalculator.days_since_epoch(2024, 3, 14);
        assert_eq!(JulianCalculator.fields_from_days(gregorian), (2024, 3, 1));
    }

    #[test]
    fn test_century_years_are_leap() {
        assert!(JulianCalculator.is_leap_year(1900));
        assert_eq!(JulianCalculator.days_in_month(1900, 2), 29);
        assert!(!JulianCalculator.is_leap_year(1901));
    }

    #[test]
    fn test_year_one_alignment() {
        let julian = JulianCalculator.days_since_epoch(1, 1, 1);
        let gregorian = GregorianCalculator.days_since_epoch(1, 1, 1);
        assert_eq!(gregorian - julian, 2);
        assert_eq!(GregorianCalculator.fields_from_days(julian), (0, 12, 30));
    }
}
