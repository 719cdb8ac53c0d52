//! Coptic calendar arithmetic: twelve 30-day months plus a short thirteenth.

use super::YearMonthDayCalculator;

/// 1 Thout 1 AM (Julian 284-08-29) as days since 1970-01-01.
const COPTIC_EPOCH_DAYS: i32 = -615_558;

#[derive(Debug)]
pub(crate) struct CopticCalculator;

fn is_coptic_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 3
}

impl YearMonthDayCalculator for CopticCalculator {
    fn months_in_year(&self, _year: i32) -> u8 {
        13
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        match month {
            13 if is_coptic_leap_year(year) => 6,
            13 => 5,
            _ => 30,
        }
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_coptic_leap_year(year)
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if is_coptic_leap_year(year) {
            366
        } else {
            365
        }
    }

    fn start_of_year_in_days(&self, year: i32) -> i32 {
        let y = year as i64;
        (COPTIC_EPOCH_DAYS as i64 + 365 * (y - 1) + y.div_euclid(4)) as i32
    }

    fn days_before_month(&self, _year: i32, month: u8) -> u16 {
        30 * u16::from(month - 1)
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
    fn test_epoch_matches_julian_284_08_29() {
        let julian = crate::calendar::julian::JulianCalculator;
        assert_eq!(
            CopticCalculator.days_since_epoch(1, 1, 1),
            julian.days_since_epoch(284, 8, 29)
        );
    }

    #[test]
    fn test_new_year_before_gregorian_leap_year_is_september_12() {
        // Coptic 1715 is a leap year, so 1716 starts on 1999-09-12.
        let days = CopticCalculator.days_since_epoch(1716, 1, 1);
        assert_eq!(GregorianCalculator.fields_from_days(days), (1999, 9, 12));
        let days = CopticCalculator.days_since_epoch(1717, 1, 1);
        assert_eq!(GregorianCalculator.fields_from_days(days), (2000, 9, 11));
    }

    #[test]
    fn test_thirteenth_month_length() {
        assert_eq!(CopticCalculator.days_in_month(1715, 13), 6);
        assert_eq!(CopticCalculator.days_in_month(1716, 13), 5);
        assert_eq!(CopticCalculator.days_in_month(1716, 12), 30);
        let last_day = CopticCalculator.days_since_epoch(1715, 13, 6);
        assert_eq!(CopticCalculator.fields_from_days(last_day), (1715, 13, 6));
        assert_eq!(CopticCalculator.fields_from_days(last_day + 1), (1716, 1, 1));
    }
}
