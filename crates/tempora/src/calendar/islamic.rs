//! Tabular (arithmetic) Islamic calendar.
//!
//! Months alternate between 30 and 29 days, with the twelfth month gaining a
//! day in leap years. Eleven leap years fall in each 30-year cycle; which
//! ones depends on the [`IslamicLeapYearPattern`].

use serde::{Deserialize, Serialize};

use super::YearMonthDayCalculator;

/// Which years of the 30-year cycle are leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IslamicLeapYearPattern {
    /// Leap years 2, 5, 7, 10, 13, 15, 18, 21, 24, 26, 29.
    Base15,
    /// Leap years 2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29.
    Base16,
    /// Leap years 2, 5, 8, 10, 13, 16, 19, 21, 24, 27, 29.
    Indian,
    /// Leap years 2, 5, 8, 11, 13, 16, 19, 21, 24, 27, 30.
    HabashAlHasib,
}

/// The day on which 1 Muharram 1 AH falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IslamicEpoch {
    /// Thursday, Julian 622-07-15.
    Astronomical,
    /// Friday, Julian 622-07-16.
    Civil,
}

impl IslamicLeapYearPattern {
    pub const ALL: [IslamicLeapYearPattern; 4] = [
        IslamicLeapYearPattern::Base15,
        IslamicLeapYearPattern::Base16,
        IslamicLeapYearPattern::Indian,
        IslamicLeapYearPattern::HabashAlHasib,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IslamicLeapYearPattern::Base15 => "Base15",
            IslamicLeapYearPattern::Base16 => "Base16",
            IslamicLeapYearPattern::Indian => "Indian",
            IslamicLeapYearPattern::HabashAlHasib => "HabashAlHasib",
        }
    }

    /// Bit `n` is set when year `n` (1-based) of the cycle is a leap year.
    const fn mask(&self) -> u32 {
        const fn bits(years: [u32; 11]) -> u32 {
            let mut mask = 0;
            let mut i = 0;
            while i < years.len() {
                mask |= 1 << years[i];
                i += 1;
            }
            mask
        }
        match self {
            IslamicLeapYearPattern::Base15 => bits([2, 5, 7, 10, 13, 15, 18, 21, 24, 26, 29]),
            IslamicLeapYearPattern::Base16 => bits([2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29]),
            IslamicLeapYearPattern::Indian => bits([2, 5, 8, 10, 13, 16, 19, 21, 24, 27, 29]),
            IslamicLeapYearPattern::HabashAlHasib => {
                bits([2, 5, 8, 11, 13, 16, 19, 21, 24, 27, 30])
            }
        }
    }
}

impl IslamicEpoch {
    pub const ALL: [IslamicEpoch; 2] = [IslamicEpoch::Astronomical, IslamicEpoch::Civil];

    pub fn name(&self) -> &'static str {
        match self {
            IslamicEpoch::Astronomical => "Astronomical",
            IslamicEpoch::Civil => "Civil",
        }
    }

    const fn days_since_unix_epoch(&self) -> i32 {
        match self {
            IslamicEpoch::Astronomical => -492_149,
            IslamicEpoch::Civil => -492_148,
        }
    }
}

const DAYS_PER_30_YEAR_CYCLE: i64 = 30 * 354 + 11;

#[derive(Debug)]
pub(crate) struct IslamicCalculator {
    pattern: IslamicLeapYearPattern,
    epoch: IslamicEpoch,
}

impl IslamicCalculator {
    pub(crate) const fn new(pattern: IslamicLeapYearPattern, epoch: IslamicEpoch) -> Self {
        IslamicCalculator { pattern, epoch }
    }

    fn leap_years_before(&self, year: i32) -> i64 {
        let elapsed = year as i64 - 1;
        let cycles = elapsed.div_euclid(30);
        let year_in_cycle = elapsed.rem_euclid(30) as u32;
        let prefix = (1u32 << (year_in_cycle + 1)) - 1;
        cycles * 11 + i64::from((self.pattern.mask() & prefix).count_ones())
    }
}

impl YearMonthDayCalculator for IslamicCalculator {
    fn months_in_year(&self, _year: i32) -> u8 {
        12
    }

    fn days_in_month(&self, year: i32, month: u8) -> u8 {
        if month == 12 && self.is_leap_year(year) {
            30
        } else if month % 2 == 1 {
            30
        } else {
            29
        }
    }

    fn is_leap_year(&self, year: i32) -> bool {
        let year_in_cycle = (year - 1).rem_euclid(30) + 1;
        self.pattern.mask() & (1 << year_in_cycle) != 0
    }

    fn days_in_year(&self, year: i32) -> u16 {
        if self.is_leap_year(year) {
            355
        } else {
            354
        }
    }

    fn start_of_year_in_days(&self, year: i32) -> i32 {
        let days = self.epoch.days_since_unix_epoch() as i64
            + 354 * (year as i64 - 1)
            + self.leap_years_before(year);
        days as i32
    }

    fn days_before_month(&self, _year: i32, month: u8) -> u16 {
        let m = u16::from(month);
        29 * (m - 1) + m / 2
    }

    fn average_days_per_10_years(&self) -> i32 {
        (DAYS_PER_30_YEAR_CYCLE / 3) as i32
    }
}
