//! Calendar systems.
//!
//! A [`CalendarSystem`] converts between a linear day count (days since
//! 1970-01-01 ISO) and civil year/month/day fields, and names years through
//! its era table. Each calendar family is a strategy object behind the
//! crate-private [`YearMonthDayCalculator`] trait; the public type is a
//! copyable handle to one of a fixed set of `static` definitions, so every
//! calendar id has exactly one canonical instance and lookups are free of
//! synchronization.
//!
//! | id | years | eras |
//! |---|---|---|
//! | `ISO`, `Gregorian` | -9998 ..= 9999 | BeforeCommon, Common |
//! | `Julian` | -9997 ..= 9998 | BeforeCommon, Common |
//! | `Coptic` | 1 ..= 9715 | AnnoMartyrum |
//! | `Hijri <epoch>-<pattern>` | 1 ..= 9665 | AnnoHegirae |

mod coptic;
mod era;
pub(crate) mod gregorian;
mod islamic;
mod julian;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::RefUnwindSafe;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, TemporalError};

pub use era::Era;
pub use islamic::{IslamicEpoch, IslamicLeapYearPattern};

use coptic::CopticCalculator;
use era::EraRange;
use gregorian::GregorianCalculator;
use islamic::IslamicCalculator;
use julian::JulianCalculator;

// ── Calculator strategy ─────────────────────────────────────────────────────

/// Pure field arithmetic for one calendar family.
///
/// Inputs are trusted: [`CalendarSystem`] validates years, months and days
/// before calling in. Every year of a calendar has the same number of
/// months.
pub(crate) trait YearMonthDayCalculator: Send + Sync + RefUnwindSafe + fmt::Debug {
    fn months_in_year(&self, year: i32) -> u8;
    fn days_in_month(&self, year: i32, month: u8) -> u8;
    fn is_leap_year(&self, year: i32) -> bool;
    fn days_in_year(&self, year: i32) -> u16;
    /// Days since 1970-01-01 of the first day of `year`.
    fn start_of_year_in_days(&self, year: i32) -> i32;
    fn days_before_month(&self, year: i32, month: u8) -> u16;
    /// Used only to estimate a year from a day count.
    fn average_days_per_10_years(&self) -> i32;

    fn days_since_epoch(&self, year: i32, month: u8, day: u8) -> i32 {
        self.start_of_year_in_days(year)
            + i32::from(self.days_before_month(year, month))
            + i32::from(day)
            - 1
    }

    fn year_from_days(&self, days: i32) -> i32 {
        let since_year_one = days as i64 - self.start_of_year_in_days(1) as i64;
        let estimate = (since_year_one * 10).div_euclid(self.average_days_per_10_years() as i64);
        let mut year = (estimate + 1) as i32;
        while self.start_of_year_in_days(year) > days {
            year -= 1;
        }
        while self.start_of_year_in_days(year + 1) <= days {
            year += 1;
        }
        year
    }

    fn fields_from_days(&self, days: i32) -> (i32, u8, u8) {
        let year = self.year_from_days(days);
        let mut remaining = days - self.start_of_year_in_days(year);
        let mut month = 1;
        loop {
            let length = i32::from(self.days_in_month(year, month));
            if remaining < length || month == self.months_in_year(year) {
                break;
            }
            remaining -= length;
            month += 1;
        }
        (year, month, (remaining + 1) as u8)
    }
}

// ── Canonical definitions ───────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct CalendarDefinition {
    id: &'static str,
    min_year: i32,
    max_year: i32,
    eras: &'static [EraRange],
    calculator: &'static dyn YearMonthDayCalculator,
}

const COMMON_ERAS: &[EraRange] = &[
    EraRange::backward(Era::BEFORE_COMMON, 0),
    EraRange::forward(Era::COMMON, 1),
];

static ISO: CalendarDefinition = CalendarDefinition {
    id: "ISO",
    min_year: -9998,
    max_year: 9999,
    eras: COMMON_ERAS,
    calculator: &GregorianCalculator,
};

static GREGORIAN: CalendarDefinition = CalendarDefinition {
    id: "Gregorian",
    min_year: -9998,
    max_year: 9999,
    eras: COMMON_ERAS,
    calculator: &GregorianCalculator,
};

static JULIAN: CalendarDefinition = CalendarDefinition {
    id: "Julian",
    min_year: -9997,
    max_year: 9998,
    eras: COMMON_ERAS,
    calculator: &JulianCalculator,
};

static COPTIC: CalendarDefinition = CalendarDefinition {
    id: "Coptic",
    min_year: 1,
    max_year: 9715,
    eras: &[EraRange::forward(Era::ANNO_MARTYRUM, 1)],
    calculator: &CopticCalculator,
};

macro_rules! islamic_definition {
    ($id:literal, $pattern:ident, $epoch:ident) => {
        CalendarDefinition {
            id: $id,
            min_year: 1,
            max_year: 9665,
            eras: &[EraRange::forward(Era::ANNO_HEGIRAE, 1)],
            calculator: &IslamicCalculator::new(
                IslamicLeapYearPattern::$pattern,
                IslamicEpoch::$epoch,
            ),
        }
    };
}

/// Indexed by `pattern * 2 + epoch`.
static ISLAMIC: [CalendarDefinition; 8] = [
    islamic_definition!("Hijri Astronomical-Base15", Base15, Astronomical),
    islamic_definition!("Hijri Civil-Base15", Base15, Civil),
    islamic_definition!("Hijri Astronomical-Base16", Base16, Astronomical),
    islamic_definition!("Hijri Civil-Base16", Base16, Civil),
    islamic_definition!("Hijri Astronomical-Indian", Indian, Astronomical),
    islamic_definition!("Hijri Civil-Indian", Indian, Civil),
    islamic_definition!("Hijri Astronomical-HabashAlHasib", HabashAlHasib, Astronomical),
    islamic_definition!("Hijri Civil-HabashAlHasib", HabashAlHasib, Civil),
];

// ── CalendarSystem ──────────────────────────────────────────────────────────

/// A calendar system: the rules mapping a day to year, month and day fields.
///
/// Two handles are equal exactly when they name the same calendar id.
///
/// # Examples
///
/// ```
/// use tempora::{CalendarSystem, Era};
///
/// let coptic = CalendarSystem::for_id("Coptic").unwrap();
/// assert_eq!(coptic, CalendarSystem::coptic());
/// assert_eq!(coptic.get_absolute_year(1, Era::ANNO_MARTYRUM).unwrap(), 1);
/// assert!(coptic.is_leap_year(1715).unwrap());
/// ```
#[derive(Clone, Copy)]
pub struct CalendarSystem {
    definition: &'static CalendarDefinition,
}

impl CalendarSystem {
    pub fn iso() -> Self {
        CalendarSystem { definition: &ISO }
    }

    pub fn gregorian() -> Self {
        CalendarSystem {
            definition: &GREGORIAN,
        }
    }

    pub fn julian() -> Self {
        CalendarSystem { definition: &JULIAN }
    }

    pub fn coptic() -> Self {
        CalendarSystem { definition: &COPTIC }
    }

    pub fn islamic(pattern: IslamicLeapYearPattern, epoch: IslamicEpoch) -> Self {
        let pattern_index = match pattern {
            IslamicLeapYearPattern::Base15 => 0,
            IslamicLeapYearPattern::Base16 => 1,
            IslamicLeapYearPattern::Indian => 2,
            IslamicLeapYearPattern::HabashAlHasib => 3,
        };
        let epoch_index = match epoch {
            IslamicEpoch::Astronomical => 0,
            IslamicEpoch::Civil => 1,
        };
        CalendarSystem {
            definition: &ISLAMIC[pattern_index * 2 + epoch_index],
        }
    }

    fn all() -> impl Iterator<Item = CalendarSystem> {
        [&ISO, &GREGORIAN, &JULIAN, &COPTIC]
            .into_iter()
            .chain(ISLAMIC.iter())
            .map(|definition| CalendarSystem { definition })
    }

    /// Every calendar id accepted by [`CalendarSystem::for_id`].
    pub fn ids() -> Vec<&'static str> {
        Self::all().map(|calendar| calendar.id()).collect()
    }

    /// Looks up the canonical calendar for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::NotFound`] for an unknown id.
    pub fn for_id(id: &str) -> Result<Self> {
        Self::all()
            .find(|calendar| calendar.id() == id)
            .ok_or_else(|| TemporalError::NotFound(format!("calendar '{id}'")))
    }

    pub fn id(&self) -> &'static str {
        self.definition.id
    }

    pub fn min_year(&self) -> i32 {
        self.definition.min_year
    }

    pub fn max_year(&self) -> i32 {
        self.definition.max_year
    }

    pub fn eras(&self) -> Vec<Era> {
        self.definition.eras.iter().map(|range| range.era).collect()
    }

    fn calculator(&self) -> &'static dyn YearMonthDayCalculator {
        self.definition.calculator
    }

    fn era_range(&self, era: Era) -> Result<&'static EraRange> {
        self.definition
            .eras
            .iter()
            .find(|range| range.era == era)
            .ok_or_else(|| {
                TemporalError::Argument(format!(
                    "era {era} is not used by the {} calendar",
                    self.id()
                ))
            })
    }

    // ── Validation ──────────────────────────────────────────────────────

    pub(crate) fn validate_year(&self, year: i32) -> Result<()> {
        if (self.min_year()..=self.max_year()).contains(&year) {
            Ok(())
        } else {
            Err(TemporalError::OutOfRange(format!(
                "year {year} is outside [{}, {}] for the {} calendar",
                self.min_year(),
                self.max_year(),
                self.id()
            )))
        }
    }

    pub(crate) fn validate_year_month(&self, year: i32, month: u8) -> Result<()> {
        self.validate_year(year)?;
        let months = self.calculator().months_in_year(year);
        if (1..=months).contains(&month) {
            Ok(())
        } else {
            Err(TemporalError::OutOfRange(format!(
                "month {month} is outside [1, {months}] in year {year} of the {} calendar",
                self.id()
            )))
        }
    }

    pub(crate) fn validate_year_month_day(&self, year: i32, month: u8, day: u8) -> Result<()> {
        self.validate_year_month(year, month)?;
        let days = self.calculator().days_in_month(year, month);
        if (1..=days).contains(&day) {
            Ok(())
        } else {
            Err(TemporalError::OutOfRange(format!(
                "day {day} is outside [1, {days}] in {year}-{month:02} of the {} calendar",
                self.id()
            )))
        }
    }

    // ── Eras ────────────────────────────────────────────────────────────

    /// Smallest valid year-of-era for `era` in this calendar.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] if this calendar does not use `era`.
    pub fn get_min_year_of_era(&self, era: Era) -> Result<i32> {
        let range = self.era_range(era)?;
        Ok(range.year_of_era_bounds(self.min_year(), self.max_year()).0)
    }

    /// Largest valid year-of-era for `era` in this calendar.
    pub fn get_max_year_of_era(&self, era: Era) -> Result<i32> {
        let range = self.era_range(era)?;
        Ok(range.year_of_era_bounds(self.min_year(), self.max_year()).1)
    }

    /// Converts a year-of-era into this calendar's absolute year number.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] for an era this calendar does not
    /// use, or [`TemporalError::OutOfRange`] when `year_of_era` is outside
    /// [`get_min_year_of_era`](Self::get_min_year_of_era) ..=
    /// [`get_max_year_of_era`](Self::get_max_year_of_era).
    pub fn get_absolute_year(&self, year_of_era: i32, era: Era) -> Result<i32> {
        let range = self.era_range(era)?;
        let (min, max) = range.year_of_era_bounds(self.min_year(), self.max_year());
        if !(min..=max).contains(&year_of_era) {
            return Err(TemporalError::OutOfRange(format!(
                "year of era {year_of_era} is outside [{min}, {max}] for era {era} of the {} calendar",
                self.id()
            )));
        }
        Ok(range.absolute_year(year_of_era))
    }

    fn era_range_for_year(&self, year: i32) -> Result<&'static EraRange> {
        self.validate_year(year)?;
        self.definition
            .eras
            .iter()
            .find(|range| range.contains_year(year, self.min_year(), self.max_year()))
            .ok_or_else(|| {
                TemporalError::OutOfRange(format!(
                    "year {year} is not covered by any era of the {} calendar",
                    self.id()
                ))
            })
    }

    /// The era containing absolute `year`.
    pub fn get_era(&self, year: i32) -> Result<Era> {
        Ok(self.era_range_for_year(year)?.era)
    }

    /// The year-of-era of absolute `year`, within [`get_era`](Self::get_era).
    pub fn get_year_of_era(&self, year: i32) -> Result<i32> {
        Ok(self.era_range_for_year(year)?.year_of_era(year))
    }

    // ── Field queries ───────────────────────────────────────────────────

    pub fn is_leap_year(&self, year: i32) -> Result<bool> {
        self.validate_year(year)?;
        Ok(self.calculator().is_leap_year(year))
    }

    pub fn months_in_year(&self, year: i32) -> Result<u8> {
        self.validate_year(year)?;
        Ok(self.calculator().months_in_year(year))
    }

    pub fn days_in_month(&self, year: i32, month: u8) -> Result<u8> {
        self.validate_year_month(year, month)?;
        Ok(self.calculator().days_in_month(year, month))
    }

    pub fn days_in_year(&self, year: i32) -> Result<u16> {
        self.validate_year(year)?;
        Ok(self.calculator().days_in_year(year))
    }

    /// First representable day, as days since 1970-01-01.
    pub fn min_days(&self) -> i32 {
        self.calculator().start_of_year_in_days(self.min_year())
    }

    /// Last representable day, as days since 1970-01-01.
    pub fn max_days(&self) -> i32 {
        self.calculator().start_of_year_in_days(self.max_year() + 1) - 1
    }

    /// Days since 1970-01-01 of the given date.
    pub fn days_since_epoch(&self, year: i32, month: u8, day: u8) -> Result<i32> {
        self.validate_year_month_day(year, month, day)?;
        Ok(self.calculator().days_since_epoch(year, month, day))
    }

    /// Inverse of [`days_since_epoch`](Self::days_since_epoch).
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when `days` is outside
    /// [`min_days`](Self::min_days) ..= [`max_days`](Self::max_days).
    pub fn fields_from_days(&self, days: i32) -> Result<(i32, u8, u8)> {
        self.validate_days(days)?;
        Ok(self.calculator().fields_from_days(days))
    }

    pub(crate) fn validate_days(&self, days: i32) -> Result<()> {
        if (self.min_days()..=self.max_days()).contains(&days) {
            Ok(())
        } else {
            Err(TemporalError::OutOfRange(format!(
                "day {days} is outside the range of the {} calendar",
                self.id()
            )))
        }
    }

    // Unchecked accessors for values already validated by a LocalDate.

    pub(crate) fn raw_days_since_epoch(&self, year: i32, month: u8, day: u8) -> i32 {
        self.calculator().days_since_epoch(year, month, day)
    }

    pub(crate) fn raw_fields_from_days(&self, days: i32) -> (i32, u8, u8) {
        self.calculator().fields_from_days(days)
    }

    pub(crate) fn raw_days_in_month(&self, year: i32, month: u8) -> u8 {
        self.calculator().days_in_month(year, month)
    }

    pub(crate) fn raw_months_in_year(&self, year: i32) -> u8 {
        self.calculator().months_in_year(year)
    }

    pub(crate) fn raw_days_before_month(&self, year: i32, month: u8) -> u16 {
        self.calculator().days_before_month(year, month)
    }
}

impl Default for CalendarSystem {
    fn default() -> Self {
        CalendarSystem::iso()
    }
}

impl PartialEq for CalendarSystem {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.definition, other.definition) || self.id() == other.id()
    }
}

impl Eq for CalendarSystem {}

impl Hash for CalendarSystem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id().hash(state);
    }
}

impl fmt::Debug for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CalendarSystem").field(&self.id()).finish()
    }
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl Serialize for CalendarSystem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for CalendarSystem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        CalendarSystem::for_id(&id).map_err(serde::de::Error::custom)
    }
}
