//! Eras and the per-calendar tables that map year-of-era to absolute years.

use std::fmt;

/// A named, calendar-scoped range of years.
///
/// Eras compare by name, so `Era::COMMON` in the ISO calendar is the same
/// era as `Era::COMMON` in the Julian calendar. Whether a calendar uses a
/// given era is decided by that calendar's era table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Era {
    name: &'static str,
    abbreviation: &'static str,
}

impl Era {
    /// Years on or after year 1 in the ISO, Gregorian and Julian calendars.
    pub const COMMON: Era = Era::new("Common", "CE");
    /// Years before year 1 in the ISO, Gregorian and Julian calendars.
    pub const BEFORE_COMMON: Era = Era::new("BeforeCommon", "BCE");
    /// The single era of the Coptic calendar (Era of the Martyrs).
    pub const ANNO_MARTYRUM: Era = Era::new("AnnoMartyrum", "AM");
    /// The single era of the Islamic calendar.
    pub const ANNO_HEGIRAE: Era = Era::new("AnnoHegirae", "EH");

    const fn new(name: &'static str, abbreviation: &'static str) -> Self {
        Era { name, abbreviation }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn abbreviation(&self) -> &'static str {
        self.abbreviation
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// How an era counts its years relative to the absolute year number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EraDirection {
    /// Year-of-era 1 is `first_year`; later absolute years count upwards.
    Forward { first_year: i32 },
    /// Year-of-era 1 is `last_year`; earlier absolute years count upwards.
    Backward { last_year: i32 },
}

/// One entry of a calendar's era table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EraRange {
    pub(crate) era: Era,
    pub(crate) direction: EraDirection,
}

impl EraRange {
    pub(crate) const fn forward(era: Era, first_year: i32) -> Self {
        EraRange {
            era,
            direction: EraDirection::Forward { first_year },
        }
    }

    pub(crate) const fn backward(era: Era, last_year: i32) -> Self {
        EraRange {
            era,
            direction: EraDirection::Backward { last_year },
        }
    }

    /// The absolute years this era covers, clipped to the calendar's range.
    pub(crate) fn absolute_years(&self, min_year: i32, max_year: i32) -> (i32, i32) {
        match self.direction {
            EraDirection::Forward { first_year } => (first_year.max(min_year), max_year),
            EraDirection::Backward { last_year } => (min_year, last_year.min(max_year)),
        }
    }

    pub(crate) fn contains_year(&self, year: i32, min_year: i32, max_year: i32) -> bool {
        let (low, high) = self.absolute_years(min_year, max_year);
        (low..=high).contains(&year)
    }

    pub(crate) fn year_of_era(&self, year: i32) -> i32 {
        match self.direction {
            EraDirection::Forward { first_year } => year - first_year + 1,
            EraDirection::Backward { last_year } => last_year - year + 1,
        }
    }

    pub(crate) fn absolute_year(&self, year_of_era: i32) -> i32 {
        match self.direction {
            EraDirection::Forward { first_year } => first_year + year_of_era - 1,
            EraDirection::Backward { last_year } => last_year - year_of_era + 1,
        }
    }

    /// Inclusive bounds of year-of-era within the calendar's range.
    pub(crate) fn year_of_era_bounds(&self, min_year: i32, max_year: i32) -> (i32, i32) {
        let (low, high) = self.absolute_years(min_year, max_year);
        let a = self.year_of_era(low);
        let b = self.year_of_era(high);
        (a.min(b), a.max(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_era_counts_up_from_first_year() {
        let range = EraRange::forward(Era::COMMON, 1);
        assert_eq!(range.year_of_era(1), 1);
        assert_eq!(range.year_of_era(2024), 2024);
        assert_eq!(range.absolute_year(2024), 2024);
        assert_eq!(range.year_of_era_bounds(-9998, 9999), (1, 9999));
    }

    #[test]
    fn test_backward_era_counts_down_from_last_year() {
        let range = EraRange::backward(Era::BEFORE_COMMON, 0);
        assert_eq!(range.year_of_era(0), 1);
        assert_eq!(range.year_of_era(-1), 2);
        assert_eq!(range.absolute_year(2), -1);
        assert_eq!(range.year_of_era_bounds(-9998, 9999), (1, 9999));
        assert!(range.contains_year(-9998, -9998, 9999));
        assert!(!range.contains_year(1, -9998, 9999));
    }

    #[test]
    fn test_era_equality_is_by_name() {
        assert_eq!(Era::COMMON, Era::new("Common", "CE"));
        assert_ne!(Era::COMMON, Era::BEFORE_COMMON);
        assert_eq!(Era::ANNO_MARTYRUM.abbreviation(), "AM");
        assert_eq!(Era::ANNO_HEGIRAE.to_string(), "AnnoHegirae");
    }
}
