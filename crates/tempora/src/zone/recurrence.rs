//! Yearly recurring transitions, used as the open-ended tail of a zone.

use crate::calendar::CalendarSystem;
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::local_date::{IsoDayOfWeek, LocalDate};
use crate::local_time::LocalTime;
use crate::offset::Offset;
use crate::zone::{DateTimeZone, ZoneInterval};

/// Which clock a [`ZoneYearOffset`]'s time of day is read on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionMode {
    Utc,
    /// Local wall time in force just before the transition.
    Wall,
    /// Local standard time, ignoring daylight saving.
    Standard,
}

/// A point in a year, such as "the last Sunday of March at 01:00 UTC".
///
/// `day_of_month` counts from the end of the month when negative (-1 is
/// the last day). With a `day_of_week` the date moves to the nearest such
/// weekday, forwards when `advance` is set and backwards otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneYearOffset {
    mode: TransitionMode,
    month: u8,
    day_of_month: i8,
    day_of_week: Option<IsoDayOfWeek>,
    advance: bool,
    time_of_day: LocalTime,
}

impl ZoneYearOffset {
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] for a month outside `1..=12` or
    /// a day of month outside `-31..=31` or zero.
    pub fn new(
        mode: TransitionMode,
        month: u8,
        day_of_month: i8,
        day_of_week: Option<IsoDayOfWeek>,
        advance: bool,
        time_of_day: LocalTime,
    ) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(TemporalError::out_of_range("month", month));
        }
        if day_of_month == 0 || !(-31..=31).contains(&day_of_month) {
            return Err(TemporalError::out_of_range("day of month", day_of_month));
        }
        Ok(ZoneYearOffset {
            mode,
            month,
            day_of_month,
            day_of_week,
            advance,
            time_of_day,
        })
    }

    /// The last `day_of_week` of `month`.
    pub fn last_weekday(
        mode: TransitionMode,
        month: u8,
        day_of_week: IsoDayOfWeek,
        time_of_day: LocalTime,
    ) -> Result<Self> {
        Self::new(mode, month, -1, Some(day_of_week), false, time_of_day)
    }

    /// The first `day_of_week` on or after `day_of_month`; `(8, Sunday)` is
    /// the second Sunday.
    pub fn weekday_on_or_after(
        mode: TransitionMode,
        month: u8,
        day_of_month: i8,
        day_of_week: IsoDayOfWeek,
        time_of_day: LocalTime,
    ) -> Result<Self> {
        Self::new(mode, month, day_of_month, Some(day_of_week), true, time_of_day)
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    /// The ISO date this offset falls on in `year`.
    fn date_in_year(&self, year: i32) -> Result<LocalDate> {
        let length = CalendarSystem::iso().days_in_month(year, self.month)?;
        let day = if self.day_of_month > 0 {
            self.day_of_month.unsigned_abs().min(length)
        } else {
            let from_end = i16::from(length) + i16::from(self.day_of_month) + 1;
            from_end.max(1) as u8
        };
        let date = LocalDate::new(year, self.month, day)?;
        let Some(target) = self.day_of_week else {
            return Ok(date);
        };
        let mut difference = i64::from(target.number()) - i64::from(date.day_of_week().number());
        if self.advance && difference < 0 {
            difference += 7;
        } else if !self.advance && difference > 0 {
            difference -= 7;
        }
        date.plus_days(difference)
    }

    /// The instant of this offset in `year`, given the standard offset and
    /// the savings in force before the transition.
    pub(crate) fn occurrence(
        &self,
        year: i32,
        standard: Offset,
        savings_before: Offset,
    ) -> Result<Instant> {
        let local = self.date_in_year(year)?.at(self.time_of_day);
        let offset = match self.mode {
            TransitionMode::Utc => Offset::ZERO,
            TransitionMode::Standard => standard,
            TransitionMode::Wall => standard.plus(savings_before)?,
        };
        local.to_instant_at(offset)
    }
}

/// One of the two alternating rules of a daylight saving scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneRecurrence {
    name: String,
    savings: Offset,
    year_offset: ZoneYearOffset,
}

impl ZoneRecurrence {
    /// A rule switching to `savings` (added to standard time) under the
    /// interval name `name`.
    pub fn new(name: impl Into<String>, savings: Offset, year_offset: ZoneYearOffset) -> Self {
        ZoneRecurrence {
            name: name.into(),
            savings,
            year_offset,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn savings(&self) -> Offset {
        self.savings
    }

    pub fn year_offset(&self) -> ZoneYearOffset {
        self.year_offset
    }
}

/// An infinite zone alternating between standard and daylight time every
/// year, as zone rules do after their last explicit change.
///
/// # Examples
///
/// ```
/// use tempora::{
///     DateTimeZone, Instant, IsoDayOfWeek, LocalTime, Offset,
///     StandardDaylightAlternatingMap, TransitionMode, ZoneRecurrence, ZoneYearOffset,
/// };
///
/// let one_am = LocalTime::new(1, 0, 0)?;
/// let summer = ZoneRecurrence::new(
///     "BST",
///     Offset::from_hours(1)?,
///     ZoneYearOffset::last_weekday(TransitionMode::Utc, 3, IsoDayOfWeek::Sunday, one_am)?,
/// );
/// let winter = ZoneRecurrence::new(
///     "GMT",
///     Offset::ZERO,
///     ZoneYearOffset::last_weekday(TransitionMode::Utc, 10, IsoDayOfWeek::Sunday, one_am)?,
/// );
/// let london =
///     StandardDaylightAlternatingMap::new("Europe/London", Offset::ZERO, summer, winter)?;
///
/// let midsummer = Instant::from_unix_seconds(1_719_000_000)?;
/// assert_eq!(london.get_zone_interval(midsummer).name(), "BST");
/// # Ok::<(), tempora::TemporalError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StandardDaylightAlternatingMap {
    id: String,
    standard_offset: Offset,
    daylight: ZoneRecurrence,
    standard: ZoneRecurrence,
    daylight_offset: Offset,
    min_offset: Offset,
    max_offset: Offset,
}

impl StandardDaylightAlternatingMap {
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] unless `standard` has zero
    /// savings and `daylight` non-zero savings, or a range error when the
    /// daylight wall offset leaves the offset range.
    pub fn new(
        id: impl Into<String>,
        standard_offset: Offset,
        daylight: ZoneRecurrence,
        standard: ZoneRecurrence,
    ) -> Result<Self> {
        let id = id.into();
        if standard.savings != Offset::ZERO || daylight.savings == Offset::ZERO {
            return Err(TemporalError::Argument(format!(
                "zone '{id}' needs one rule with savings and one without"
            )));
        }
        let daylight_offset = standard_offset.plus(daylight.savings)?;
        Ok(StandardDaylightAlternatingMap {
            id,
            standard_offset,
            min_offset: standard_offset.min(daylight_offset),
            max_offset: standard_offset.max(daylight_offset),
            daylight_offset,
            daylight,
            standard,
        })
    }

    pub fn standard_offset(&self) -> Offset {
        self.standard_offset
    }

    /// Transitions in `year`, each paired with the rule taking effect.
    ///
    /// An occurrence outside the instant range is left out, so the
    /// intervals at either end of time stay open.
    fn transitions_in(&self, year: i32) -> impl Iterator<Item = (Instant, &ZoneRecurrence)> {
        let into_daylight = self
            .daylight
            .year_offset
            .occurrence(year, self.standard_offset, self.standard.savings)
            .ok()
            .map(|at| (at, &self.daylight));
        let into_standard = self
            .standard
            .year_offset
            .occurrence(year, self.standard_offset, self.daylight.savings)
            .ok()
            .map(|at| (at, &self.standard));
        into_daylight.into_iter().chain(into_standard)
    }

    fn interval_for(
        &self,
        rule: &ZoneRecurrence,
        start: Option<Instant>,
        end: Option<Instant>,
    ) -> ZoneInterval {
        let wall_offset = if rule.savings == Offset::ZERO {
            self.standard_offset
        } else {
            self.daylight_offset
        };
        ZoneInterval {
            name: rule.name.clone(),
            start,
            end,
            wall_offset,
            savings: rule.savings,
        }
    }
}

impl DateTimeZone for StandardDaylightAlternatingMap {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_zone_interval(&self, instant: Instant) -> ZoneInterval {
        let year = instant.in_utc().local().year();
        let mut transitions: Vec<(Instant, &ZoneRecurrence)> = (year - 1..=year + 1)
            .flat_map(|year| self.transitions_in(year))
            .collect();
        transitions.sort_by_key(|(at, _)| *at);

        let index = transitions.partition_point(|(at, _)| *at <= instant);
        let start = index.checked_sub(1).map(|i| transitions[i]);
        let end = transitions.get(index).copied();
        let rule = match (start, end) {
            (Some((_, rule)), _) => rule,
            (None, Some((_, next))) if next == &self.daylight => &self.standard,
            (None, Some(_)) => &self.daylight,
            (None, None) => &self.standard,
        };
        self.interval_for(rule, start.map(|(at, _)| at), end.map(|(at, _)| at))
    }

    fn min_offset(&self) -> Offset {
        self.min_offset
    }

    fn max_offset(&self) -> Offset {
        self.max_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_date_time::LocalDateTime;

    fn hours(value: i32) -> Offset {
        Offset::from_hours(value).unwrap()
    }

    fn time(hour: u32) -> LocalTime {
        LocalTime::new(hour, 0, 0).unwrap()
    }

    /// United States Eastern rules since 2007.
    fn new_york() -> StandardDaylightAlternatingMap {
        let daylight = ZoneRecurrence::new(
            "EDT",
            hours(1),
            ZoneYearOffset::weekday_on_or_after(
                TransitionMode::Wall,
                3,
                8,
                IsoDayOfWeek::Sunday,
                time(2),
            )
            .unwrap(),
        );
        let standard = ZoneRecurrence::new(
            "EST",
            Offset::ZERO,
            ZoneYearOffset::weekday_on_or_after(
                TransitionMode::Wall,
                11,
                1,
                IsoDayOfWeek::Sunday,
                time(2),
            )
            .unwrap(),
        );
        StandardDaylightAlternatingMap::new("America/New_York", hours(-5), daylight, standard)
            .unwrap()
    }

    fn at(year: i32, month: u8, day: u8, hour: u32) -> LocalDateTime {
        LocalDateTime::from_fields(year, month, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_year_offset_dates() {
        let last_sunday =
            ZoneYearOffset::last_weekday(TransitionMode::Utc, 3, IsoDayOfWeek::Sunday, time(1))
                .unwrap();
        assert_eq!(last_sunday.date_in_year(2024).unwrap(), LocalDate::new(2024, 3, 31).unwrap());
        assert_eq!(last_sunday.date_in_year(2023).unwrap(), LocalDate::new(2023, 3, 26).unwrap());
        let second_sunday = ZoneYearOffset::weekday_on_or_after(
            TransitionMode::Wall,
            3,
            8,
            IsoDayOfWeek::Sunday,
            time(2),
        )
        .unwrap();
        assert_eq!(second_sunday.date_in_year(2024).unwrap(), LocalDate::new(2024, 3, 10).unwrap());
        let plain = ZoneYearOffset::new(TransitionMode::Utc, 2, 31, None, false, time(0)).unwrap();
        assert_eq!(plain.date_in_year(2023).unwrap(), LocalDate::new(2023, 2, 28).unwrap());
        assert!(ZoneYearOffset::new(TransitionMode::Utc, 13, 1, None, false, time(0)).is_err());
        assert!(ZoneYearOffset::new(TransitionMode::Utc, 1, 0, None, false, time(0)).is_err());
    }

    #[test]
    fn test_transitions_follow_wall_time() {
        let zone = new_york();
        let spring = at(2024, 3, 10, 7).to_instant_at(Offset::ZERO).unwrap();
        let autumn = at(2024, 11, 3, 6).to_instant_at(Offset::ZERO).unwrap();
        let january = at(2024, 1, 15, 12).to_instant_at(Offset::ZERO).unwrap();
        assert_eq!(zone.get_offset_from_utc(january), hours(-5));
        assert_eq!(zone.next_transition(january), Some(spring));
        assert_eq!(zone.next_transition(spring), Some(autumn));
        assert_eq!(zone.previous_transition(autumn), Some(spring));

        let summer = zone.get_zone_interval(spring);
        assert_eq!(summer.name(), "EDT");
        assert_eq!(summer.wall_offset(), hours(-4));
        assert_eq!(summer.savings(), hours(1));
        assert_eq!((summer.start(), summer.end()), (Some(spring), Some(autumn)));
    }

    #[test]
    fn test_local_mapping_in_rule_zone() {
        let zone = new_york();
        assert_eq!(zone.map_local(&at(2030, 3, 10, 2)).count(), 0);
        assert_eq!(zone.map_local(&at(2030, 11, 3, 1)).count(), 2);
        assert_eq!(zone.map_local(&at(2030, 7, 4, 12)).count(), 1);
        assert_eq!(zone.get_offset_from_local(&at(2030, 11, 3, 1)), hours(-4));
    }

    #[test]
    fn test_intervals_stay_open_at_the_ends_of_time() {
        let zone = new_york();
        let first = zone.get_zone_interval(Instant::MIN_VALUE);
        assert_eq!(first.name(), "EST");
        assert_eq!(first.start(), None);
        assert!(first.end().is_some());
        let last = zone.get_zone_interval(Instant::MAX_VALUE);
        assert_eq!(last.name(), "EST");
        assert!(last.start().is_some());
        assert_eq!(last.end(), None);
        assert_eq!(zone.next_transition(Instant::MAX_VALUE), None);
    }

    #[test]
    fn test_rules_must_alternate() {
        let rule = ZoneRecurrence::new(
            "X",
            Offset::ZERO,
            ZoneYearOffset::new(TransitionMode::Utc, 1, 1, None, false, time(0)).unwrap(),
        );
        let zone = StandardDaylightAlternatingMap::new("bad", Offset::ZERO, rule.clone(), rule);
        assert!(zone.is_err());
    }
}
