//! Local date and time resolved in a zone.

use std::fmt;
use std::sync::Arc;

use crate::calendar::CalendarSystem;
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::local_date::LocalDate;
use crate::local_date_time::LocalDateTime;
use crate::local_time::LocalTime;
use crate::offset::Offset;
use crate::zone::{DateTimeZone, FixedDateTimeZone, ZoneInterval, ZoneLocalMapping};

/// An instant together with the local date, time and offset it has in a
/// zone.
///
/// Values are produced by resolving an instant or a local date and time in
/// a zone, so the three views always agree.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tempora::{DateTimeZone, FixedDateTimeZone, Instant, LocalDateTime, Offset, ZonedDateTime};
///
/// let tokyo = FixedDateTimeZone::new(Offset::from_hours(9).unwrap());
/// let zone: Arc<dyn DateTimeZone> = Arc::new(tokyo);
/// let zoned = Instant::UNIX_EPOCH.in_zone(zone.clone()).unwrap();
/// assert_eq!(zoned.local(), LocalDateTime::from_fields(1970, 1, 1, 9, 0, 0).unwrap());
///
/// let back = ZonedDateTime::at_strictly(zoned.local(), zone).unwrap();
/// assert_eq!(back.to_instant(), Instant::UNIX_EPOCH);
/// ```
#[derive(Debug, Clone)]
pub struct ZonedDateTime {
    instant: Instant,
    local: LocalDateTime,
    offset: Offset,
    zone: Arc<dyn DateTimeZone>,
}

impl ZonedDateTime {
    /// # Errors
    ///
    /// Returns [`TemporalError::OutOfRange`] when the local date falls
    /// outside `calendar`.
    pub fn from_instant(
        instant: Instant,
        zone: Arc<dyn DateTimeZone>,
        calendar: CalendarSystem,
    ) -> Result<Self> {
        let offset = zone.get_offset_from_utc(instant);
        let local = LocalDateTime::from_local_instant(instant.plus_offset(offset), calendar)?;
        Ok(ZonedDateTime {
            instant,
            local,
            offset,
            zone,
        })
    }

    /// Every instant has an ISO date in UTC.
    pub(crate) fn from_utc_instant(instant: Instant) -> Self {
        let local = LocalDateTime::new(
            LocalDate::from_days_unchecked(instant.days_since_epoch(), CalendarSystem::iso()),
            LocalTime::from_nanosecond_of_day_unchecked(instant.nanosecond_of_day()),
        );
        ZonedDateTime {
            instant,
            local,
            offset: Offset::ZERO,
            zone: Arc::new(FixedDateTimeZone::utc()),
        }
    }

    /// Resolves `local` in `zone`, requiring exactly one matching instant.
    ///
    /// # Errors
    ///
    /// Returns [`TemporalError::SkippedTime`] when clocks jumped over
    /// `local`, and [`TemporalError::AmbiguousTime`] when it occurred twice.
    pub fn at_strictly(local: LocalDateTime, zone: Arc<dyn DateTimeZone>) -> Result<Self> {
        match zone.map_local(&local) {
            ZoneLocalMapping::Unambiguous(interval) => Self::in_interval(local, &interval, zone),
            ZoneLocalMapping::Ambiguous { .. } => Err(TemporalError::AmbiguousTime(format!(
                "{local} occurs twice in zone {}",
                zone.id()
            ))),
            ZoneLocalMapping::Skipped { .. } => Err(TemporalError::SkippedTime(format!(
                "{local} does not occur in zone {}",
                zone.id()
            ))),
        }
    }

    /// Resolves `local` in `zone` with the policy of
    /// [`DateTimeZone::get_offset_from_local`]: the earlier instant of an
    /// ambiguous time, and a skipped time moved forward by the gap.
    ///
    /// # Errors
    ///
    /// Fails only when the result leaves the instant or calendar range.
    pub fn at_leniently(local: LocalDateTime, zone: Arc<dyn DateTimeZone>) -> Result<Self> {
        match zone.map_local(&local) {
            ZoneLocalMapping::Unambiguous(interval)
            | ZoneLocalMapping::Ambiguous {
                earlier: interval, ..
            } => Self::in_interval(local, &interval, zone),
            ZoneLocalMapping::Skipped { before, .. } => {
                let instant = local.to_instant_at(before.wall_offset())?;
                Self::from_instant(instant, zone, local.calendar())
            }
        }
    }

    fn in_interval(
        local: LocalDateTime,
        interval: &ZoneInterval,
        zone: Arc<dyn DateTimeZone>,
    ) -> Result<Self> {
        let offset = interval.wall_offset();
        Ok(ZonedDateTime {
            instant: local.to_instant_at(offset)?,
            local,
            offset,
            zone,
        })
    }

    pub fn to_instant(&self) -> Instant {
        self.instant
    }

    pub fn local(&self) -> LocalDateTime {
        self.local
    }

    pub fn date(&self) -> LocalDate {
        self.local.date()
    }

    pub fn time(&self) -> LocalTime {
        self.local.time()
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn zone(&self) -> &Arc<dyn DateTimeZone> {
        &self.zone
    }

    pub fn calendar(&self) -> CalendarSystem {
        self.local.calendar()
    }

    pub fn zone_interval(&self) -> ZoneInterval {
        self.zone.get_zone_interval(self.instant)
    }

    /// The same instant in another zone.
    pub fn with_zone(&self, zone: Arc<dyn DateTimeZone>) -> Result<Self> {
        Self::from_instant(self.instant, zone, self.calendar())
    }

    pub fn with_calendar(&self, calendar: CalendarSystem) -> Result<Self> {
        Self::from_instant(self.instant, Arc::clone(&self.zone), calendar)
    }

    /// Moves along the timeline, so the local time may jump at transitions.
    pub fn plus(&self, duration: Duration) -> Result<Self> {
        Self::from_instant(self.instant.plus(duration)?, Arc::clone(&self.zone), self.calendar())
    }

    pub fn minus(&self, duration: Duration) -> Result<Self> {
        Self::from_instant(self.instant.minus(duration)?, Arc::clone(&self.zone), self.calendar())
    }
}

/// Equal when the instant, local value, offset and zone id all agree.
impl PartialEq for ZonedDateTime {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
            && self.local == other.local
            && self.offset == other.offset
            && self.zone.id() == other.zone.id()
    }
}

impl Eq for ZonedDateTime {}

/// ISO local value with the offset and zone id, e.g.
/// `2024-03-10T03:30:00-04:00 America/New_York`.
impl fmt::Display for ZonedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {}",
            self.local,
            self.offset.to_iso_string(),
            self.zone.id()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::SingleTransitionDateTimeZone;

    fn hours(value: i32) -> Offset {
        Offset::from_hours(value).unwrap()
    }

    /// Clocks go forward from UTC-5 to UTC-4 at 2024-03-10T07:00Z.
    fn spring_forward() -> Arc<dyn DateTimeZone> {
        Arc::new(SingleTransitionDateTimeZone::new(
            Instant::from_unix_seconds(1_710_054_000).unwrap(),
            hours(-5),
            hours(-4),
        ))
    }

    /// Clocks go back from UTC-4 to UTC-5 at 2024-11-03T06:00Z.
    fn fall_back() -> Arc<dyn DateTimeZone> {
        Arc::new(SingleTransitionDateTimeZone::new(
            Instant::from_unix_seconds(1_730_613_600).unwrap(),
            hours(-4),
            hours(-5),
        ))
    }

    fn local(month: u8, day: u8, hour: u32, minute: u32) -> LocalDateTime {
        LocalDateTime::from_fields(2024, month, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_strict_resolution_errors() {
        let err = ZonedDateTime::at_strictly(local(3, 10, 2, 30), spring_forward()).unwrap_err();
        assert!(matches!(err, TemporalError::SkippedTime(_)));
        assert_eq!(err.kind(), ErrorKind::Format);

        let err = ZonedDateTime::at_strictly(local(11, 3, 1, 30), fall_back()).unwrap_err();
        assert!(matches!(err, TemporalError::AmbiguousTime(_)));
        assert_eq!(err.kind(), ErrorKind::Format);

        let fine = ZonedDateTime::at_strictly(local(3, 10, 3, 30), spring_forward()).unwrap();
        assert_eq!(fine.offset(), hours(-4));
    }

    #[test]
    fn test_lenient_skipped_time_moves_forward_by_gap() {
        let zoned = ZonedDateTime::at_leniently(local(3, 10, 2, 30), spring_forward()).unwrap();
        assert_eq!(zoned.local(), local(3, 10, 3, 30));
        assert_eq!(zoned.offset(), hours(-4));
        assert_eq!(zoned.to_instant().to_string(), "2024-03-10T07:30:00Z");
    }

    #[test]
    fn test_lenient_ambiguous_time_takes_earlier_instant() {
        let zoned = ZonedDateTime::at_leniently(local(11, 3, 1, 30), fall_back()).unwrap();
        assert_eq!(zoned.local(), local(11, 3, 1, 30));
        assert_eq!(zoned.offset(), hours(-4));
        assert_eq!(zoned.to_instant().to_string(), "2024-11-03T05:30:00Z");
    }

    #[test]
    fn test_plus_crosses_transition() {
        let before = ZonedDateTime::at_strictly(local(3, 10, 1, 30), spring_forward()).unwrap();
        let after = before.plus(Duration::from_hours(1)).unwrap();
        assert_eq!(after.local(), local(3, 10, 3, 30));
        assert_eq!(after.minus(Duration::from_hours(1)).unwrap(), before);
        assert_eq!(after.to_string(), "2024-03-10T03:30:00-04:00 SingleTransition");
    }

    #[test]
    fn test_in_utc_and_with_zone() {
        let instant = Instant::from_unix_seconds(1_710_054_000).unwrap();
        let utc = instant.in_utc();
        assert_eq!(utc.local(), local(3, 10, 7, 0));
        assert_eq!(utc.zone().id(), "UTC");
        let moved = utc.with_zone(spring_forward()).unwrap();
        assert_eq!(moved.local(), local(3, 10, 3, 0));
        assert_eq!(moved.to_instant(), instant);
        assert_eq!(Instant::MAX_VALUE.in_utc().date(), LocalDate::new(9999, 12, 31).unwrap());
        assert_eq!(Instant::MIN_VALUE.in_utc().time(), LocalTime::MIDNIGHT);
    }

    #[test]
    fn test_calendar_views() {
        let instant = Instant::UNIX_EPOCH;
        let julian = instant
            .in_zone_with_calendar(spring_forward(), CalendarSystem::julian())
            .unwrap();
        assert_eq!(julian.date().calendar(), CalendarSystem::julian());
        assert_eq!((julian.date().month(), julian.date().day()), (12, 18));
        assert_eq!(julian.with_calendar(CalendarSystem::iso()).unwrap().date().day(), 31);
    }

    #[test]
    fn test_minus_reports_overflow() {
        let zoned = Instant::UNIX_EPOCH.in_zone(spring_forward()).unwrap();
        let err = zoned.minus(Duration::from_nanoseconds(i128::MIN)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(zoned.minus(Duration::from_nanoseconds(i128::MAX)).is_err());
        let earlier = zoned.minus(Duration::from_hours(5)).unwrap();
        assert_eq!(earlier.local(), LocalDateTime::from_fields(1969, 12, 31, 14, 0, 0).unwrap());
    }
}
