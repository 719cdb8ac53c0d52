//! Reading the current time.

use std::sync::Arc;

use crate::calendar::CalendarSystem;
use crate::error::Result;
use crate::instant::Instant;
use crate::local_date::LocalDate;
use crate::local_date_time::LocalDateTime;
use crate::local_time::LocalTime;
use crate::offset::Offset;
use crate::zone::DateTimeZone;
use crate::zoned_date_time::ZonedDateTime;

/// A source of the current instant.
///
/// The crate never reads the system time itself; callers supply a clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// A clock read in a zone and calendar.
///
/// Every call reads the clock again; nothing is cached.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use tempora::testing::FakeClock;
/// use tempora::{CalendarSystem, FixedDateTimeZone, Instant, LocalDate, Offset, ZonedClock};
///
/// let zone = Arc::new(FixedDateTimeZone::new(Offset::from_hours(-8).unwrap()));
/// let clock = ZonedClock::new(FakeClock::new(Instant::UNIX_EPOCH), zone, CalendarSystem::iso());
/// assert_eq!(clock.get_current_date().unwrap(), LocalDate::new(1969, 12, 31).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ZonedClock<C: Clock> {
    clock: C,
    zone: Arc<dyn DateTimeZone>,
    calendar: CalendarSystem,
}

impl<C: Clock> ZonedClock<C> {
    pub fn new(clock: C, zone: Arc<dyn DateTimeZone>, calendar: CalendarSystem) -> Self {
        ZonedClock {
            clock,
            zone,
            calendar,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn zone(&self) -> &Arc<dyn DateTimeZone> {
        &self.zone
    }

    pub fn calendar(&self) -> CalendarSystem {
        self.calendar
    }

    pub fn get_current_instant(&self) -> Instant {
        self.clock.now()
    }

    pub fn get_current_offset(&self) -> Offset {
        self.zone.get_offset_from_utc(self.clock.now())
    }

    /// # Errors
    ///
    /// Fails when the current local date is outside the calendar's range.
    pub fn get_current_zoned_date_time(&self) -> Result<ZonedDateTime> {
        ZonedDateTime::from_instant(self.clock.now(), Arc::clone(&self.zone), self.calendar)
    }

    pub fn get_current_local_date_time(&self) -> Result<LocalDateTime> {
        Ok(self.get_current_zoned_date_time()?.local())
    }

    pub fn get_current_date(&self) -> Result<LocalDate> {
        Ok(self.get_current_zoned_date_time()?.date())
    }

    pub fn get_current_time(&self) -> Result<LocalTime> {
        Ok(self.get_current_zoned_date_time()?.time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;
    use crate::testing::{FakeClock, SingleTransitionDateTimeZone};

    fn hours(value: i32) -> Offset {
        Offset::from_hours(value).unwrap()
    }

    #[test]
    fn test_reads_clock_on_every_call() {
        let transition = Instant::from_unix_seconds(1_710_054_000).unwrap();
        let fake = Arc::new(FakeClock::new(transition.minus(Duration::from_minutes(30)).unwrap()));
        let zone = Arc::new(SingleTransitionDateTimeZone::new(transition, hours(-5), hours(-4)));
        let clock = ZonedClock::new(Arc::clone(&fake), zone, CalendarSystem::iso());

        assert_eq!(clock.get_current_offset(), hours(-5));
        assert_eq!(clock.get_current_time().unwrap(), LocalTime::new(1, 30, 0).unwrap());

        fake.advance(Duration::from_hours(1)).unwrap();
        assert_eq!(clock.get_current_offset(), hours(-4));
        assert_eq!(clock.get_current_time().unwrap(), LocalTime::new(3, 30, 0).unwrap());
        assert_eq!(
            clock.get_current_instant(),
            transition.plus(Duration::from_minutes(30)).unwrap()
        );
    }

    #[test]
    fn test_calendar_applies_to_dates() {
        let zone = Arc::new(crate::zone::FixedDateTimeZone::utc());
        let clock = ZonedClock::new(
            FakeClock::new(Instant::UNIX_EPOCH),
            zone,
            CalendarSystem::julian(),
        );
        let date = clock.get_current_date().unwrap();
        assert_eq!(date.calendar(), CalendarSystem::julian());
        assert_eq!((date.year(), date.month(), date.day()), (1969, 12, 19));
        assert_eq!(
            clock.get_current_local_date_time().unwrap().time(),
            LocalTime::MIDNIGHT
        );
        assert_eq!(clock.get_current_zoned_date_time().unwrap().zone().id(), "UTC");
    }
}
