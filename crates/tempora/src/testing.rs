//! Deterministic stand-ins for clocks, zones and zone sources.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::clock::Clock;
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::offset::Offset;
use crate::zone::{DateTimeZone, ZoneInterval, ZoneSource};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FakeClock {
    now: Mutex<Instant>,
    auto_advance: Duration,
}

impl FakeClock {
    pub fn new(initial: Instant) -> Self {
        FakeClock {
            now: Mutex::new(initial),
            auto_advance: Duration::ZERO,
        }
    }

    /// Moves the clock by `step` after every reading.
    pub fn with_auto_advance(mut self, step: Duration) -> Self {
        self.auto_advance = step;
        self
    }

    /// # Errors
    ///
    /// Fails when the clock would leave the instant range.
    pub fn advance(&self, duration: Duration) -> Result<()> {
        let mut now = self.now.lock();
        *now = now.plus(duration)?;
        Ok(())
    }

    pub fn reset(&self, instant: Instant) {
        *self.now.lock() = instant;
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        let mut now = self.now.lock();
        let current = *now;
        let next = current.to_unix_nanoseconds() + self.auto_advance.total_nanoseconds();
        *now = Instant::clamped(next);
        current
    }
}

/// A zone with one offset change.
///
/// # Examples
///
/// ```
/// use tempora::testing::SingleTransitionDateTimeZone;
/// use tempora::{DateTimeZone, Instant, Offset};
///
/// let zone = SingleTransitionDateTimeZone::new(
///     Instant::UNIX_EPOCH,
///     Offset::ZERO,
///     Offset::from_hours(1).unwrap(),
/// );
/// assert_eq!(zone.next_transition(Instant::MIN_VALUE), Some(Instant::UNIX_EPOCH));
/// ```
#[derive(Debug, Clone)]
pub struct SingleTransitionDateTimeZone {
    id: String,
    early: ZoneInterval,
    late: ZoneInterval,
}

impl SingleTransitionDateTimeZone {
    pub fn new(transition: Instant, before: Offset, after: Offset) -> Self {
        Self::with_id("SingleTransition", transition, before, after)
    }

    pub fn with_id(
        id: impl Into<String>,
        transition: Instant,
        before: Offset,
        after: Offset,
    ) -> Self {
        SingleTransitionDateTimeZone {
            id: id.into(),
            early: ZoneInterval::unbounded("Before", before, Offset::ZERO)
                .with_end(Some(transition)),
            late: ZoneInterval::unbounded("After", after, Offset::ZERO)
                .with_start(Some(transition)),
        }
    }

    pub fn transition(&self) -> Option<Instant> {
        self.late.start()
    }
}

impl DateTimeZone for SingleTransitionDateTimeZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_zone_interval(&self, instant: Instant) -> ZoneInterval {
        if self.early.contains(instant) {
            self.early.clone()
        } else {
            self.late.clone()
        }
    }

    fn min_offset(&self) -> Offset {
        self.early.wall_offset().min(self.late.wall_offset())
    }

    fn max_offset(&self) -> Offset {
        self.early.wall_offset().max(self.late.wall_offset())
    }
}

/// A [`ZoneSource`] over zones registered up front, counting lookups.
#[derive(Debug, Default)]
pub struct FakeZoneSource {
    version: String,
    zones: BTreeMap<String, Arc<dyn DateTimeZone>>,
    requests: AtomicUsize,
}

impl FakeZoneSource {
    pub fn new(version: impl Into<String>) -> Self {
        FakeZoneSource {
            version: version.into(),
            ..Default::default()
        }
    }

    /// Registers `zone` under its own id.
    pub fn with_zone(mut self, zone: Arc<dyn DateTimeZone>) -> Self {
        self.zones.insert(zone.id().to_string(), zone);
        self
    }

    pub fn with_single_transition(
        self,
        id: &str,
        transition: Instant,
        before: Offset,
        after: Offset,
    ) -> Self {
        self.with_zone(Arc::new(SingleTransitionDateTimeZone::with_id(
            id, transition, before, after,
        )))
    }

    /// Number of [`for_id`](ZoneSource::for_id) calls so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl ZoneSource for FakeZoneSource {
    fn ids(&self) -> Vec<String> {
        self.zones.keys().cloned().collect()
    }

    fn for_id(&self, id: &str) -> Result<Arc<dyn DateTimeZone>> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.zones
            .get(id)
            .cloned()
            .ok_or_else(|| TemporalError::NotFound(format!("time zone '{id}'")))
    }

    fn version_id(&self) -> String {
        self.version.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_date_time::LocalDateTime;

    #[test]
    fn test_fake_clock_auto_advance() {
        let clock =
            FakeClock::new(Instant::UNIX_EPOCH).with_auto_advance(Duration::from_seconds(1));
        assert_eq!(clock.now(), Instant::UNIX_EPOCH);
        assert_eq!(clock.now(), Instant::from_unix_seconds(1).unwrap());
        clock.reset(Instant::MAX_VALUE);
        assert_eq!(clock.now(), Instant::MAX_VALUE);
        assert_eq!(clock.now(), Instant::MAX_VALUE);
        assert!(clock.advance(Duration::from_seconds(1)).is_err());
    }

    #[test]
    fn test_single_transition_zone() {
        let zone = SingleTransitionDateTimeZone::new(
            Instant::UNIX_EPOCH,
            Offset::from_hours(2).unwrap(),
            Offset::from_hours(-1).unwrap(),
        );
        assert_eq!(zone.id(), "SingleTransition");
        assert_eq!(zone.transition(), Some(Instant::UNIX_EPOCH));
        assert_eq!(zone.get_offset_from_utc(Instant::MIN_VALUE), Offset::from_hours(2).unwrap());
        assert_eq!(zone.get_offset_from_utc(Instant::UNIX_EPOCH), Offset::from_hours(-1).unwrap());
        assert_eq!(zone.previous_transition(Instant::MAX_VALUE), Some(Instant::UNIX_EPOCH));
        assert_eq!(zone.min_offset(), Offset::from_hours(-1).unwrap());
        let repeated = LocalDateTime::from_fields(1969, 12, 31, 23, 30, 0).unwrap();
        assert_eq!(zone.map_local(&repeated).count(), 2);
    }

    #[test]
    fn test_fake_source_counts_requests() {
        let source = FakeZoneSource::new("v2").with_single_transition(
            "Test/Zone",
            Instant::UNIX_EPOCH,
            Offset::ZERO,
            Offset::from_hours(1).unwrap(),
        );
        assert!(source.for_id("Test/Zone").is_ok());
        assert!(source.for_id("Test/Missing").is_err());
        assert_eq!(source.requests(), 2);
        assert_eq!(source.ids(), vec!["Test/Zone".to_string()]);
    }
}
