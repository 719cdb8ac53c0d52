//! Time zones: mapping between instants and local civil time.
//!
//! A [`DateTimeZone`] divides the timeline into [`ZoneInterval`]s, each with
//! a constant wall offset. Mapping an instant to local time is a lookup;
//! the reverse can be ambiguous (clocks set back) or impossible (clocks set
//! forward), which [`DateTimeZone::map_local`] reports as a
//! [`ZoneLocalMapping`].
//!
//! ## Lenient resolution
//!
//! [`DateTimeZone::get_offset_from_local`] always picks the offset in force
//! immediately before the transition:
//!
//! - an ambiguous local time resolves to the earlier of its two instants;
//! - a skipped local time is read with the pre-transition offset, which
//!   moves it forward by the length of the gap.

mod fixed;
mod precalculated;
mod provider;
mod recurrence;
#[cfg(feature = "tzdb")]
mod tzdb;

use std::fmt;

use crate::calendar::CalendarSystem;
use crate::duration::Duration;
use crate::error::{Result, TemporalError};
use crate::instant::{Instant, LocalInstant};
use crate::local_date_time::LocalDateTime;
use crate::offset::Offset;

pub use fixed::FixedDateTimeZone;
pub use precalculated::PrecalculatedDateTimeZone;
pub use provider::{DateTimeZoneCache, ZoneSource};
pub use recurrence::{
    StandardDaylightAlternatingMap, TransitionMode, ZoneRecurrence, ZoneYearOffset,
};
#[cfg(feature = "tzdb")]
pub use tzdb::TzdbSource;

/// Offset resolution between UTC instants and local time.
///
/// Implementations supply [`get_zone_interval`](Self::get_zone_interval)
/// and their offset bounds; transition queries and local mapping are
/// derived from the interval lookup.
pub trait DateTimeZone: Send + Sync + fmt::Debug {
    fn id(&self) -> &str;

    /// The interval containing `instant`. Total over the instant range.
    fn get_zone_interval(&self, instant: Instant) -> ZoneInterval;

    fn min_offset(&self) -> Offset;

    fn max_offset(&self) -> Offset;

    fn is_fixed(&self) -> bool {
        false
    }

    fn get_offset_from_utc(&self, instant: Instant) -> Offset {
        self.get_zone_interval(instant).wall_offset()
    }

    /// The first transition strictly after `instant`.
    fn next_transition(&self, instant: Instant) -> Option<Instant> {
        self.get_zone_interval(instant).end()
    }

    /// The last transition strictly before `instant`.
    fn previous_transition(&self, instant: Instant) -> Option<Instant> {
        let start = self.get_zone_interval(instant).start()?;
        if start < instant {
            return Some(start);
        }
        let just_before = start.minus(Duration::EPSILON).ok()?;
        self.get_zone_interval(just_before).start()
    }

    /// Every way `local` can be observed in this zone.
    fn map_local(&self, local: &LocalDateTime) -> ZoneLocalMapping {
        map_local_instant(self, local.to_local_instant())
    }

    /// The offset for `local` under the lenient policy described in the
    /// module documentation.
    fn get_offset_from_local(&self, local: &LocalDateTime) -> Offset {
        match self.map_local(local) {
            ZoneLocalMapping::Unambiguous(interval) => interval.wall_offset(),
            ZoneLocalMapping::Ambiguous { earlier, .. } => earlier.wall_offset(),
            ZoneLocalMapping::Skipped { before, .. } => before.wall_offset(),
        }
    }
}

/// Candidate intervals are those overlapping the window of instants at
/// which `local` could be observed, given the zone's offset bounds.
fn map_local_instant<Z: DateTimeZone + ?Sized>(zone: &Z, local: LocalInstant) -> ZoneLocalMapping {
    let earliest = Instant::clamped(local.nanoseconds() - zone.max_offset().nanoseconds());
    let latest = Instant::clamped(local.nanoseconds() - zone.min_offset().nanoseconds());

    let mut candidates = vec![zone.get_zone_interval(earliest)];
    while let Some(end) = candidates.last().and_then(ZoneInterval::end) {
        if end > latest {
            break;
        }
        candidates.push(zone.get_zone_interval(end));
    }

    let mut matching = candidates.iter().filter(|interval| interval.contains_local(local));
    match (matching.next(), matching.last()) {
        (Some(only), None) => ZoneLocalMapping::Unambiguous(only.clone()),
        (Some(earlier), Some(later)) => ZoneLocalMapping::Ambiguous {
            earlier: earlier.clone(),
            later: later.clone(),
        },
        _ => {
            // The gap lies between the last interval starting (locally)
            // before `local` and its successor.
            let split = candidates
                .iter()
                .rposition(|interval| interval.local_start().is_none_or(|start| start <= local))
                .unwrap_or(0);
            let before = candidates[split].clone();
            match candidates.get(split + 1) {
                Some(after) => ZoneLocalMapping::Skipped {
                    before,
                    after: after.clone(),
                },
                None => ZoneLocalMapping::Unambiguous(before),
            }
        }
    }
}

/// A span of the timeline with a constant offset and name.
///
/// `start` is inclusive and `end` exclusive; `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneInterval {
    name: String,
    start: Option<Instant>,
    end: Option<Instant>,
    wall_offset: Offset,
    savings: Offset,
}

impl ZoneInterval {
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] unless `start < end`.
    pub fn new(
        name: impl Into<String>,
        start: Option<Instant>,
        end: Option<Instant>,
        wall_offset: Offset,
        savings: Offset,
    ) -> Result<Self> {
        let name = name.into();
        if let (Some(start), Some(end)) = (start, end) {
            if end <= start {
                return Err(TemporalError::Argument(format!(
                    "zone interval '{name}' ends at {end}, not after its start {start}"
                )));
            }
        }
        Ok(ZoneInterval {
            name,
            start,
            end,
            wall_offset,
            savings,
        })
    }

    /// An interval covering the whole timeline, to be narrowed with
    /// [`with_start`](Self::with_start) and [`with_end`](Self::with_end).
    pub(crate) fn unbounded(name: impl Into<String>, wall_offset: Offset, savings: Offset) -> Self {
        ZoneInterval {
            name: name.into(),
            start: None,
            end: None,
            wall_offset,
            savings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> Option<Instant> {
        self.start
    }

    pub fn end(&self) -> Option<Instant> {
        self.end
    }

    pub fn wall_offset(&self) -> Offset {
        self.wall_offset
    }

    /// Daylight saving component of the wall offset.
    pub fn savings(&self) -> Offset {
        self.savings
    }

    pub fn duration(&self) -> Option<Duration> {
        Some(self.end? - self.start?)
    }

    pub fn contains(&self, instant: Instant) -> bool {
        self.start.is_none_or(|start| start <= instant) && self.end.is_none_or(|end| instant < end)
    }

    pub(crate) fn contains_local(&self, local: LocalInstant) -> bool {
        let utc = local.nanoseconds() - self.wall_offset.nanoseconds();
        self.start
            .is_none_or(|start| start.to_unix_nanoseconds() <= utc)
            && self.end.is_none_or(|end| utc < end.to_unix_nanoseconds())
    }

    pub(crate) fn local_start(&self) -> Option<LocalInstant> {
        self.start.map(|start| start.plus_offset(self.wall_offset))
    }

    /// The ISO local date and time at which the interval starts, or `None`
    /// when it is unbounded at the start.
    ///
    /// # Errors
    ///
    /// Returns a range error when the local start falls outside the ISO
    /// calendar, which can only happen at the ends of the instant range.
    pub fn iso_local_start(&self) -> Result<Option<LocalDateTime>> {
        self.local_start()
            .map(|local| LocalDateTime::from_local_instant(local, CalendarSystem::iso()))
            .transpose()
    }

    /// The ISO local date and time at which the interval ends (exclusive).
    pub fn iso_local_end(&self) -> Result<Option<LocalDateTime>> {
        self.end
            .map(|end| end.plus_offset(self.wall_offset))
            .map(|local| LocalDateTime::from_local_instant(local, CalendarSystem::iso()))
            .transpose()
    }

    pub(crate) fn with_start(mut self, start: Option<Instant>) -> Self {
        self.start = start;
        self
    }

    pub(crate) fn with_end(mut self, end: Option<Instant>) -> Self {
        self.end = end;
        self
    }
}

impl fmt::Display for ZoneInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: [", self.name)?;
        match self.start {
            Some(start) => write!(f, "{start}")?,
            None => f.write_str("StartOfTime")?,
        }
        f.write_str(", ")?;
        match self.end {
            Some(end) => write!(f, "{end}")?,
            None => f.write_str("EndOfTime")?,
        }
        write!(f, ") {} ({})", self.wall_offset, self.savings)
    }
}

/// The result of mapping a local date and time into a zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneLocalMapping {
    /// Exactly one instant has this local value.
    Unambiguous(ZoneInterval),
    /// Clocks went back: the local value occurs in both intervals.
    Ambiguous {
        earlier: ZoneInterval,
        later: ZoneInterval,
    },
    /// Clocks went forward: the local value falls in the gap between
    /// `before` and `after`.
    Skipped {
        before: ZoneInterval,
        after: ZoneInterval,
    },
}

impl ZoneLocalMapping {
    /// Number of instants with this local value: 0, 1 or 2.
    pub fn count(&self) -> usize {
        match self {
            ZoneLocalMapping::Unambiguous(_) => 1,
            ZoneLocalMapping::Ambiguous { .. } => 2,
            ZoneLocalMapping::Skipped { .. } => 0,
        }
    }
}
