//! Zones backed by an explicit table of intervals.

use std::sync::Arc;

use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::offset::Offset;
use crate::zone::{DateTimeZone, ZoneInterval};

/// A zone defined by an explicit table of intervals, optionally followed by
/// a rule-based tail zone for instants after the table ends.
///
/// The table must start at the beginning of time and be contiguous. When a
/// tail is present the last interval must end where the tail takes over;
/// otherwise the last interval must extend to the end of time.
#[derive(Debug)]
pub struct PrecalculatedDateTimeZone {
    id: String,
    periods: Vec<ZoneInterval>,
    tail: Option<(Instant, Arc<dyn DateTimeZone>)>,
    min_offset: Offset,
    max_offset: Offset,
}

impl PrecalculatedDateTimeZone {
    /// # Errors
    ///
    /// Returns [`TemporalError::Argument`] when `periods` is empty, does not
    /// start at the beginning of time, has a gap or overlap, or does not
    /// meet the tail as described on the type.
    pub fn new(
        id: impl Into<String>,
        periods: Vec<ZoneInterval>,
        tail: Option<Arc<dyn DateTimeZone>>,
    ) -> Result<Self> {
        let id = id.into();
        let (first, last) = match (periods.first(), periods.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(TemporalError::Argument(format!(
                    "zone '{id}' needs at least one interval"
                )))
            }
        };
        if first.start().is_some() {
            return Err(TemporalError::Argument(format!(
                "zone '{id}' must start at the beginning of time, not {first}"
            )));
        }
        for pair in periods.windows(2) {
            if pair[0].end().is_none() || pair[0].end() != pair[1].start() {
                return Err(TemporalError::Argument(format!(
                    "zone '{id}' intervals are not contiguous: {} then {}",
                    pair[0], pair[1]
                )));
            }
        }
        let tail = match (last.end(), tail) {
            (Some(tail_start), Some(tail)) => Some((tail_start, tail)),
            (None, None) => None,
            (Some(end), None) => {
                return Err(TemporalError::Argument(format!(
                    "zone '{id}' ends at {end} with no tail zone"
                )))
            }
            (None, Some(_)) => {
                return Err(TemporalError::Argument(format!(
                    "zone '{id}' has a tail zone but its last interval never ends"
                )))
            }
        };

        let offsets = periods.iter().map(ZoneInterval::wall_offset);
        let mut min_offset = offsets.clone().min().unwrap_or_default();
        let mut max_offset = offsets.max().unwrap_or_default();
        if let Some((_, tail)) = &tail {
            min_offset = min_offset.min(tail.min_offset());
            max_offset = max_offset.max(tail.max_offset());
        }
        Ok(PrecalculatedDateTimeZone {
            id,
            periods,
            tail,
            min_offset,
            max_offset,
        })
    }

    /// The explicit intervals, in order.
    pub fn periods(&self) -> &[ZoneInterval] {
        &self.periods
    }
}

impl DateTimeZone for PrecalculatedDateTimeZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_zone_interval(&self, instant: Instant) -> ZoneInterval {
        if let Some((tail_start, tail)) = &self.tail {
            if instant >= *tail_start {
                let interval = tail.get_zone_interval(instant);
                // The tail's own interval may reach back before the table ends.
                return match interval.start() {
                    Some(start) if start >= *tail_start => interval,
                    _ => interval.with_start(Some(*tail_start)),
                };
            }
        }
        let index = self
            .periods
            .partition_point(|period| period.end().is_some_and(|end| end <= instant));
        self.periods[index.min(self.periods.len() - 1)].clone()
    }

    fn min_offset(&self) -> Offset {
        self.min_offset
    }

    fn max_offset(&self) -> Offset {
        self.max_offset
    }
}
