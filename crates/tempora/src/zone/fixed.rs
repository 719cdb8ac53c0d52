//! Zones with a single constant offset.

use crate::instant::Instant;
use crate::local_date_time::LocalDateTime;
use crate::offset::Offset;
use crate::units::*;
use crate::zone::{DateTimeZone, ZoneInterval, ZoneLocalMapping};

/// A zone with one offset for all time and no transitions.
///
/// The id is `UTC` for a zero offset and `UTC±HH:MM[:SS]` otherwise, and
/// [`FixedDateTimeZone::for_id`] parses exactly those ids back.
///
/// # Examples
///
/// ```
/// use tempora::{DateTimeZone, FixedDateTimeZone, Instant, Offset};
///
/// let zone = FixedDateTimeZone::new(Offset::from_hours_and_minutes(5, 30).unwrap());
/// assert_eq!(zone.id(), "UTC+05:30");
/// assert_eq!(zone.next_transition(Instant::UNIX_EPOCH), None);
/// assert_eq!(FixedDateTimeZone::for_id("UTC+05:30"), Some(zone));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixedDateTimeZone {
    id: String,
    offset: Offset,
}

impl FixedDateTimeZone {
    pub fn new(offset: Offset) -> Self {
        FixedDateTimeZone {
            id: Self::id_for(offset),
            offset,
        }
    }

    pub fn utc() -> Self {
        Self::new(Offset::ZERO)
    }

    /// A fixed zone under a caller-chosen id, such as a zone whose rules
    /// have settled on a single offset.
    pub fn with_id(id: impl Into<String>, offset: Offset) -> Self {
        FixedDateTimeZone {
            id: id.into(),
            offset,
        }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    fn id_for(offset: Offset) -> String {
        if offset == Offset::ZERO {
            "UTC".to_string()
        } else {
            format!("UTC{}", offset.to_iso_string())
        }
    }

    /// Parses the ids [`FixedDateTimeZone::new`] produces: `UTC`,
    /// `UTC±HH:MM` and `UTC±HH:MM:SS`.
    pub fn for_id(id: &str) -> Option<Self> {
        let rest = id.strip_prefix("UTC")?;
        if rest.is_empty() {
            return Some(Self::utc());
        }
        let (negative, digits) = match rest.as_bytes().first()? {
            b'+' => (false, &rest[1..]),
            b'-' => (true, &rest[1..]),
            _ => return None,
        };
        let mut parts = digits.split(':');
        let hours = parse_two_digits(parts.next()?, 23)?;
        let minutes = parts.next().map_or(Some(0), |part| parse_two_digits(part, 59))?;
        let seconds = parts.next().map_or(Some(0), |part| parse_two_digits(part, 59))?;
        if parts.next().is_some() {
            return None;
        }
        let magnitude = hours * SECONDS_PER_HOUR + minutes * SECONDS_PER_MINUTE + seconds;
        let offset = Offset::from_seconds(if negative { -magnitude } else { magnitude }).ok()?;
        let zone = Self::new(offset);
        // Only canonical spellings, so that an id names one zone.
        (zone.id == id).then_some(zone)
    }
}

fn parse_two_digits(text: &str, max: i64) -> Option<i64> {
    if text.len() != 2 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i64 = text.parse().ok()?;
    (value <= max).then_some(value)
}

impl DateTimeZone for FixedDateTimeZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_zone_interval(&self, _instant: Instant) -> ZoneInterval {
        ZoneInterval {
            name: self.id.clone(),
            start: None,
            end: None,
            wall_offset: self.offset,
            savings: Offset::ZERO,
        }
    }

    fn min_offset(&self) -> Offset {
        self.offset
    }

    fn max_offset(&self) -> Offset {
        self.offset
    }

    fn is_fixed(&self) -> bool {
        true
    }

    fn get_offset_from_utc(&self, _instant: Instant) -> Offset {
        self.offset
    }

    fn next_transition(&self, _instant: Instant) -> Option<Instant> {
        None
    }

    fn previous_transition(&self, _instant: Instant) -> Option<Instant> {
        None
    }

    fn map_local(&self, _local: &LocalDateTime) -> ZoneLocalMapping {
        ZoneLocalMapping::Unambiguous(self.get_zone_interval(Instant::UNIX_EPOCH))
    }

    fn get_offset_from_local(&self, _local: &LocalDateTime) -> Offset {
        self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duration::Duration;

    fn sample_instants() -> Vec<Instant> {
        vec![
            Instant::MIN_VALUE,
            Instant::UNIX_EPOCH,
            Instant::UNIX_EPOCH.minus(Duration::EPSILON).unwrap(),
            Instant::from_unix_seconds(1_710_054_000).unwrap(),
            Instant::MAX_VALUE,
        ]
    }

    #[test]
    fn test_constant_offset_and_no_transitions() {
        for offset in [Offset::ZERO, Offset::from_hours(-8).unwrap(), Offset::MAX_VALUE] {
            let zone = FixedDateTimeZone::new(offset);
            assert!(zone.is_fixed());
            for instant in sample_instants() {
                assert_eq!(zone.get_offset_from_utc(instant), offset);
                assert_eq!(zone.next_transition(instant), None);
                assert_eq!(zone.previous_transition(instant), None);
                let local = LocalDateTime::from_fields(2024, 3, 10, 2, 30, 0).unwrap();
                assert_eq!(zone.get_offset_from_local(&local), offset);
                assert_eq!(zone.map_local(&local).count(), 1);
            }
        }
    }

    #[test]
    fn test_ids() {
        assert_eq!(FixedDateTimeZone::utc().id(), "UTC");
        let zone = FixedDateTimeZone::new(Offset::from_hours(-8).unwrap());
        assert_eq!(zone.id(), "UTC-08:00");
        let zone = FixedDateTimeZone::new(Offset::from_seconds(3_661).unwrap());
        assert_eq!(zone.id(), "UTC+01:01:01");
        assert_eq!(zone.get_zone_interval(Instant::UNIX_EPOCH).name(), "UTC+01:01:01");
    }

    #[test]
    fn test_for_id_accepts_only_canonical_ids() {
        assert_eq!(FixedDateTimeZone::for_id("UTC"), Some(FixedDateTimeZone::utc()));
        assert_eq!(
            FixedDateTimeZone::for_id("UTC-03:30").map(|zone| zone.offset()),
            Some(Offset::from_hours_and_minutes(-3, -30).unwrap())
        );
        assert_eq!(
            FixedDateTimeZone::for_id("UTC+01:01:01")
                .map(|zone| zone.offset().total_milliseconds()),
            Some(3_661_000)
        );
        assert_eq!(FixedDateTimeZone::for_id("UTC+05"), None);
        assert_eq!(FixedDateTimeZone::for_id("UTC+00:00"), None);
        assert_eq!(FixedDateTimeZone::for_id("UTC+24:00"), None);
        assert_eq!(FixedDateTimeZone::for_id("UTC+5:30"), None);
        assert_eq!(FixedDateTimeZone::for_id("GMT+01:00"), None);
        assert_eq!(FixedDateTimeZone::for_id("UTC+01:00:00:00"), None);
    }
}
