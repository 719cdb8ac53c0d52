//! IANA time zones from the `chrono-tz` database.

use std::sync::Arc;

use chrono::{DateTime, Offset as _, TimeZone};
use chrono_tz::{OffsetComponents, Tz, TZ_VARIANTS};
use tracing::debug;

use crate::calendar::CalendarSystem;
use crate::error::{Result, TemporalError};
use crate::instant::Instant;
use crate::offset::Offset;
use crate::units::SECONDS_PER_DAY;
use crate::zone::{
    DateTimeZone, PrecalculatedDateTimeZone, StandardDaylightAlternatingMap, TransitionMode,
    ZoneInterval, ZoneRecurrence, ZoneYearOffset,
};

/// 1800-01-01T00:00:00Z.
const FIRST_SAMPLE: i64 = -5_364_662_400;
/// 2100-01-01T00:00:00Z.
const LAST_SAMPLE: i64 = 4_102_444_800;
const SAMPLE_STEP: i64 = 7 * SECONDS_PER_DAY;
/// 2090-01-01T00:00:00Z. Transitions from here to [`LAST_SAMPLE`] decide
/// whether the zone continues with a yearly rule.
const RULE_WINDOW_START: i64 = 3_786_912_000;

/// A [`ZoneSource`](crate::ZoneSource) over the IANA zones bundled with
/// `chrono-tz`.
///
/// Each zone is compiled into a [`PrecalculatedDateTimeZone`] covering
/// 1800 to 2100 by sampling the database weekly and bisecting each change
/// to the second. Before 1800 the earliest offset applies. When the
/// transitions of the 2090s follow one standard/daylight pair of yearly
/// rules, a [`StandardDaylightAlternatingMap`] carries them on after the
/// last of them; otherwise the latest offset applies for the rest of time.
#[derive(Debug, Clone, Copy, Default)]
pub struct TzdbSource;

impl TzdbSource {
    pub fn new() -> Self {
        TzdbSource
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Sample {
    wall_seconds: i32,
    savings_seconds: i64,
    name: String,
}

impl Sample {
    fn at(tz: Tz, seconds: i64) -> Result<Self> {
        let utc = DateTime::from_timestamp(seconds, 0)
            .ok_or_else(|| TemporalError::out_of_range("unix seconds", seconds))?
            .naive_utc();
        let offset = tz.offset_from_utc_datetime(&utc);
        Ok(Sample {
            wall_seconds: offset.fix().local_minus_utc(),
            savings_seconds: offset.dst_offset().num_seconds(),
            name: offset.to_string(),
        })
    }

    fn interval(&self, start: Option<Instant>, end: Option<Instant>) -> Result<ZoneInterval> {
        ZoneInterval::new(
            self.name.clone(),
            start,
            end,
            Offset::from_seconds(i64::from(self.wall_seconds))?,
            Offset::from_seconds(self.savings_seconds)?,
        )
    }
}

fn compile(tz: Tz) -> Result<PrecalculatedDateTimeZone> {
    let mut intervals = Vec::new();
    let mut current = Sample::at(tz, FIRST_SAMPLE)?;
    let mut current_start = None;
    let mut seconds = FIRST_SAMPLE;
    while seconds < LAST_SAMPLE {
        let probe = (seconds + SAMPLE_STEP).min(LAST_SAMPLE);
        if Sample::at(tz, probe)? == current {
            seconds = probe;
            continue;
        }
        // Invariant: `low` samples as `current`, `high` does not.
        let (mut low, mut high) = (seconds, probe);
        while high - low > 1 {
            let middle = low + (high - low) / 2;
            if Sample::at(tz, middle)? == current {
                low = middle;
            } else {
                high = middle;
            }
        }
        let transition = Instant::from_unix_seconds(high)?;
        intervals.push(current.interval(current_start, Some(transition))?);
        current = Sample::at(tz, high)?;
        current_start = Some(transition);
        seconds = high;
    }
    intervals.push(current.interval(current_start, None)?);

    let tail: Option<Arc<dyn DateTimeZone>> = match recurring_tail(tz.name(), &intervals)? {
        Some(rules) => {
            // The rules reproduce the open-ended last interval.
            intervals.pop();
            Some(Arc::new(rules))
        }
        None => None,
    };
    debug!(
        zone = tz.name(),
        transitions = intervals.len() - 1,
        recurring = tail.is_some(),
        "compiled zone"
    );
    PrecalculatedDateTimeZone::new(tz.name(), intervals, tail)
}

fn same_state(a: &ZoneInterval, b: &ZoneInterval) -> bool {
    a.name() == b.name() && a.wall_offset() == b.wall_offset() && a.savings() == b.savings()
}

/// A pair of yearly rules matching every transition after
/// [`RULE_WINDOW_START`], or `None` when the zone does not alternate there.
fn recurring_tail(
    id: &str,
    intervals: &[ZoneInterval],
) -> Result<Option<StandardDaylightAlternatingMap>> {
    let window_start = Instant::from_unix_seconds(RULE_WINDOW_START)?;
    let first = intervals
        .partition_point(|interval| interval.start().is_none_or(|start| start < window_start));
    // Keep one interval before the window so every transition in it has a predecessor.
    let recent = &intervals[first.saturating_sub(1)..];
    if recent.len() < 5 {
        return Ok(None);
    }
    let last = &recent[recent.len() - 1];
    let previous = &recent[recent.len() - 2];
    let savings = (last.savings() == Offset::ZERO, previous.savings() == Offset::ZERO);
    let (standard, daylight) = match savings {
        (true, false) => (last, previous),
        (false, true) => (previous, last),
        _ => return Ok(None),
    };
    let alternates = recent.iter().rev().enumerate().all(|(index, interval)| {
        same_state(interval, if index % 2 == 0 { last } else { previous })
    });
    let standard_offset = standard.wall_offset();
    if !alternates || standard_offset.plus(daylight.savings())? != daylight.wall_offset() {
        return Ok(None);
    }

    let (Some(into_daylight), Some(into_standard)) = (
        recurrence_into(daylight, recent, standard_offset)?,
        recurrence_into(standard, recent, standard_offset)?,
    ) else {
        return Ok(None);
    };
    StandardDaylightAlternatingMap::new(id, standard_offset, into_daylight, into_standard).map(Some)
}

/// A rule, read on the wall clock, that lands on every transition into
/// `state` in `recent`.
fn recurrence_into(
    state: &ZoneInterval,
    recent: &[ZoneInterval],
    standard_offset: Offset,
) -> Result<Option<ZoneRecurrence>> {
    // (transition, wall offset before it, savings before it)
    let transitions: Vec<(Instant, Offset, Offset)> = recent
        .windows(2)
        .filter(|pair| same_state(&pair[1], state))
        .filter_map(|pair| {
            let start = pair[1].start()?;
            Some((start, pair[0].wall_offset(), pair[0].savings()))
        })
        .collect();
    let Some(&(latest, wall_before, _)) = transitions.last() else {
        return Ok(None);
    };
    let wall = latest.plus(wall_before.to_duration())?.in_utc().local();
    let date = wall.date();
    let (month, day, weekday) = (date.month(), date.day(), date.day_of_week());
    let days_in_month = CalendarSystem::iso().days_in_month(date.year(), month)?;

    let mut candidates = Vec::with_capacity(3);
    if day + 7 > days_in_month {
        candidates.push(ZoneYearOffset::last_weekday(
            TransitionMode::Wall,
            month,
            weekday,
            wall.time(),
        )?);
    }
    let week_start = ((day - 1) / 7 * 7 + 1) as i8;
    candidates.push(ZoneYearOffset::weekday_on_or_after(
        TransitionMode::Wall,
        month,
        week_start,
        weekday,
        wall.time(),
    )?);
    candidates.push(ZoneYearOffset::new(
        TransitionMode::Wall,
        month,
        day as i8,
        None,
        false,
        wall.time(),
    )?);

    for candidate in candidates {
        let mut matches = true;
        for &(at, wall_before, savings_before) in &transitions {
            let year = at.plus(wall_before.to_duration())?.in_utc().local().year();
            if candidate.occurrence(year, standard_offset, savings_before)? != at {
                matches = false;
                break;
            }
        }
        if matches {
            let rule = ZoneRecurrence::new(state.name(), state.savings(), candidate);
            return Ok(Some(rule));
        }
    }
    Ok(None)
}

impl crate::zone::ZoneSource for TzdbSource {
    fn ids(&self) -> Vec<String> {
        TZ_VARIANTS.iter().map(|tz| tz.name().to_string()).collect()
    }

    fn for_id(&self, id: &str) -> Result<Arc<dyn DateTimeZone>> {
        let tz: Tz = id
            .parse()
            .map_err(|_| TemporalError::NotFound(format!("time zone '{id}'")))?;
        Ok(Arc::new(compile(tz)?))
    }

    fn version_id(&self) -> String {
        "tzdb via chrono-tz 0.10".to_string()
    }
}
