use std::sync::Arc;

use proptest::prelude::*;
use tempora::{
    CalendarSystem, DateInterval, DateTimeZone, DateTimeZoneCache, Duration, FixedDateTimeZone,
    Instant, LocalDate, LocalDateTime, LocalTime, Offset, Period, PeriodFieldType, PeriodType,
    TimeInterval, YearMonth, ZonedClock, ZonedDateTime,
};

fn calendars() -> Vec<CalendarSystem> {
    CalendarSystem::ids()
        .into_iter()
        .map(|id| CalendarSystem::for_id(id).unwrap())
        .collect()
}

fn iso(year: i32, month: u8, day: u8) -> LocalDate {
    LocalDate::new(year, month, day).unwrap()
}

#[test]
fn test_every_era_round_trips() {
    for calendar in calendars() {
        for era in calendar.eras() {
            let min = calendar.get_min_year_of_era(era).unwrap();
            let max = calendar.get_max_year_of_era(era).unwrap();
            assert!(min <= max, "{} {era}", calendar.id());
            let samples = [min, min + 1, min + (max - min) / 2, max - 1, max];
            for year_of_era in samples.into_iter().filter(|year| (min..=max).contains(year)) {
                let year = calendar.get_absolute_year(year_of_era, era).unwrap();
                assert_eq!(calendar.get_era(year).unwrap(), era, "{} {year}", calendar.id());
                assert_eq!(calendar.get_year_of_era(year).unwrap(), year_of_era);
            }
            assert!(calendar.get_absolute_year(max + 1, era).is_err());
            assert!(calendar.get_absolute_year(min - 1, era).is_err());
        }
    }
}

#[test]
fn test_calendar_range_edges_round_trip() {
    for calendar in calendars() {
        for days in [calendar.min_days(), calendar.max_days()] {
            let (year, month, day) = calendar.fields_from_days(days).unwrap();
            assert_eq!(calendar.days_since_epoch(year, month, day).unwrap(), days);
        }
        assert!(calendar.fields_from_days(calendar.min_days() - 1).is_err());
        assert!(calendar.fields_from_days(calendar.max_days() + 1).is_err());
    }
}

proptest! {
    #[test]
    fn prop_fields_round_trip_in_every_calendar(index in 0usize..16, fraction in 0.0f64..1.0) {
        let all = calendars();
        let calendar = all[index % all.len()];
        let span = f64::from(calendar.max_days() - calendar.min_days());
        let days = calendar.min_days() + (span * fraction) as i32;
        let (year, month, day) = calendar.fields_from_days(days).unwrap();
        prop_assert_eq!(calendar.days_since_epoch(year, month, day).unwrap(), days);
        let date = LocalDate::new_in_calendar(year, month, day, calendar).unwrap();
        prop_assert_eq!(date.days_since_epoch(), days);
    }

    #[test]
    fn prop_calendar_conversion_preserves_day(days in -100_000i32..100_000) {
        let date = LocalDate::from_days_since_epoch(days, CalendarSystem::iso()).unwrap();
        for calendar in calendars() {
            let converted = date.with_calendar(calendar).unwrap();
            prop_assert_eq!(converted.days_since_epoch(), days);
            prop_assert_eq!(converted.day_of_week(), date.day_of_week());
            prop_assert_eq!(converted.with_calendar(CalendarSystem::iso()).unwrap(), date);
        }
    }

    #[test]
    fn prop_plus_hours_wraps_and_inverts(
        nanos in 0i64..86_400_000_000_000,
        hours in -100_000i64..100_000,
    ) {
        let time = LocalTime::from_nanosecond_of_day(nanos).unwrap();
        let moved = time.plus_hours(hours);
        prop_assert_eq!(moved.minute(), time.minute());
        prop_assert_eq!(moved.nanosecond_of_second(), time.nanosecond_of_second());
        prop_assert_eq!(moved.plus_hours(-hours), time);
    }

    #[test]
    fn prop_period_between_lands_on_end(start in -50_000i32..50_000, length in 0i32..5_000) {
        let start = LocalDate::from_days_since_epoch(start, CalendarSystem::iso()).unwrap();
        let end = start.plus_days(i64::from(length)).unwrap();
        let period = Period::between_dates(start, end, PeriodType::YEAR_MONTH_DAY).unwrap();
        prop_assert!(period.months() < 12 && period.months() >= 0);
        prop_assert_eq!(start.plus_period(&period).unwrap(), end);
        let days = Period::between_dates(start, end, PeriodType::DAYS).unwrap();
        prop_assert_eq!(days.days(), i64::from(length));
    }

    #[test]
    fn prop_fixed_zone_round_trips(
        seconds in -4_000_000_000i64..4_000_000_000,
        offset in -50_400i64..50_400,
    ) {
        let offset = Offset::from_seconds(offset).unwrap();
        let zone: Arc<dyn DateTimeZone> = Arc::new(FixedDateTimeZone::new(offset));
        let instant = Instant::from_unix_seconds(seconds).unwrap();
        let zoned = instant.in_zone(Arc::clone(&zone)).unwrap();
        prop_assert_eq!(zone.next_transition(instant), None);
        let resolved = ZonedDateTime::at_strictly(zoned.local(), zone).unwrap();
        prop_assert_eq!(resolved.to_instant(), instant);
    }
}

#[test]
fn test_local_time_plus_241_hours() {
    let start = LocalTime::new(12, 15, 8).unwrap();
    let moved = start.plus_hours(241);
    assert_eq!(moved, LocalTime::new(13, 15, 8).unwrap());
    assert_eq!(moved.plus_hours(-241), start);
}

#[test]
fn test_date_interval_examples() {
    let start = iso(2000, 1, 1);
    let end = iso(2000, 2, 10);
    assert_eq!(DateInterval::new(start, end, true).unwrap().length(), 41);
    assert_eq!(DateInterval::new(start, end, false).unwrap().length(), 40);

    let interval = DateInterval::new(iso(2000, 1, 1), iso(2014, 6, 30), true).unwrap();
    assert!(interval.contains(&iso(2010, 5, 5)).unwrap());
    assert!(!interval.contains(&iso(2015, 1, 1)).unwrap());
    assert!(DateInterval::new(end, start, true).is_err());

    let january = YearMonth::new(2000, 1).unwrap().to_date_interval().unwrap();
    assert_eq!(january.length(), 31);
}

#[test]
fn test_time_interval_across_midnight() {
    let eleven = LocalTime::new(23, 0, 0).unwrap();
    let interval = TimeInterval::new(eleven, LocalTime::new(1, 0, 0).unwrap());
    assert!(interval.contains(LocalTime::new(23, 59, 59).unwrap()));
    assert!(interval.contains(LocalTime::MIDNIGHT));
    assert!(!interval.contains(LocalTime::NOON));
    assert_eq!(interval.duration(), Duration::from_hours(2));
    assert_eq!(interval.period().hours(), 2);
}

#[test]
fn test_period_type_positions() {
    let expectations: [(PeriodType, &[(PeriodFieldType, usize)]); 3] = [
        (
            PeriodType::DAY_TIME,
            &[
                (PeriodFieldType::Days, 0),
                (PeriodFieldType::Hours, 1),
                (PeriodFieldType::Minutes, 2),
                (PeriodFieldType::Seconds, 3),
                (PeriodFieldType::Milliseconds, 4),
                (PeriodFieldType::Ticks, 5),
            ],
        ),
        (
            PeriodType::YEAR_MONTH_DAY,
            &[
                (PeriodFieldType::Years, 0),
                (PeriodFieldType::Months, 1),
                (PeriodFieldType::Days, 2),
            ],
        ),
        (PeriodType::WEEKS, &[(PeriodFieldType::Weeks, 0)]),
    ];
    for (period_type, positions) in expectations {
        for field in PeriodFieldType::ALL {
            let expected = positions
                .iter()
                .find(|(candidate, _)| *candidate == field)
                .map(|(_, index)| *index);
            assert_eq!(period_type.index_of(field), expected, "{period_type} {field:?}");
        }
    }
}

#[test]
fn test_offset_text_forms() {
    let offset = Offset::from_hours_and_minutes(-5, -30).unwrap();
    assert!(offset.to_string_with_format("G").is_ok());
    let err = offset.to_string_with_format("Q").unwrap_err();
    assert_eq!(err.kind(), tempora::ErrorKind::Format);
}

#[test]
fn test_cached_fixed_zones_hold_offset_everywhere() {
    let cache = DateTimeZoneCache::new(tempora::testing::FakeZoneSource::new("test"));
    let zone = cache.get_zone("UTC+05:30").unwrap();
    for instant in [Instant::MIN_VALUE, Instant::UNIX_EPOCH, Instant::MAX_VALUE] {
        assert_eq!(
            zone.get_offset_from_utc(instant),
            Offset::from_hours_and_minutes(5, 30).unwrap()
        );
        assert_eq!(zone.next_transition(instant), None);
        assert_eq!(zone.previous_transition(instant), None);
    }
}

#[test]
fn test_zoned_clock_follows_fake_clock() {
    let fake = Arc::new(tempora::testing::FakeClock::new(Instant::UNIX_EPOCH));
    let zone = Arc::new(FixedDateTimeZone::new(Offset::from_hours(2).unwrap()));
    let clock = ZonedClock::new(Arc::clone(&fake), zone, CalendarSystem::iso());
    assert_eq!(
        clock.get_current_local_date_time().unwrap(),
        LocalDateTime::from_fields(1970, 1, 1, 2, 0, 0).unwrap()
    );
    fake.advance(Duration::from_days(1)).unwrap();
    assert_eq!(clock.get_current_date().unwrap(), iso(1970, 1, 2));
}

fn assert_send_sync<T: Send + Sync>() {}
fn assert_value_type<T: Clone + PartialEq + std::fmt::Debug>() {}
fn assert_ordered<T: Ord>() {}
fn assert_unwind_safe<T: std::panic::UnwindSafe + std::panic::RefUnwindSafe>() {}

#[test]
fn test_value_types_are_shareable() {
    assert_send_sync::<Instant>();
    assert_send_sync::<Offset>();
    assert_send_sync::<LocalDate>();
    assert_send_sync::<LocalTime>();
    assert_send_sync::<LocalDateTime>();
    assert_send_sync::<ZonedDateTime>();
    assert_send_sync::<Period>();
    assert_send_sync::<DateInterval>();
    assert_send_sync::<TimeInterval>();
    assert_send_sync::<CalendarSystem>();
    assert_send_sync::<DateTimeZoneCache<tempora::testing::FakeZoneSource>>();

    assert_value_type::<Period>();
    assert_value_type::<YearMonth>();
    assert_value_type::<ZonedDateTime>();
    assert_ordered::<Instant>();
    assert_ordered::<Offset>();
    assert_ordered::<LocalTime>();
    assert_ordered::<Duration>();

    assert_unwind_safe::<CalendarSystem>();
    assert_unwind_safe::<LocalDate>();
    assert_unwind_safe::<LocalDateTime>();
    assert_unwind_safe::<YearMonth>();
    assert_unwind_safe::<DateInterval>();
    assert_unwind_safe::<Period>();
    assert_unwind_safe::<Instant>();
}

#[test]
fn test_tick_and_day_accessors() {
    let instant = Instant::from_unix_ticks(864_000_000_000).unwrap();
    assert_eq!(instant, Instant::from_unix_seconds(86_400).unwrap());

    let span = Duration::from_hours(-36);
    assert_eq!(span.total_days(), -1);
    assert_eq!(span.total_ticks(), -36 * 36_000_000_000);
    assert_eq!(LocalTime::new(0, 0, 1).unwrap().tick_of_day(), 10_000_000);

    let interval = DateInterval::new(iso(2000, 1, 1), iso(2000, 1, 3), false).unwrap();
    assert!(!interval.is_inclusive());
    assert!(PeriodType::YEAR_MONTH_DAY.supports(PeriodFieldType::Days));
    assert!(!PeriodType::YEAR_MONTH_DAY.supports(PeriodFieldType::Hours));
}

#[test]
fn test_zone_interval_local_bounds() {
    let transition = Instant::from_unix_seconds(1_710_054_000).unwrap();
    let zone: Arc<dyn DateTimeZone> =
        Arc::new(tempora::testing::SingleTransitionDateTimeZone::new(
            transition,
            Offset::from_hours(-5).unwrap(),
            Offset::from_hours(-4).unwrap(),
        ));
    let hour_before = transition.minus(Duration::from_hours(1)).unwrap();
    let before = hour_before.in_zone(Arc::clone(&zone)).unwrap();
    let early = before.zone_interval();
    assert_eq!(early.iso_local_start().unwrap(), None);
    assert_eq!(
        early.iso_local_end().unwrap(),
        Some(LocalDateTime::from_fields(2024, 3, 10, 2, 0, 0).unwrap())
    );

    let late = zone.get_zone_interval(transition);
    assert_eq!(
        late.iso_local_start().unwrap(),
        Some(LocalDateTime::from_fields(2024, 3, 10, 3, 0, 0).unwrap())
    );
    assert_eq!(late.iso_local_end().unwrap(), None);
}
