//! # tempora
//!
//! Calendar-aware temporal arithmetic.
//!
//! tempora separates the global timeline ([`Instant`], [`Duration`]) from
//! civil values read off a calendar ([`LocalDate`], [`LocalTime`],
//! [`LocalDateTime`]). A [`DateTimeZone`] maps between the two, and a
//! [`ZonedDateTime`] carries both views at once.
//!
//! ## Modules
//!
//! - [`calendar`] — ISO, Gregorian, Julian, Coptic and Islamic calendar systems with eras
//! - [`zone`] — fixed, precalculated and rule-based zones, the zone cache and the tzdb source
//! - [`period`] — calendar-field periods and the differences between local values
//! - [`interval`] — date ranges and wrapping time-of-day ranges
//! - [`clock`] — clocks read in a zone and calendar
//! - [`testing`] — fake clocks, zones and zone sources
//! - [`error`] — error types
//!
//! ## Example
//!
//! ```
//! use tempora::{CalendarSystem, LocalDate, Period};
//!
//! let date = LocalDate::new(2024, 1, 31).unwrap();
//! assert_eq!(date.plus_months(1).unwrap(), LocalDate::new(2024, 2, 29).unwrap());
//!
//! let julian = date.with_calendar(CalendarSystem::julian()).unwrap();
//! assert_eq!((julian.year(), julian.month(), julian.day()), (2024, 1, 18));
//! assert_eq!(date.plus_period(&Period::from_weeks(1)).unwrap().day(), 7);
//! ```

pub mod calendar;
pub mod clock;
pub mod duration;
pub mod error;
pub mod instant;
mod interop;
pub mod interval;
pub mod local_date;
pub mod local_date_time;
pub mod local_time;
pub mod offset;
pub mod period;
pub mod testing;
pub mod units;
pub mod year_month;
pub mod zone;
pub mod zoned_date_time;

pub use calendar::{CalendarSystem, Era, IslamicEpoch, IslamicLeapYearPattern};
pub use clock::{Clock, ZonedClock};
pub use duration::Duration;
pub use error::{ErrorKind, Result, TemporalError};
pub use instant::Instant;
pub use interval::{DateInterval, TimeInterval};
pub use local_date::{IsoDayOfWeek, LocalDate};
pub use local_date_time::LocalDateTime;
pub use local_time::LocalTime;
pub use offset::Offset;
pub use period::{Period, PeriodFieldType, PeriodType};
pub use year_month::YearMonth;
#[cfg(feature = "tzdb")]
pub use zone::TzdbSource;
pub use zone::{
    DateTimeZone, DateTimeZoneCache, FixedDateTimeZone, PrecalculatedDateTimeZone,
    StandardDaylightAlternatingMap, TransitionMode, ZoneInterval, ZoneLocalMapping,
    ZoneRecurrence, ZoneSource, ZoneYearOffset,
};
pub use zoned_date_time::ZonedDateTime;
