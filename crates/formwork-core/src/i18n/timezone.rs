//! Fixed-offset timezone helpers.
//!
//! Submission values carry either an explicit UTC offset or none at all. Values
//! without one are interpreted at the configured offset
//! ([`Settings::time_zone_offset`](crate::settings::Settings)), so that bound
//! comparisons always happen between absolute instants.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use formwork_core::i18n::timezone;
//!
//! let naive = NaiveDate::from_ymd_opt(2025, 10, 8).unwrap().and_hms_opt(12, 0, 0).unwrap();
//! let amsterdam = timezone::assume_offset(naive, 2 * 3600);
//! let utc = timezone::localtime_with_offset(&amsterdam, 0);
//! assert_eq!(utc.format("%H:%M").to_string(), "10:00");
//! ```

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};

/// Seconds in a day; offsets must lie strictly within one day of UTC.
const DAY_SECONDS: i32 = 86_400;

/// Returns UTC as a `FixedOffset`.
pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).expect("UTC offset")
}

/// Returns a `FixedOffset` for `offset_seconds` east of UTC.
///
/// Offsets outside `(-24h, +24h)` are not representable and yield UTC.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::timezone;
///
/// assert_eq!(timezone::fixed_offset(3600).local_minus_utc(), 3600);
/// assert_eq!(timezone::fixed_offset(90_000).local_minus_utc(), 0);
/// ```
pub fn fixed_offset(offset_seconds: i32) -> FixedOffset {
    if offset_seconds.abs() >= DAY_SECONDS {
        tracing::warn!(offset_seconds, "timezone offset out of range; using UTC");
        return utc();
    }
    FixedOffset::east_opt(offset_seconds).unwrap_or_else(utc)
}

/// Converts an instant to a specific timezone offset.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::timezone;
/// use chrono::{Datelike, FixedOffset, TimeZone, Timelike};
///
/// let utc = FixedOffset::east_opt(0).unwrap();
/// let dt = utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
///
/// let est = timezone::localtime_with_offset(&dt, -5 * 3600);
/// assert_eq!(est.day(), 31);
/// assert_eq!(est.month(), 12);
/// assert_eq!(est.hour(), 19);
/// ```
pub fn localtime_with_offset(
    dt: &DateTime<FixedOffset>,
    offset_seconds: i32,
) -> DateTime<FixedOffset> {
    dt.with_timezone(&fixed_offset(offset_seconds))
}

/// Interprets a wall-clock date-time as local time at the given offset.
pub fn assume_offset(naive: NaiveDateTime, offset_seconds: i32) -> DateTime<FixedOffset> {
    let tz = fixed_offset(offset_seconds);
    tz.from_local_datetime(&naive)
        .single()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate, Timelike, Utc};

    fn noon(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_fixed_offset_range() {
        assert_eq!(fixed_offset(-8 * 3600).local_minus_utc(), -8 * 3600);
        assert_eq!(fixed_offset(DAY_SECONDS).local_minus_utc(), 0);
        assert_eq!(fixed_offset(-DAY_SECONDS).local_minus_utc(), 0);
    }

    #[test]
    fn test_assume_offset_keeps_wall_clock() {
        let dt = assume_offset(noon(2024, 6, 15), 5 * 3600);
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.offset().local_minus_utc(), 5 * 3600);
        assert_eq!(dt.with_timezone(&Utc).hour(), 7);
    }

    #[test]
    fn test_localtime_negative_offset() {
        let dt = assume_offset(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(3, 0, 0)
                .unwrap(),
            0,
        );
        let local = localtime_with_offset(&dt, -5 * 3600);
        assert_eq!(local.hour(), 22);
        assert_eq!(local.day(), 31);
        assert_eq!(local.month(), 12);
    }

    #[test]
    fn test_half_hour_offset() {
        let dt = assume_offset(noon(2024, 6, 15), 0);
        let local = localtime_with_offset(&dt, 5 * 3600 + 30 * 60);
        assert_eq!(local.hour(), 17);
        assert_eq!(local.minute(), 30);
    }

    #[test]
    fn test_same_instant_different_offsets_compare_equal() {
        let a = assume_offset(noon(2025, 10, 8), 2 * 3600);
        let b = assume_offset(
            NaiveDate::from_ymd_opt(2025, 10, 8)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            0,
        );
        assert_eq!(a, b);
    }
}
