//! Date and time parsing.
//!
//! Two families of parsers live here:
//!
//! - **Strict ISO-8601** parsers used for submission values. A value is
//!   accepted only when fully specified, zero-padded and separator-exact;
//!   anything else is a shape error for the caller.
//! - **Lenient localized** parsers for user-entered strings such as
//!   `8-10-2025, 12:00` (nl) or `10/8/2025, 12:00 PM` (en). Day and month
//!   may be single-digit and seconds are optional. The day/month/year order
//!   comes from [`date_parts_order`].
//!
//! Validation itself only uses the strict parsers and
//! [`parse_date_time_bound`]. [`parse_date`] and [`parse_date_time`] are
//! exported for host applications that accept dates typed in the user's own
//! notation (a search filter, a pre-fill import) and need them in the ISO form
//! submissions carry:
//!
//! ```
//! use formwork_core::i18n::dates::parse_date;
//! use formwork_core::i18n::locale::Locale;
//!
//! let date = parse_date("8-10-2025", &Locale::new("nl")).unwrap();
//! assert_eq!(date.format("%Y-%m-%d").to_string(), "2025-10-08");
//! ```
//!
//! Bounds declared in a form definition (`minDate`, `maxDate`) are parsed
//! with [`parse_date_time_bound`], which accepts the shorter ISO forms form
//! builders emit (`2025-10-08T12:00`, `2025-10-08`).

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::formats::date_parts_order;
use super::locale::{DatePart, Locale};
use super::timezone::{assume_offset, fixed_offset};

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

static ISO_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2})(?::(\d{2}))?$").expect("valid regex"));

static ISO_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})T(\d{2}):(\d{2}):(\d{2})(?:\.\d{1,9})?(Z|[+-]\d{2}:\d{2})?$",
    )
    .expect("valid regex")
});

static BOUND_DATE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(\d{4})-(\d{2})-(\d{2})(?:[T ](\d{2}):(\d{2})(?::(\d{2}))?(?:\.\d{1,9})?)?(Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("valid regex")
});

static LOCALIZED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(\d{1,4})[./-](\d{1,2})[./-](\d{1,4})(?:(?:,\s*|\s+|T)(\d{1,2}):(\d{2})(?::(\d{2}))?\s*([AaPp][Mm])?)?\s*$",
    )
    .expect("valid regex")
});

fn number(caps: &Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index).and_then(|m| m.as_str().parse().ok())
}

fn date_from(caps: &Captures<'_>) -> Option<NaiveDate> {
    let year = caps.get(1)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, number(caps, 2)?, number(caps, 3)?)
}

/// Parses a `Z`, `+HH:MM`, `-HH:MM` or `+HHMM` suffix into seconds east of UTC.
fn parse_offset(suffix: &str) -> Option<i32> {
    if suffix == "Z" {
        return Some(0);
    }
    let sign = if suffix.starts_with('-') { -1 } else { 1 };
    let digits: String = suffix[1..].chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 4 {
        return None;
    }
    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(sign * (hours * 3600 + minutes * 60))
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::dates::parse_iso_date;
///
/// assert!(parse_iso_date("2025-10-08").is_some());
/// assert!(parse_iso_date("2025-1-8").is_none());
/// assert!(parse_iso_date("2025-02-30").is_none());
/// ```
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    ISO_DATE.captures(input).and_then(|caps| date_from(&caps))
}

/// Parses a strict `HH:MM` or `HH:MM:SS` time of day.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::dates::parse_iso_time;
///
/// assert!(parse_iso_time("09:30").is_some());
/// assert!(parse_iso_time("23:59:59").is_some());
/// assert!(parse_iso_time("9:30").is_none());
/// assert!(parse_iso_time("24:00").is_none());
/// ```
pub fn parse_iso_time(input: &str) -> Option<NaiveTime> {
    let caps = ISO_TIME.captures(input)?;
    NaiveTime::from_hms_opt(number(&caps, 1)?, number(&caps, 2)?, number(&caps, 3).unwrap_or(0))
}

/// Parses a strict `YYYY-MM-DDTHH:MM:SS` date-time, optionally with
/// fractional seconds and a `Z`/`±HH:MM` offset.
///
/// Values without an offset are interpreted at `default_offset` seconds east
/// of UTC.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::dates::parse_iso_date_time;
///
/// assert!(parse_iso_date_time("2025-10-08T12:51:00", 0).is_some());
/// assert!(parse_iso_date_time("2025-10-08T12:51:00+02:00", 0).is_some());
/// assert!(parse_iso_date_time("2025-10-08T12:51", 0).is_none());
/// assert!(parse_iso_date_time("2025-10-08", 0).is_none());
/// ```
pub fn parse_iso_date_time(input: &str, default_offset: i32) -> Option<DateTime<FixedOffset>> {
    let caps = ISO_DATE_TIME.captures(input)?;
    let time = NaiveTime::from_hms_opt(number(&caps, 4)?, number(&caps, 5)?, number(&caps, 6)?)?;
    let naive = NaiveDateTime::new(date_from(&caps)?, time);
    with_offset(naive, caps.get(7).map(|m| m.as_str()), default_offset)
}

/// Parses a date-time bound from a form definition.
///
/// Accepts everything [`parse_iso_date_time`] does, plus values without
/// seconds (`2025-10-08T12:00`), with a space instead of `T`, and bare dates
/// (midnight).
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::dates::parse_date_time_bound;
///
/// assert!(parse_date_time_bound("2025-10-08T12:00", 0).is_some());
/// assert!(parse_date_time_bound("2025-10-08", 0).is_some());
/// assert!(parse_date_time_bound("08-10-2025", 0).is_none());
/// ```
pub fn parse_date_time_bound(input: &str, default_offset: i32) -> Option<DateTime<FixedOffset>> {
    let caps = BOUND_DATE_TIME.captures(input.trim())?;
    let time = if caps.get(4).is_some() {
        NaiveTime::from_hms_opt(
            number(&caps, 4)?,
            number(&caps, 5)?,
            number(&caps, 6).unwrap_or(0),
        )?
    } else {
        NaiveTime::MIN
    };
    let naive = NaiveDateTime::new(date_from(&caps)?, time);
    with_offset(naive, caps.get(7).map(|m| m.as_str()), default_offset)
}

fn with_offset(
    naive: NaiveDateTime,
    suffix: Option<&str>,
    default_offset: i32,
) -> Option<DateTime<FixedOffset>> {
    match suffix {
        Some(suffix) => {
            let offset = fixed_offset(parse_offset(suffix)?);
            naive.and_local_timezone(offset).single()
        }
        None => Some(assume_offset(naive, default_offset)),
    }
}

/// The pieces of a lenient localized date/date-time string.
struct LocalizedParts {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

fn parse_localized(input: &str, locale: &Locale) -> Option<LocalizedParts> {
    let caps = LOCALIZED.captures(input)?;
    let layout = date_parts_order(locale);

    let mut day = None;
    let mut month = None;
    let mut year = None;
    for (index, part) in layout.order.iter().enumerate() {
        let token = caps.get(index + 1)?.as_str();
        match part {
            DatePart::Day => day = token.parse::<u32>().ok(),
            DatePart::Month => month = token.parse::<u32>().ok(),
            DatePart::Year => {
                if token.len() != 4 {
                    return None;
                }
                year = token.parse::<i32>().ok();
            }
        }
    }
    let date = NaiveDate::from_ymd_opt(year?, month?, day?)?;

    let time = match caps.get(4) {
        None => None,
        Some(hour) => {
            let mut hour: u32 = hour.as_str().parse().ok()?;
            let minute = number(&caps, 5)?;
            let second = number(&caps, 6).unwrap_or(0);
            if let Some(meridiem) = caps.get(7) {
                if !(1..=12).contains(&hour) {
                    return None;
                }
                let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
                hour = match (pm, hour) {
                    (false, 12) => 0,
                    (true, 12) => 12,
                    (true, h) => h + 12,
                    (false, h) => h,
                };
            }
            Some(NaiveTime::from_hms_opt(hour, minute, second)?)
        }
    };

    Some(LocalizedParts { date, time })
}

/// Parses a user-entered, locale-formatted date.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use formwork_core::i18n::dates::parse_date;
/// use formwork_core::i18n::locale::Locale;
///
/// let expected = NaiveDate::from_ymd_opt(2025, 10, 8);
/// assert_eq!(parse_date("8-10-2025", &Locale::new("nl")), expected);
/// assert_eq!(parse_date("10/8/2025", &Locale::new("en")), expected);
/// ```
pub fn parse_date(input: &str, locale: &Locale) -> Option<NaiveDate> {
    parse_localized(input, locale)
        .filter(|parts| parts.time.is_none())
        .map(|parts| parts.date)
}

/// Parses a user-entered, locale-formatted date-time into an instant.
///
/// The wall-clock value is interpreted at `offset_seconds` east of UTC.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::dates::parse_date_time;
/// use formwork_core::i18n::locale::Locale;
///
/// let nl = parse_date_time("8-10-2025, 12:00", &Locale::new("nl"), 0).unwrap();
/// let en = parse_date_time("10/8/2025, 12:00 PM", &Locale::new("en"), 0).unwrap();
/// assert_eq!(nl, en);
/// ```
pub fn parse_date_time(
    input: &str,
    locale: &Locale,
    offset_seconds: i32,
) -> Option<DateTime<FixedOffset>> {
    let parts = parse_localized(input, locale)?;
    let naive = NaiveDateTime::new(parts.date, parts.time?);
    Some(assume_offset(naive, offset_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_iso_date_rejects_partial_and_out_of_range() {
        assert!(parse_iso_date("2025-10").is_none());
        assert!(parse_iso_date("2025-13-01").is_none());
        assert!(parse_iso_date("2025/10/08").is_none());
        assert!(parse_iso_date(" 2025-10-08").is_none());
        assert_eq!(
            parse_iso_date("2024-02-29"),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
    }

    #[test]
    fn test_iso_time() {
        assert_eq!(parse_iso_time("00:00"), Some(NaiveTime::MIN));
        assert!(parse_iso_time("12:60").is_none());
        assert!(parse_iso_time("12.30").is_none());
        assert_eq!(parse_iso_time("07:05:09").unwrap().second(), 9);
    }

    #[test]
    fn test_iso_date_time_requires_seconds() {
        assert!(parse_iso_date_time("2025-10-08T12:51:00", 0).is_some());
        assert!(parse_iso_date_time("2025-10-08T12:51:00.123Z", 0).is_some());
        assert!(parse_iso_date_time("2025-10-08 12:51:00", 0).is_none());
        assert!(parse_iso_date_time("2025-10-08T25:00:00", 0).is_none());
        assert!(parse_iso_date_time("2025-10-08T12:00:00+25:00", 0).is_none());
    }

    #[test]
    fn test_iso_date_time_offsets() {
        let explicit = parse_iso_date_time("2025-10-08T12:00:00+02:00", 0).unwrap();
        let implicit = parse_iso_date_time("2025-10-08T12:00:00", 2 * 3600).unwrap();
        let utc = parse_iso_date_time("2025-10-08T10:00:00Z", 5 * 3600).unwrap();
        assert_eq!(explicit, implicit);
        assert_eq!(explicit, utc);
    }

    #[test]
    fn test_bound_forms() {
        let minute = parse_date_time_bound("2025-10-08T12:00", 0).unwrap();
        let full = parse_iso_date_time("2025-10-08T12:00:00", 0).unwrap();
        assert_eq!(minute, full);

        let date_only = parse_date_time_bound("2025-10-08", 0).unwrap();
        assert_eq!(date_only.hour(), 0);
        assert!(parse_date_time_bound("2025-10-08T12:00+0200", 0).is_some());
        assert!(parse_date_time_bound("", 0).is_none());
    }

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset("Z"), Some(0));
        assert_eq!(parse_offset("-05:30"), Some(-(5 * 3600 + 30 * 60)));
        assert_eq!(parse_offset("+0100"), Some(3600));
        assert_eq!(parse_offset("+1"), None);
    }

    #[test]
    fn test_localized_single_digit_and_optional_seconds() {
        let nl = Locale::new("nl");
        let dt = parse_date_time("1-2-2025 9:05", &nl, 0).unwrap();
        assert_eq!((dt.day(), dt.month(), dt.hour(), dt.minute()), (1, 2, 9, 5));

        let with_seconds = parse_date_time("01-02-2025, 09:05:30", &nl, 0).unwrap();
        assert_eq!(with_seconds.second(), 30);
    }

    #[test]
    fn test_localized_respects_part_order() {
        let date = parse_date("3/4/2025", &Locale::new("en")).unwrap();
        assert_eq!((date.month(), date.day()), (3, 4));
        let date = parse_date("3/4/2025", &Locale::new("en-GB")).unwrap();
        assert_eq!((date.month(), date.day()), (4, 3));
        let date = parse_date("22.11.2023", &Locale::new("de")).unwrap();
        assert_eq!((date.day(), date.month(), date.year()), (22, 11, 2023));
    }

    #[test]
    fn test_localized_meridiem() {
        let en = Locale::new("en");
        assert_eq!(parse_date_time("1/1/2025, 12:15 AM", &en, 0).unwrap().hour(), 0);
        assert_eq!(parse_date_time("1/1/2025, 12:15 PM", &en, 0).unwrap().hour(), 12);
        assert_eq!(parse_date_time("1/1/2025, 1:15 pm", &en, 0).unwrap().hour(), 13);
        assert!(parse_date_time("1/1/2025, 13:15 PM", &en, 0).is_none());
    }

    #[test]
    fn test_localized_rejects_invalid() {
        let nl = Locale::new("nl");
        assert!(parse_date("31-2-2025", &nl).is_none());
        assert!(parse_date("8-10-25", &nl).is_none());
        assert!(parse_date("8-10-2025, 12:00", &nl).is_none());
        assert!(parse_date_time("8-10-2025", &nl, 0).is_none());
        assert!(parse_date_time("8-10-2025, 24:00", &nl, 0).is_none());
    }
}
