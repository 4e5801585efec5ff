//! Locale-aware display formatting for numbers, currency amounts, and dates.
//!
//! These helpers render values the way they are interpolated into validation
//! messages: a currency bound of `10` reads `€ 10,00` in Dutch and `€10.00`
//! in English, a date-time bound reads `8-10-2025, 12:00` in Dutch.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::locale::{CurrencyPosition, DatePart, Locale};

/// The reference date used to discover a locale's date layout.
///
/// Day, month and year are pairwise distinct and unambiguous (22, 11, 2023).
const REFERENCE_DATE: (i32, u32, u32) = (2023, 11, 22);

/// Groups the digits of a non-negative integer string with `separator`.
fn group_digits(digits: &str, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(separator);
        }
        result.push(*ch);
    }
    result
}

/// Formats `value` with exactly `fraction_digits` decimals.
///
/// The sign is returned separately so currency formatting can place it.
fn format_fixed_unsigned(value: f64, locale: &Locale, fraction_digits: usize) -> (bool, String) {
    let conventions = locale.conventions();
    let rendered = format!("{:.*}", fraction_digits, value.abs());
    let (integer, fraction) = rendered
        .split_once('.')
        .map_or((rendered.as_str(), ""), |(i, f)| (i, f));

    let mut out = group_digits(integer, conventions.group_separator);
    if !fraction.is_empty() {
        out.push(conventions.decimal_separator);
        out.push_str(fraction);
    }
    let negative = value < 0.0 && rendered.chars().any(|c| c.is_ascii_digit() && c != '0');
    (negative, out)
}

/// Formats a number with up to `max_fraction_digits` decimals, dropping
/// trailing zeros.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::formats::format_number;
/// use formwork_core::i18n::locale::Locale;
///
/// assert_eq!(format_number(1234.5, &Locale::new("en"), 3), "1,234.5");
/// assert_eq!(format_number(1234.5, &Locale::new("nl"), 3), "1.234,5");
/// assert_eq!(format_number(10.0, &Locale::new("nl"), 3), "10");
/// ```
pub fn format_number(value: f64, locale: &Locale, max_fraction_digits: usize) -> String {
    let (negative, fixed) = format_fixed_unsigned(value, locale, max_fraction_digits);
    let decimal = locale.conventions().decimal_separator;
    let trimmed = match fixed.split_once(decimal) {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{integer}{decimal}{fraction}")
            }
        }
        None => fixed,
    };
    if negative {
        format!("-{trimmed}")
    } else {
        trimmed
    }
}

/// Returns the display symbol for an ISO 4217 currency code.
///
/// Unknown codes are displayed as the code itself.
pub fn currency_symbol(code: &str) -> String {
    match code.to_uppercase().as_str() {
        "EUR" => "€".to_string(),
        "USD" => "$".to_string(),
        "GBP" => "£".to_string(),
        "JPY" => "¥".to_string(),
        other => other.to_string(),
    }
}

/// Returns the number of minor-unit digits displayed for a currency.
pub fn currency_fraction_digits(code: &str) -> usize {
    match code.to_uppercase().as_str() {
        "JPY" | "KRW" | "ISK" => 0,
        _ => 2,
    }
}

/// Formats a currency amount for display.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::formats::format_currency;
/// use formwork_core::i18n::locale::Locale;
///
/// assert_eq!(format_currency(10.0, "EUR", &Locale::new("nl")), "€ 10,00");
/// assert_eq!(format_currency(10.0, "EUR", &Locale::new("en")), "€10.00");
/// assert_eq!(format_currency(1234.5, "EUR", &Locale::new("de")), "1.234,50 €");
/// ```
pub fn format_currency(amount: f64, currency: &str, locale: &Locale) -> String {
    let conventions = locale.conventions();
    let (negative, digits) =
        format_fixed_unsigned(amount, locale, currency_fraction_digits(currency));
    let symbol = currency_symbol(currency);
    let space = if conventions.currency_spacing { " " } else { "" };
    let sign = if negative { "-" } else { "" };

    match (conventions.currency_position, conventions.currency_spacing) {
        (CurrencyPosition::Prefix, true) => format!("{symbol}{space}{sign}{digits}"),
        (CurrencyPosition::Prefix, false) => format!("{sign}{symbol}{digits}"),
        (CurrencyPosition::Suffix, _) => format!("{sign}{digits}{space}{symbol}"),
    }
}

/// Formats a calendar date in the locale's numeric layout.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use formwork_core::i18n::formats::format_date;
/// use formwork_core::i18n::locale::Locale;
///
/// let date = NaiveDate::from_ymd_opt(2025, 10, 8).unwrap();
/// assert_eq!(format_date(date, &Locale::new("nl")), "8-10-2025");
/// assert_eq!(format_date(date, &Locale::new("en")), "10/8/2025");
/// assert_eq!(format_date(date, &Locale::new("en-GB")), "08/10/2025");
/// ```
pub fn format_date(date: NaiveDate, locale: &Locale) -> String {
    let conventions = locale.conventions();
    let pad = |n: u32| {
        if conventions.pad_day_month {
            format!("{n:02}")
        } else {
            n.to_string()
        }
    };
    conventions
        .date_order
        .iter()
        .map(|part| match part {
            DatePart::Day => pad(date.day()),
            DatePart::Month => pad(date.month()),
            DatePart::Year => format!("{:04}", date.year()),
        })
        .collect::<Vec<_>>()
        .join(conventions.date_separator)
}

/// Formats a time of day. Seconds are shown only when non-zero.
///
/// # Examples
///
/// ```
/// use chrono::NaiveTime;
/// use formwork_core::i18n::formats::format_time;
/// use formwork_core::i18n::locale::Locale;
///
/// let time = NaiveTime::from_hms_opt(13, 5, 0).unwrap();
/// assert_eq!(format_time(time, &Locale::new("nl")), "13:05");
/// assert_eq!(format_time(time, &Locale::new("en")), "1:05 PM");
/// ```
pub fn format_time(time: NaiveTime, locale: &Locale) -> String {
    let seconds = if time.second() == 0 {
        String::new()
    } else {
        format!(":{:02}", time.second())
    };
    if locale.conventions().hour12 {
        let (pm, hour) = time.hour12();
        let suffix = if pm { "PM" } else { "AM" };
        format!("{hour}:{:02}{seconds} {suffix}", time.minute())
    } else {
        format!("{:02}:{:02}{seconds}", time.hour(), time.minute())
    }
}

/// Formats a date-time as date, separator, time.
pub fn format_date_time(value: NaiveDateTime, locale: &Locale) -> String {
    format!(
        "{}{}{}",
        format_date(value.date(), locale),
        locale.conventions().date_time_separator,
        format_time(value.time(), locale)
    )
}

/// The order and separator of a locale's numeric date layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayout {
    /// Date components in display order.
    pub order: Vec<DatePart>,
    /// The punctuation between components.
    pub separator: String,
}

/// Discovers a locale's date layout by formatting a fixed reference date and
/// inspecting the resulting tokens.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::formats::date_parts_order;
/// use formwork_core::i18n::locale::{DatePart, Locale};
///
/// let layout = date_parts_order(&Locale::new("en"));
/// assert_eq!(layout.order, vec![DatePart::Month, DatePart::Day, DatePart::Year]);
/// assert_eq!(layout.separator, "/");
/// ```
pub fn date_parts_order(locale: &Locale) -> DateLayout {
    let (year, month, day) = REFERENCE_DATE;
    let reference = NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default();
    let formatted = format_date(reference, locale);

    let mut order = Vec::with_capacity(3);
    let mut separator = String::new();
    let mut token = String::new();
    let flush = |token: &mut String, order: &mut Vec<DatePart>| {
        if let Ok(n) = token.parse::<u32>() {
            #[allow(clippy::cast_possible_wrap)]
            let part = if n as i32 == year {
                Some(DatePart::Year)
            } else if n == month {
                Some(DatePart::Month)
            } else if n == day {
                Some(DatePart::Day)
            } else {
                None
            };
            order.extend(part);
        }
        token.clear();
    };

    for ch in formatted.chars() {
        if ch.is_ascii_digit() {
            token.push(ch);
        } else {
            flush(&mut token, &mut order);
            if order.len() == 1 {
                separator.push(ch);
            }
        }
    }
    flush(&mut token, &mut order);

    DateLayout { order, separator }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nl() -> Locale {
        Locale::new("nl")
    }

    fn en() -> Locale {
        Locale::new("en")
    }

    #[test]
    fn test_group_digits() {
        assert_eq!(group_digits("0", ','), "0");
        assert_eq!(group_digits("999", ','), "999");
        assert_eq!(group_digits("1000", ','), "1,000");
        assert_eq!(group_digits("1234567", '.'), "1.234.567");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.0, &en(), 3), "0");
        assert_eq!(format_number(9.1, &nl(), 3), "9,1");
        assert_eq!(format_number(-1_234_567.126, &en(), 2), "-1,234,567.13");
        assert_eq!(format_number(2.000_4, &en(), 3), "2");
        assert_eq!(format_number(-0.0001, &en(), 2), "0");
    }

    #[test]
    fn test_format_currency_scenarios() {
        assert_eq!(format_currency(10.0, "EUR", &nl()), "€ 10,00");
        assert_eq!(format_currency(10.0, "EUR", &en()), "€10.00");
        assert_eq!(format_currency(-5.5, "EUR", &nl()), "€ -5,50");
        assert_eq!(format_currency(-5.5, "USD", &en()), "-$5.50");
        assert_eq!(format_currency(1500.0, "JPY", &en()), "¥1,500");
        assert_eq!(format_currency(3.0, "CHF", &Locale::new("de")), "3,00 CHF");
        assert_eq!(format_currency(1234.5, "EUR", &Locale::new("fr")), "1 234,50 €");
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        assert_eq!(format_date(date, &nl()), "2-1-2025");
        assert_eq!(format_date(date, &en()), "1/2/2025");
        assert_eq!(format_date(date, &Locale::new("de")), "2.1.2025");
        assert_eq!(format_date(date, &Locale::new("fr")), "02/01/2025");
    }

    #[test]
    fn test_format_time() {
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        assert_eq!(format_time(midnight, &en()), "12:00 AM");
        assert_eq!(format_time(midnight, &nl()), "00:00");
        let with_seconds = NaiveTime::from_hms_opt(9, 7, 30).unwrap();
        assert_eq!(format_time(with_seconds, &nl()), "09:07:30");
        assert_eq!(format_time(with_seconds, &en()), "9:07:30 AM");
    }

    #[test]
    fn test_format_date_time() {
        let value = NaiveDate::from_ymd_opt(2025, 10, 8)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(format_date_time(value, &nl()), "8-10-2025, 12:00");
        assert_eq!(format_date_time(value, &en()), "10/8/2025, 12:00 PM");
        assert_eq!(format_date_time(value, &Locale::new("fr")), "08/10/2025 12:00");
    }

    #[test]
    fn test_date_parts_order() {
        let layout = date_parts_order(&nl());
        assert_eq!(
            layout.order,
            vec![DatePart::Day, DatePart::Month, DatePart::Year]
        );
        assert_eq!(layout.separator, "-");

        let layout = date_parts_order(&Locale::new("de"));
        assert_eq!(layout.separator, ".");
    }
}
