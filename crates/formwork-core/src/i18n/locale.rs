//! Locale descriptions.
//!
//! A [`Locale`] pairs a normalized tag with the display conventions the
//! formatting helpers need: separators, currency placement, date layout and
//! clock style. Unknown regional tags fall back to their language, and
//! unknown languages fall back to `en`.

use std::fmt;

use super::{language_fallbacks, normalize_tag};

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyPosition {
    /// `€10.00`, `€ 10,00`
    Prefix,
    /// `10,00 €`
    Suffix,
}

/// One numeric component of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    /// Day of month.
    Day,
    /// Month number.
    Month,
    /// Four-digit year.
    Year,
}

/// Display conventions shared by all tags that resolve to them.
#[derive(Debug, PartialEq, Eq)]
pub struct Conventions {
    /// Separator between integer and fraction digits.
    pub decimal_separator: char,
    /// Separator between groups of three integer digits.
    pub group_separator: char,
    /// Currency symbol placement.
    pub currency_position: CurrencyPosition,
    /// Whether a space separates the currency symbol from the amount.
    pub currency_spacing: bool,
    /// Order of the numeric date components.
    pub date_order: [DatePart; 3],
    /// Separator between date components.
    pub date_separator: &'static str,
    /// Whether day and month are zero-padded to two digits.
    pub pad_day_month: bool,
    /// Separator between the date and the time of a date-time.
    pub date_time_separator: &'static str,
    /// Whether times use a 12-hour clock with AM/PM.
    pub hour12: bool,
}

const EN: Conventions = Conventions {
    decimal_separator: '.',
    group_separator: ',',
    currency_position: CurrencyPosition::Prefix,
    currency_spacing: false,
    date_order: [DatePart::Month, DatePart::Day, DatePart::Year],
    date_separator: "/",
    pad_day_month: false,
    date_time_separator: ", ",
    hour12: true,
};

const EN_GB: Conventions = Conventions {
    decimal_separator: '.',
    group_separator: ',',
    currency_position: CurrencyPosition::Prefix,
    currency_spacing: false,
    date_order: [DatePart::Day, DatePart::Month, DatePart::Year],
    date_separator: "/",
    pad_day_month: true,
    date_time_separator: ", ",
    hour12: false,
};

const NL: Conventions = Conventions {
    decimal_separator: ',',
    group_separator: '.',
    currency_position: CurrencyPosition::Prefix,
    currency_spacing: true,
    date_order: [DatePart::Day, DatePart::Month, DatePart::Year],
    date_separator: "-",
    pad_day_month: false,
    date_time_separator: ", ",
    hour12: false,
};

const DE: Conventions = Conventions {
    decimal_separator: ',',
    group_separator: '.',
    currency_position: CurrencyPosition::Suffix,
    currency_spacing: true,
    date_order: [DatePart::Day, DatePart::Month, DatePart::Year],
    date_separator: ".",
    pad_day_month: false,
    date_time_separator: ", ",
    hour12: false,
};

const FR: Conventions = Conventions {
    decimal_separator: ',',
    group_separator: ' ',
    currency_position: CurrencyPosition::Suffix,
    currency_spacing: true,
    date_order: [DatePart::Day, DatePart::Month, DatePart::Year],
    date_separator: "/",
    pad_day_month: true,
    date_time_separator: " ",
    hour12: false,
};

fn known_conventions(tag: &str) -> Option<&'static Conventions> {
    match tag {
        "en" | "en-US" => Some(&EN),
        "en-GB" => Some(&EN_GB),
        "nl" | "nl-NL" | "nl-BE" => Some(&NL),
        "de" | "de-DE" | "de-AT" => Some(&DE),
        "fr" | "fr-FR" | "fr-BE" => Some(&FR),
        _ => None,
    }
}

/// A resolved locale: a normalized tag plus its display conventions.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::locale::Locale;
///
/// let nl = Locale::new("nl_NL");
/// assert_eq!(nl.tag(), "nl-NL");
/// assert_eq!(nl.language(), "nl");
/// assert_eq!(nl.conventions().decimal_separator, ',');
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Locale {
    tag: String,
    conventions: &'static Conventions,
}

impl Locale {
    /// Resolves a locale tag, falling back to the language and then to `en`.
    pub fn new(tag: &str) -> Self {
        let conventions = language_fallbacks(tag)
            .iter()
            .find_map(|candidate| known_conventions(candidate))
            .unwrap_or(&EN);
        Self {
            tag: normalize_tag(tag),
            conventions,
        }
    }

    /// The normalized tag this locale was requested with.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The language subtag.
    pub fn language(&self) -> &str {
        self.tag.split('-').next().unwrap_or(&self.tag)
    }

    /// The display conventions for this locale.
    pub const fn conventions(&self) -> &'static Conventions {
        self.conventions
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new("en")
    }
}

impl fmt::Debug for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Locale({})", self.tag)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}
