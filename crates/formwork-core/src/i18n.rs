//! Internationalization and localization (i18n/l10n).
//!
//! This module provides:
//!
//! - **Translation catalog**: translations per language, registered at setup
//!   time or loaded from JSON.
//! - **Locales**: separator, currency, date and clock conventions per locale tag.
//! - **Formatting**: numbers, currency amounts, dates and times rendered for display.
//! - **Parsing**: strict ISO-8601 value parsing and lenient parsing of
//!   user-entered, locale-formatted dates.
//! - **Timezone**: fixed-offset conversions for instants.
//!
//! Nothing here keeps per-thread or per-request state: every function takes the
//! locale tag (or [`Locale`](locale::Locale)) it should use.
//!
//! ## Quick Start
//!
//! ```
//! use formwork_core::i18n;
//!
//! i18n::catalog::register_translations("es", vec![("greeting", "Hola")]);
//! assert_eq!(i18n::gettext_for("es-MX", "greeting"), "Hola");
//! assert_eq!(i18n::gettext_for("en", "greeting"), "greeting");
//! ```

pub mod catalog;
pub mod dates;
pub mod formats;
pub mod locale;
pub mod timezone;

/// Returns the lookup chain for a locale tag, most specific first.
///
/// Tags are normalized to a lowercase language with an uppercase region, and
/// `_` is accepted as a separator.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::language_fallbacks;
///
/// assert_eq!(language_fallbacks("nl_be"), vec!["nl-BE", "nl"]);
/// assert_eq!(language_fallbacks("en"), vec!["en"]);
/// ```
pub fn language_fallbacks(tag: &str) -> Vec<String> {
    let normalized = normalize_tag(tag);
    let mut chain = vec![normalized.clone()];
    if let Some((language, _)) = normalized.split_once('-') {
        chain.push(language.to_string());
    }
    chain
}

/// Normalizes a locale tag: `"EN_gb"` becomes `"en-GB"`.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim().replace('_', "-");
    match tag.split_once('-') {
        Some((language, region)) => {
            format!("{}-{}", language.to_lowercase(), region.to_uppercase())
        }
        None => tag.to_lowercase(),
    }
}

/// Translates a message for the given locale tag.
///
/// The regional catalog is consulted first, then the language catalog. If no
/// translation is found, the original `msgid` is returned.
pub fn gettext_for(tag: &str, msgid: &str) -> String {
    lookup(tag, msgid).unwrap_or_else(|| msgid.to_string())
}

/// Like [`gettext_for`], but returns `None` when no catalog has the message.
pub fn lookup(tag: &str, msgid: &str) -> Option<String> {
    language_fallbacks(tag)
        .iter()
        .find_map(|language| catalog::translate(language, msgid))
}

/// Substitutes `{name}` placeholders in `template` with the given values.
///
/// Unknown placeholders are left untouched, and a placeholder may appear
/// more than once.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::interpolate;
///
/// let out = interpolate("Value must be {min} or greater.", &[("min", "10".to_string())]);
/// assert_eq!(out, "Value must be 10 or greater.");
/// ```
pub fn interpolate(template: &str, values: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (name, value) in values {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}
