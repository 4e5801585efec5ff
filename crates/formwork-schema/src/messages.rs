//! Localized validation messages.
//!
//! Every constraint names a [`MessageDescriptor`]: a catalog id, the
//! constraint code used for per-field overrides, and an English default. A
//! [`MessageFormatter`] turns a descriptor plus substitutions into text for
//! its locale; [`CatalogFormatter`] does so through the core translation
//! catalog, into which the bundled `nl` and `en` catalogs are installed.
//!
//! Resolution order for one field is fixed: an `errors[code]` override on the
//! component wins verbatim, otherwise the formatter's localized default is
//! used (see [`FieldMessages::resolve`]).

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Once};

use formwork_core::i18n::{self, catalog};
use formwork_core::Locale;

use crate::definition::ComponentBase;

/// Identifies a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageDescriptor {
    /// Catalog message id.
    pub id: &'static str,
    /// Constraint code; also the key of per-field overrides.
    pub code: &'static str,
    /// English text used when no catalog has the id.
    pub default_message: &'static str,
}

impl MessageDescriptor {
    /// Creates a descriptor.
    pub const fn new(id: &'static str, code: &'static str, default_message: &'static str) -> Self {
        Self {
            id,
            code,
            default_message,
        }
    }
}

macro_rules! descriptors {
    ($($name:ident => $code:literal, $id:literal, $default:literal;)*) => {
        $(
            #[doc = concat!("`", $code, "`: ", $default)]
            pub const $name: MessageDescriptor = MessageDescriptor::new($id, $code, $default);
        )*
    };
}

descriptors! {
    REQUIRED => "required", "validation.required", "The required field {field} is missing.";
    INVALID_TYPE => "invalidType", "validation.invalidType", "Expected {expected}, received {received}.";
    PATTERN => "pattern", "validation.pattern", "The value does not match the pattern {pattern}.";
    MIN => "min", "validation.min", "Value must be {min} or greater.";
    MAX => "max", "validation.max", "Value must be {max} or smaller.";
    MIN_LENGTH => "minLength", "validation.minLength", "Value must contain at least {minLength} characters.";
    MAX_LENGTH => "maxLength", "validation.maxLength", "Value must contain at most {maxLength} characters.";
    DECIMAL_LIMIT => "decimalLimit", "validation.decimalLimit", "Value may have at most {decimalLimit} decimals.";
    INVALID_EMAIL => "invalidEmail", "validation.invalidEmail", "Invalid email address.";
    INVALID_PHONE_NUMBER => "invalidPhoneNumber", "validation.invalidPhoneNumber", "Invalid phone number.";
    INVALID_POSTCODE => "invalidPostcode", "validation.invalidPostcode", "Invalid Dutch postcode.";
    INVALID_LICENSEPLATE => "invalidLicenseplate", "validation.invalidLicenseplate", "Invalid Dutch license plate.";
    INVALID_BSN => "invalidBsn", "validation.invalidBsn", "Invalid BSN.";
    INVALID_IBAN => "invalidIban", "validation.invalidIban", "Invalid IBAN.";
    INVALID_DATE => "invalidDate", "validation.invalidDate", "Invalid date.";
    INVALID_DATETIME => "invalidDatetime", "validation.invalidDatetime", "Invalid date and time.";
    INVALID_TIME => "invalidTime", "validation.invalidTime", "Invalid time.";
    MIN_DATE => "minDate", "validation.minDate", "The value must be {minDate} or later.";
    MAX_DATE => "maxDate", "validation.maxDate", "The value must be {maxDate} or earlier.";
    MIN_TIME => "minTime", "validation.minTime", "Only times from {minTime} are allowed.";
    MAX_TIME => "maxTime", "validation.maxTime", "Only times until {maxTime} are allowed.";
    TIME_RANGE => "timeRange", "validation.timeRange", "Only times between {minTime} and {maxTime} are allowed.";
    INVALID_OPTION => "invalidOption", "validation.invalidOption", "Invalid option '{value}'.";
    MIN_SELECTED_COUNT => "minSelectedCount", "validation.minSelectedCount", "Select at least {minSelectedCount} options.";
    MAX_SELECTED_COUNT => "maxSelectedCount", "validation.maxSelectedCount", "Select at most {maxSelectedCount} options.";
    INVALID_SIGNATURE => "invalidSignature", "validation.invalidSignature", "Invalid signature.";
    MAX_ITEMS => "maxLength", "validation.maxItems", "Add at most {maxLength} items.";
    UNIQUE => "unique", "validation.unique", "The value {value} occurs more than once.";
    DUPLICATE_BSN => "duplicateBsn", "validation.duplicateBsn", "The BSN {value} occurs more than once.";
}

static BUILTIN_CATALOGS: Once = Once::new();

/// Installs the bundled `nl` and `en` catalogs into the core catalog.
///
/// Runs once per process. Call it before loading project catalogs so those
/// can override bundled entries; [`CatalogFormatter::new`] calls it too.
pub fn install_builtin_catalogs() {
    BUILTIN_CATALOGS.call_once(|| {
        for (language, json) in [
            ("nl", include_str!("../locale/nl.json")),
            ("en", include_str!("../locale/en.json")),
        ] {
            if let Err(e) = catalog::load_from_json(language, json) {
                tracing::warn!(language, error = %e, "failed to load bundled catalog");
            }
        }
    });
}

/// Produces localized text for message descriptors.
///
/// Implementations must be deterministic for a given descriptor,
/// substitutions and locale.
pub trait MessageFormatter: Send + Sync + fmt::Debug {
    /// The locale messages and bound values are rendered for.
    fn locale(&self) -> &Locale;

    /// Renders `descriptor`, substituting `{name}` placeholders.
    fn format_message(&self, descriptor: &MessageDescriptor, values: &[(&str, String)]) -> String;
}

/// A [`MessageFormatter`] backed by the core translation catalog.
///
/// # Examples
///
/// ```
/// use formwork_schema::messages::{CatalogFormatter, MessageFormatter, MIN};
///
/// let nl = CatalogFormatter::new("nl");
/// assert_eq!(
///     nl.format_message(&MIN, &[("min", "€ 10,00".to_string())]),
///     "De waarde moet € 10,00 of groter zijn."
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CatalogFormatter {
    locale: Locale,
}

impl CatalogFormatter {
    /// Creates a formatter for a locale tag.
    pub fn new(tag: &str) -> Self {
        install_builtin_catalogs();
        Self {
            locale: Locale::new(tag),
        }
    }
}

impl MessageFormatter for CatalogFormatter {
    fn locale(&self) -> &Locale {
        &self.locale
    }

    fn format_message(&self, descriptor: &MessageDescriptor, values: &[(&str, String)]) -> String {
        let template = i18n::lookup(self.locale.tag(), descriptor.id)
            .unwrap_or_else(|| descriptor.default_message.to_string());
        i18n::interpolate(&template, values)
    }
}

/// Message resolution for one component: its label, its overrides and the
/// formatter.
#[derive(Clone)]
pub struct FieldMessages {
    label: String,
    overrides: Arc<HashMap<String, String>>,
    formatter: Arc<dyn MessageFormatter>,
}

impl FieldMessages {
    /// Captures the label and overrides of a component.
    pub fn new(base: &ComponentBase, formatter: Arc<dyn MessageFormatter>) -> Self {
        Self {
            label: base.display_name().to_string(),
            overrides: Arc::new(base.errors.clone()),
            formatter,
        }
    }

    /// Resolves the message for a failed constraint.
    ///
    /// A non-empty override for `descriptor.code` is returned verbatim.
    /// Otherwise the formatter renders the descriptor with `values` plus a
    /// `{field}` substitution for the label.
    pub fn resolve(&self, descriptor: &MessageDescriptor, values: &[(&str, String)]) -> String {
        if let Some(message) = self
            .overrides
            .get(descriptor.code)
            .filter(|m| !m.trim().is_empty())
        {
            return message.clone();
        }
        let mut all = Vec::with_capacity(values.len() + 1);
        all.push(("field", self.label.clone()));
        all.extend(values.iter().cloned());
        self.formatter.format_message(descriptor, &all)
    }

    /// The component label used in messages.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The locale of the underlying formatter.
    pub fn locale(&self) -> &Locale {
        self.formatter.locale()
    }
}

impl fmt::Debug for FieldMessages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMessages")
            .field("label", &self.label)
            .field("overrides", &self.overrides.len())
            .field("locale", self.formatter.locale())
            .finish()
    }
}
