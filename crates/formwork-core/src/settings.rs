//! Engine settings.
//!
//! [`Settings`] carries what the schema engine and the CLI need from their
//! environment: the message language, the offset used for date-times without
//! one, the fallback currency, the remote-plugin policy and logging. Settings
//! are passed explicitly; there is no global instance.
//!
//! Every field has a default, so a settings file only names what it changes.
//! Keys formwork does not know are kept in [`Settings::extra`].

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{FormworkError, FormworkResult};

/// Offsets must lie strictly within one day of UTC.
const MAX_OFFSET_SECONDS: i32 = 86_400;

/// The complete set of formwork settings.
///
/// # Examples
///
/// ```
/// use formwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert_eq!(settings.language_code, "nl");
/// assert!(settings.validate_plugins);
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Pretty, human-readable logs instead of JSON lines.
    pub debug: bool,

    /// Locale tag messages are rendered in (e.g. "nl", "en", "en-GB").
    pub language_code: String,
    /// Languages offered to end users, as `(code, display name)` pairs.
    pub languages: Vec<(String, String)>,
    /// Seconds east of UTC assumed for date-times submitted without an offset.
    pub time_zone_offset: i32,
    /// ISO 4217 code for currency components that do not declare one.
    pub default_currency: String,
    /// Project translation catalogs (JSON files), keyed by language code.
    pub locale_paths: HashMap<String, PathBuf>,

    /// Whether remote-plugin validation is attached to built schemas.
    pub validate_plugins: bool,

    /// `tracing` filter directive, e.g. "info" or "formwork_schema=debug".
    pub log_level: String,

    /// Keys not listed above, as found in the settings file.
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            language_code: "nl".to_string(),
            languages: vec![
                ("nl".to_string(), "Nederlands".to_string()),
                ("en".to_string(), "English".to_string()),
            ],
            time_zone_offset: 0,
            default_currency: "EUR".to_string(),
            locale_paths: HashMap::new(),
            validate_plugins: true,
            log_level: "info".to_string(),
            extra: HashMap::new(),
        }
    }
}

impl Settings {
    /// Checks that the settings can drive a validation pass.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::ConfigurationError`] naming the first
    /// offending setting: a blank `language_code`, a `default_currency` that
    /// is not three ASCII letters, a `time_zone_offset` of a day or more, an
    /// unparseable `log_level`, or a blank `locale_paths` language.
    pub fn validate(&self) -> FormworkResult<()> {
        if self.language_code.trim().is_empty() {
            return Err(invalid("language_code", "must not be blank"));
        }
        if self.default_currency.len() != 3
            || !self.default_currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid(
                "default_currency",
                &format!("'{}' is not an ISO 4217 code", self.default_currency),
            ));
        }
        if self.time_zone_offset.abs() >= MAX_OFFSET_SECONDS {
            return Err(invalid(
                "time_zone_offset",
                &format!("{} seconds is not within one day of UTC", self.time_zone_offset),
            ));
        }
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.log_level) {
            return Err(invalid("log_level", &e.to_string()));
        }
        if self.locale_paths.keys().any(|language| language.trim().is_empty()) {
            return Err(invalid("locale_paths", "language codes must not be blank"));
        }
        Ok(())
    }
}

fn invalid(setting: &str, reason: &str) -> FormworkError {
    FormworkError::ConfigurationError(format!("Invalid setting {setting}: {reason}"))
}
