//! Loading [`Settings`] from a settings file and the environment.
//!
//! A settings file is TOML or JSON, chosen by its extension. Fields it does
//! not name keep their defaults. `FORMWORK_*` environment variables are then
//! applied on top, and the result is checked with [`Settings::validate`].
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMWORK_DEBUG` | `debug` |
//! | `FORMWORK_LOG_LEVEL` | `log_level` |
//! | `FORMWORK_LANGUAGE_CODE` | `language_code` |
//! | `FORMWORK_TIME_ZONE_OFFSET` | `time_zone_offset` |
//! | `FORMWORK_DEFAULT_CURRENCY` | `default_currency` |
//! | `FORMWORK_VALIDATE_PLUGINS` | `validate_plugins` |
//!
//! ```rust,no_run
//! use formwork_core::settings_loader;
//!
//! let settings = settings_loader::load("formwork.toml").unwrap();
//! let settings = settings_loader::from_env().unwrap();
//! ```

use std::path::Path;

use crate::error::{FormworkError, FormworkResult};
use crate::settings::Settings;

/// Prefix of every environment variable that overrides a setting.
pub const ENV_PREFIX: &str = "FORMWORK_";

/// The syntax of a settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl SettingsFormat {
    /// The format implied by a file's extension, if it is supported.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parses settings text in this format. Fields not present keep their
    /// defaults; environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::ConfigurationError`] for malformed text or
    /// a field of the wrong type.
    pub fn parse(self, source: &str) -> FormworkResult<Settings> {
        let document: serde_json::Value = match self {
            Self::Toml => toml::from_str(source)
                .map_err(|e| config_error(format!("Failed to parse TOML settings: {e}")))?,
            Self::Json => serde_json::from_str(source)
                .map_err(|e| config_error(format!("Failed to parse JSON settings: {e}")))?,
        };
        serde_json::from_value(document).map_err(|e| config_error(format!("Invalid settings: {e}")))
    }
}

/// Loads a settings file, applies the environment, and validates the result.
///
/// # Errors
///
/// Returns [`FormworkError::ConfigurationError`] for an unsupported extension,
/// an unreadable or malformed file, an unparseable override, or settings that
/// fail [`Settings::validate`].
pub fn load(path: impl AsRef<Path>) -> FormworkResult<Settings> {
    let path = path.as_ref();
    let format = SettingsFormat::from_path(path).ok_or_else(|| {
        config_error(format!(
            "Unsupported settings file '{}': expected .toml or .json",
            path.display()
        ))
    })?;
    let source = std::fs::read_to_string(path).map_err(|e| {
        config_error(format!("Failed to read settings file '{}': {e}", path.display()))
    })?;
    let mut settings = format.parse(&source)?;
    apply_env_overrides(&mut settings)?;
    settings.validate()?;
    tracing::debug!(path = %path.display(), ?format, "loaded settings");
    Ok(settings)
}

/// Default settings with the environment applied, validated.
///
/// # Errors
///
/// See [`load`].
pub fn from_env() -> FormworkResult<Settings> {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings)?;
    settings.validate()?;
    Ok(settings)
}

/// Applies the `FORMWORK_*` environment variables to `settings`.
///
/// # Errors
///
/// Returns [`FormworkError::ConfigurationError`] when a flag or offset
/// variable cannot be parsed.
pub fn apply_env_overrides(settings: &mut Settings) -> FormworkResult<()> {
    apply_overrides(settings, |name| std::env::var(format!("{ENV_PREFIX}{name}")).ok())
}

/// Applies overrides from `lookup`, which maps an unprefixed variable name
/// such as `LOG_LEVEL` to its value.
fn apply_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) -> FormworkResult<()> {
    if let Some(val) = lookup("DEBUG") {
        settings.debug = parse_flag("DEBUG", &val)?;
    }
    if let Some(val) = lookup("LOG_LEVEL") {
        settings.log_level = val;
    }
    if let Some(val) = lookup("LANGUAGE_CODE") {
        settings.language_code = val;
    }
    if let Some(val) = lookup("TIME_ZONE_OFFSET") {
        settings.time_zone_offset = val.trim().parse().map_err(|_| {
            config_error(format!(
                "{ENV_PREFIX}TIME_ZONE_OFFSET must be whole seconds east of UTC, got '{val}'"
            ))
        })?;
    }
    if let Some(val) = lookup("DEFAULT_CURRENCY") {
        settings.default_currency = val.trim().to_uppercase();
    }
    if let Some(val) = lookup("VALIDATE_PLUGINS") {
        settings.validate_plugins = parse_flag("VALIDATE_PLUGINS", &val)?;
    }
    Ok(())
}

fn parse_flag(name: &str, val: &str) -> FormworkResult<bool> {
    match val.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(config_error(format!(
            "{ENV_PREFIX}{name} must be a boolean, got '{val}'"
        ))),
    }
}

fn config_error(msg: String) -> FormworkError {
    FormworkError::ConfigurationError(msg)
}
