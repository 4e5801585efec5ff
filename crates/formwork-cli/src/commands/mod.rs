//! Built-in management commands.
//!
//! Each command implements the
//! [`ManagementCommand`](crate::command::ManagementCommand) trait. The helpers
//! here load the inputs the commands share: form definitions, submissions
//! and translation catalogs.

pub mod check;
pub mod kinds;
pub mod validate;

use std::path::Path;

pub use check::CheckCommand;
pub use kinds::KindsCommand;
pub use validate::ValidateCommand;

use formwork_core::i18n::catalog;
use formwork_core::{FormworkError, FormworkResult, Settings};
use formwork_schema::messages::install_builtin_catalogs;
use formwork_schema::{parse_components, ComponentDefinition, Value};

use crate::command::CommandRegistry;

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(ValidateCommand));
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(KindsCommand));
}

/// Reads and parses a form definition file.
pub fn load_components(path: impl AsRef<Path>) -> FormworkResult<Vec<ComponentDefinition>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let components = parse_components(&json)?;
    tracing::debug!(
        path = %path.display(),
        components = components.len(),
        "loaded form definition"
    );
    Ok(components)
}

/// Reads a JSON submission file.
pub fn load_submission(path: impl AsRef<Path>) -> FormworkResult<Value> {
    let json = std::fs::read_to_string(path)?;
    let data: serde_json::Value = serde_json::from_str(&json)
        .map_err(|e| FormworkError::SerializationError(format!("Invalid submission: {e}")))?;
    Ok(Value::from(data))
}

/// Installs the bundled catalogs, then the project catalogs named in
/// `settings.locale_paths`, so project entries take precedence.
pub fn load_catalogs(settings: &Settings) -> FormworkResult<()> {
    install_builtin_catalogs();
    for (language, path) in &settings.locale_paths {
        let count = catalog::load_from_file(language, path)?;
        tracing::debug!(language, path = %path.display(), count, "loaded project catalog");
    }
    Ok(())
}

/// Returns the value of a required string argument.
pub(crate) fn required_arg<'a>(
    matches: &'a clap::ArgMatches,
    name: &str,
) -> FormworkResult<&'a str> {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .ok_or_else(|| FormworkError::ConfigurationError(format!("Missing --{name}")))
}
