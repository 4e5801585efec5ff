//! Message-template catalogs, one per language.
//!
//! A catalog maps a message id such as `validation.required` to a template
//! with `{placeholder}` slots. Catalogs live in one process-wide table that is
//! filled at startup (bundled catalogs first, then project catalogs) and only
//! read while validating. Later entries replace earlier ones, which is how a
//! project overrides a bundled message.
//!
//! ## JSON Format
//!
//! ```json
//! {
//!   "messages": {
//!     "validation.required": "Het verplichte veld {field} is niet ingevuld.",
//!     "validation.min": "De waarde moet {min} of groter zijn."
//!   }
//! }
//! ```
//!
//! Every template must be a string; a catalog with any other value is
//! rejected as a whole.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{OnceLock, RwLock};

use serde::Deserialize;

use crate::error::{FormworkError, FormworkResult};

type Templates = HashMap<String, String>;

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    messages: HashMap<String, serde_json::Value>,
}

fn catalogs() -> &'static RwLock<HashMap<String, Templates>> {
    static CATALOGS: OnceLock<RwLock<HashMap<String, Templates>>> = OnceLock::new();
    CATALOGS.get_or_init(|| RwLock::new(HashMap::new()))
}

fn extend(language: &str, templates: impl IntoIterator<Item = (String, String)>) -> usize {
    let mut catalogs = catalogs().write().expect("catalog lock poisoned");
    let catalog = catalogs.entry(language.to_string()).or_default();
    let before = catalog.len();
    let mut written = 0;
    for (msgid, template) in templates {
        catalog.insert(msgid, template);
        written += 1;
    }
    tracing::trace!(language, written, added = catalog.len() - before, "extended catalog");
    written
}

/// Adds `(msgid, template)` pairs to a language's catalog, replacing
/// templates already registered under the same id.
///
/// # Examples
///
/// ```
/// use formwork_core::i18n::catalog;
///
/// catalog::register_translations("fr", vec![
///     ("validation.required", "Le champ {field} est obligatoire."),
/// ]);
/// assert!(catalog::translate("fr", "validation.required").is_some());
/// ```
pub fn register_translations<'a>(
    language: &str,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) {
    extend(
        language,
        entries
            .into_iter()
            .map(|(msgid, template)| (msgid.to_string(), template.to_string())),
    );
}

/// Adds the templates of a JSON catalog to a language's catalog and returns
/// how many were read. A document without `"messages"` adds nothing.
///
/// # Errors
///
/// Returns [`FormworkError::SerializationError`] for malformed JSON or a
/// template that is not a string; nothing is added in that case.
pub fn load_from_json(language: &str, json: &str) -> FormworkResult<usize> {
    let file: CatalogFile = serde_json::from_str(json)
        .map_err(|e| FormworkError::SerializationError(format!("Invalid catalog JSON: {e}")))?;

    let mut templates = Vec::with_capacity(file.messages.len());
    for (msgid, template) in file.messages {
        match template {
            serde_json::Value::String(template) => templates.push((msgid, template)),
            other => {
                return Err(FormworkError::SerializationError(format!(
                    "Catalog entry '{msgid}' must be a string, got {other}"
                )))
            }
        }
    }

    let loaded = extend(language, templates);
    tracing::debug!(language, loaded, "loaded translation catalog");
    Ok(loaded)
}

/// Reads a JSON catalog file into a language's catalog.
///
/// # Errors
///
/// Returns [`FormworkError::ConfigurationError`] when the file cannot be
/// read, and the errors of [`load_from_json`] for its contents.
pub fn load_from_file(language: &str, path: impl AsRef<Path>) -> FormworkResult<usize> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|e| {
        FormworkError::ConfigurationError(format!(
            "Failed to read catalog '{}': {e}",
            path.display()
        ))
    })?;
    load_from_json(language, &json)
}

/// The template registered for `msgid` in exactly this language.
pub fn translate(language: &str, msgid: &str) -> Option<String> {
    let catalogs = catalogs().read().expect("catalog lock poisoned");
    catalogs.get(language)?.get(msgid).cloned()
}
