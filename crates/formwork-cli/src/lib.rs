//! # formwork-cli
//!
//! Management commands for formwork.
//!
//! This crate provides:
//!
//! - **Management commands** - A framework for defining and registering CLI commands
//! - **Built-in commands** - `validate` checks a submission against a form
//!   definition, `check` reports problems in a definition, `kinds` lists the
//!   composable component kinds
//! - **Settings discovery** - Loading [`Settings`] from the `--settings` file
//!   with `FORMWORK_*` environment overrides
//!
//! ## Quick Start
//!
//! ```rust
//! use formwork_cli::command::CommandRegistry;
//! use formwork_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"validate"));
//! assert!(names.contains(&"check"));
//! ```

// These clippy lints are intentionally allowed:
// - result_large_err: FormworkError is the crate-wide error type
// - doc_markdown: backtick requirements for documentation items are too strict
// - module_name_repetitions: re-exports make module-prefixed names redundant
// - unused_async: command handlers maintain consistent async signatures
#![allow(clippy::result_large_err)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unused_async)]

pub mod command;
pub mod commands;

use formwork_core::settings_loader;
use formwork_core::{FormworkError, Settings};

/// Loads settings from an optional settings file.
///
/// `.toml` and `.json` files are parsed by extension; environment overrides
/// are applied on top and the result is validated. Without a file, settings
/// come from defaults plus the environment.
///
/// # Errors
///
/// Returns [`FormworkError::ConfigurationError`] for an unreadable or
/// unparseable file, an unsupported extension, or invalid settings.
pub fn load_settings(path: Option<&str>) -> Result<Settings, FormworkError> {
    match path {
        Some(path) => settings_loader::load(path),
        None => settings_loader::from_env(),
    }
}
