//! # formwork-core
//!
//! Core types, settings, logging, and i18n/l10n helpers for formwork.
//! This crate knows nothing about component kinds and provides the foundation
//! for the schema engine and the management CLI.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Engine settings and their validation
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging integration
//! - [`i18n`] - Translation catalogs, locales, and locale-aware formatting/parsing

pub mod error;
pub mod i18n;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FormworkError, FormworkResult};
pub use i18n::locale::Locale;
pub use settings::Settings;
