//! # formwork
//!
//! Composes validation schemas from declarative form definitions and
//! validates submissions against them, with messages in the submitter's
//! language.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `formwork` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use formwork::schema::{parse_components, validate_form, ValidationContext, Value};
//!
//! let components = parse_components(
//!     r#"[{"type": "email", "key": "email", "validate": {"required": true}}]"#,
//! )
//! .unwrap();
//! let ctx = ValidationContext::for_locale("en");
//! let report = tokio_test::block_on(validate_form(
//!     "contact",
//!     &components,
//!     &Value::from(serde_json::json!({})),
//!     &ctx,
//! ))
//! .unwrap();
//! assert_eq!(report.len(), 1);
//! assert_eq!(report.violations()[0].path.to_string(), "email");
//! ```

/// Settings, locales, catalogs, logging and error types.
pub use formwork_core as core;

/// Component definitions, schema composition and validation.
pub use formwork_schema as schema;

/// Management commands (CLI).
#[cfg(feature = "cli")]
pub use formwork_cli as cli;

pub use formwork_core::{FormworkError, FormworkResult, Settings};
pub use formwork_schema::{validate_form, ValidationContext, ValidationReport};

// Third-party re-exports
pub use async_trait;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
