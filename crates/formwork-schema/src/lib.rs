//! # formwork-schema
//!
//! Turns declarative form definitions into runtime validators.
//!
//! A form is a tree of [`ComponentDefinition`]s. Each value-carrying kind
//! registers a [`ComponentBehavior`] in a [`Registry`]; [`compose`] asks the
//! behavior of every component for its contribution and merges them into one
//! [`Schema`]. Validating a submission against the schema yields a
//! [`ValidationReport`] of localized, path-addressed violations.
//!
//! ```
//! use formwork_schema::{compose, parse_components, ValidationContext, Value};
//!
//! # tokio_test::block_on(async {
//! let components = parse_components(
//!     r#"[{"type": "email", "key": "email", "validate": {"required": true}}]"#,
//! )
//! .unwrap();
//! let ctx = ValidationContext::for_locale("en");
//! let schema = compose(&components, &ctx).unwrap();
//!
//! let report = schema
//!     .validate(&Value::from(serde_json::json!({"email": "jimmy"})))
//!     .await
//!     .unwrap();
//! assert_eq!(report.messages_at("email"), vec!["Invalid email address."]);
//! # });
//! ```
//!
//! ## Modules
//!
//! - [`definition`] - Component definitions and kind tags
//! - [`value`] - The submission value tree
//! - [`validator`] - Validator nodes, checks and refinements
//! - [`constraints`] - Reusable synchronous checks
//! - [`refinements`] - Asynchronous refinements
//! - [`messages`] - Message descriptors and localized formatting
//! - [`context`] - The validation context and remote validators
//! - [`registry`] - Kind to behavior registry
//! - [`kinds`] - Built-in component kinds
//! - [`schema`] - Composed key to validator maps
//! - [`compose`] - Composition and form-level helpers
//! - [`report`] - Violations and reports
//! - [`checks`] - Static checks of form definitions

pub mod checks;
pub mod compose;
pub mod constraints;
pub mod context;
pub mod definition;
pub mod kinds;
pub mod messages;
pub mod refinements;
pub mod registry;
pub mod report;
pub mod schema;
pub mod validator;
pub mod value;

pub use checks::{check_components, CheckLevel, CheckMessage};
pub use compose::{compose, empty_keys, initial_values, validate_form};
pub use context::{NoopRemoteValidator, RemoteValidator, ValidationContext};
pub use definition::{parse_components, ComponentBase, ComponentDefinition, ComponentKind};
pub use messages::{CatalogFormatter, FieldMessages, MessageDescriptor, MessageFormatter};
pub use registry::{ComponentBehavior, Registry};
pub use report::{FieldPath, ValidationReport, Violation, ViolationKind};
pub use schema::Schema;
pub use validator::Validator;
pub use value::Value;
