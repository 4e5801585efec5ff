//! Core error types for formwork.
//!
//! [`FormworkError`] signals configuration and programming errors: a form
//! definition the engine cannot reconcile, an unregistered component kind,
//! unreadable settings. Ordinary invalid submission data never produces a
//! `FormworkError`; it is reported as violations by the schema crate.

use thiserror::Error;

/// The primary error type for formwork.
///
/// Each variant maps to a process exit code via [`FormworkError::exit_code`],
/// which the management CLI uses when a command fails.
#[derive(Error, Debug)]
pub enum FormworkError {
    // ── Form definition errors ───────────────────────────────────────

    /// A component kind that is expected to carry a schema builder is not
    /// present in the registry.
    #[error("No schema builder registered for component type '{0}'")]
    UnregisteredKind(String),

    /// A component definition is structurally unusable.
    #[error("Invalid component definition '{key}': {reason}")]
    InvalidDefinition {
        /// The key of the offending component.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// An enumerated component without options was asked to validate a value.
    #[error("Component '{0}' has no options to validate against")]
    MissingOptions(String),

    /// A declared pattern does not compile.
    #[error("Invalid pattern for component '{key}': {source}")]
    InvalidPattern {
        /// The key of the offending component.
        key: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── Commands ─────────────────────────────────────────────────────

    /// A management command ran to completion but reported failure, e.g. a
    /// submission with violations.
    #[error("Command failed: {0}")]
    CommandFailed(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FormworkError {
    /// Returns the process exit code associated with this error.
    ///
    /// - definition errors -> 65 (`EX_DATAERR`)
    /// - `ConfigurationError` -> 78 (`EX_CONFIG`)
    /// - `SerializationError` -> 65
    /// - `IoError` -> 74 (`EX_IOERR`)
    /// - `CommandFailed` -> 1
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::UnregisteredKind(_)
            | Self::InvalidDefinition { .. }
            | Self::MissingOptions(_)
            | Self::InvalidPattern { .. }
            | Self::SerializationError(_) => 65,
            Self::ConfigurationError(_) => 78,
            Self::IoError(_) => 74,
            Self::CommandFailed(_) => 1,
        }
    }

    /// Shorthand for an [`InvalidDefinition`](Self::InvalidDefinition) error.
    pub fn invalid_definition(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for FormworkError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, FormworkError>`.
pub type FormworkResult<T> = Result<T, FormworkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(FormworkError::UnregisteredKind("map".into()).exit_code(), 65);
        assert_eq!(FormworkError::MissingOptions("x".into()).exit_code(), 65);
        assert_eq!(
            FormworkError::invalid_definition("x", "no key").exit_code(),
            65
        );
        assert_eq!(
            FormworkError::ConfigurationError("x".into()).exit_code(),
            78
        );
        assert_eq!(
            FormworkError::SerializationError("x".into()).exit_code(),
            65
        );
        assert_eq!(FormworkError::CommandFailed("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_display() {
        let err = FormworkError::UnregisteredKind("map".into());
        assert_eq!(
            err.to_string(),
            "No schema builder registered for component type 'map'"
        );
        let err = FormworkError::invalid_definition("email", "missing key");
        assert_eq!(
            err.to_string(),
            "Invalid component definition 'email': missing key"
        );
    }

    #[test]
    fn test_invalid_pattern_keeps_source() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = FormworkError::InvalidPattern {
            key: "code".into(),
            source,
        };
        assert!(err.to_string().starts_with("Invalid pattern for component 'code'"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: FormworkError = io_err.into();
        assert_eq!(err.exit_code(), 74);
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_serde_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let err: FormworkError = json_err.into();
        assert!(matches!(err, FormworkError::SerializationError(_)));
    }
}
