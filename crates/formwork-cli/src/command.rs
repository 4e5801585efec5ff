//! Management command framework for formwork.
//!
//! This module provides the [`ManagementCommand`] trait for defining CLI commands
//! and [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use formwork_cli::command::ManagementCommand;
//! use formwork_core::{FormworkError, Settings};
//!
//! struct KindsCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for KindsCommand {
//!     fn name(&self) -> &str { "kinds" }
//!     fn help(&self) -> &str { "List the registered component kinds" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         _settings: &Settings,
//!     ) -> Result<(), FormworkError> {
//!         for kind in formwork_schema::Registry::builtin().kinds() {
//!             println!("{kind}");
//!         }
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use formwork_core::{FormworkError, Settings};

/// The binary name, used as the clap application name.
pub const BIN_NAME: &str = "formwork";

/// A management command that can be registered and invoked through the CLI.
///
/// Implementations define a name, help text, optional arguments, and an async
/// handler. All commands must be `Send + Sync`.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &str;

    /// Returns a short help description for this command.
    fn help(&self) -> &str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command with the given argument matches and settings.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormworkError>;
}

/// The management commands available to the binary, keyed by name.
///
/// Names are kept sorted, so help output and [`list_commands`](Self::list_commands)
/// are stable.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn ManagementCommand>>,
}

impl CommandRegistry {
    /// Creates a registry with no commands.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command, replacing any command of the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// The command registered under `name`.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Registered command names, sorted.
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Builds the `formwork` clap command with one subcommand per registered
    /// command and the global `--settings <PATH>` option.
    pub fn build_cli(&self) -> clap::Command {
        let app = clap::Command::new(BIN_NAME)
            .about("Validate form submissions against declarative form definitions")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("PATH")
                    .help("Settings file (.toml or .json)"),
            );

        self.commands.iter().fold(app, |app, (name, cmd)| {
            // clap wants &'static str names; commands are registered once per process.
            let static_name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(static_name).about(cmd.help().to_string());
            app.subcommand(cmd.add_arguments(subcmd))
        })
    }

    /// Dispatches the parsed subcommand to its handler.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::ConfigurationError`] when no registered
    /// command matches, otherwise whatever the handler returns.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormworkError> {
        let (name, sub_matches) = matches.subcommand().ok_or_else(|| {
            FormworkError::ConfigurationError("No subcommand specified".to_string())
        })?;

        let cmd = self.get(name).ok_or_else(|| {
            FormworkError::ConfigurationError(format!("Unknown command: {name}"))
        })?;

        tracing::debug!(command = name, "executing command");
        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::register_builtin_commands;
    use std::io::Write;

    const FORM: &str = r#"[
        {"type": "textfield", "key": "name", "validate": {"required": true}},
        {"type": "number", "key": "age", "validate": {"min": 18}}
    ]"#;

    fn json_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    fn builtin() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_builtin_commands(&mut registry);
        registry
    }

    async fn dispatch(registry: &CommandRegistry, argv: &[&str]) -> Result<(), FormworkError> {
        let matches = registry.build_cli().try_get_matches_from(argv).unwrap();
        registry.execute(&matches, &Settings::default()).await
    }

    #[test]
    fn test_builtin_commands_are_listed_sorted() {
        let registry = builtin();
        assert_eq!(registry.list_commands(), vec!["check", "kinds", "validate"]);
        assert_eq!(registry.get("check").map(|c| c.name()), Some("check"));
        assert!(registry.get("migrate").is_none());
    }

    #[test]
    fn test_settings_option_is_global() {
        let matches = builtin()
            .build_cli()
            .try_get_matches_from([
                BIN_NAME, "validate", "--form", "form.json", "--data", "data.json",
                "--settings", "formwork.toml",
            ])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("settings").map(String::as_str),
            Some("formwork.toml")
        );
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "validate");
        assert_eq!(
            sub_matches.get_one::<String>("form").map(String::as_str),
            Some("form.json")
        );
    }

    #[test]
    fn test_arguments_are_checked_per_command() {
        let cli = builtin().build_cli();
        assert!(cli.clone().try_get_matches_from([BIN_NAME]).is_err());
        assert!(cli.clone().try_get_matches_from([BIN_NAME, "validate", "--form", "f.json"]).is_err());
        assert!(cli.clone().try_get_matches_from([BIN_NAME, "check", "--form", "f.json"]).is_ok());
        assert!(cli.try_get_matches_from([BIN_NAME, "check", "--data", "d.json"]).is_err());
    }

    #[tokio::test]
    async fn test_dispatches_validate_and_check() {
        let registry = builtin();
        let form = json_file(FORM);
        let form = form.path().to_str().unwrap();
        let valid = json_file(r#"{"name": "Ada", "age": 36}"#);
        let invalid = json_file(r#"{"age": 12}"#);

        let ok = dispatch(
            &registry,
            &[BIN_NAME, "validate", "--form", form, "--data", valid.path().to_str().unwrap()],
        )
        .await;
        assert!(ok.is_ok());

        let err = dispatch(
            &registry,
            &[BIN_NAME, "validate", "--form", form, "--data", invalid.path().to_str().unwrap()],
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Command failed: Submission has 2 violation(s)");
        assert_eq!(err.exit_code(), 1);

        assert!(dispatch(&registry, &[BIN_NAME, "check", "--form", form]).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_form_file_is_an_io_error() {
        let err = dispatch(&builtin(), &[BIN_NAME, "check", "--form", "/nonexistent/form.json"])
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 74);
    }

    #[tokio::test]
    async fn test_unregistered_command_is_rejected() {
        let registry = builtin();
        let form = json_file(FORM);
        let matches = registry
            .build_cli()
            .try_get_matches_from([BIN_NAME, "check", "--form", form.path().to_str().unwrap()])
            .unwrap();

        let mut only_validate = CommandRegistry::new();
        only_validate.register(Box::new(crate::commands::ValidateCommand));
        let err = only_validate
            .execute(&matches, &Settings::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: Unknown command: check");
        assert_eq!(err.exit_code(), 78);
    }
}
