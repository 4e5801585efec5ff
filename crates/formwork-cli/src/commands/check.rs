//! The `check` management command.
//!
//! Runs the static definition checks over a form definition file and
//! reports every finding with its severity.

use async_trait::async_trait;
use formwork_core::{FormworkError, Settings};
use formwork_schema::{check_components, CheckLevel, CheckMessage, Registry};

use super::{load_components, required_arg};
use crate::command::ManagementCommand;

/// Checks a form definition for problems.
///
/// Fails when at least one finding is an error or worse; warnings are
/// reported but do not fail the command.
pub struct CheckCommand;

/// Summarizes check findings, returning the number of errors.
pub fn report_checks(messages: &[CheckMessage]) -> usize {
    let errors = messages.iter().filter(|m| m.level >= CheckLevel::Error).count();
    let warnings = messages.iter().filter(|m| m.level == CheckLevel::Warning).count();

    for msg in messages {
        if msg.level >= CheckLevel::Error {
            tracing::error!("{msg}");
        } else {
            tracing::warn!("{msg}");
        }
    }

    tracing::info!(
        "Definition check identified {} issue(s) ({} error(s), {} warning(s))",
        messages.len(),
        errors,
        warnings
    );
    errors
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check a form definition for problems"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("form")
                .long("form")
                .short('f')
                .required(true)
                .value_name("PATH")
                .help("Form definition (JSON)"),
        )
        .arg(
            clap::Arg::new("fail-level")
                .long("fail-level")
                .value_parser(["warning", "error"])
                .default_value("error")
                .help("Lowest severity that fails the command"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), FormworkError> {
        let components = load_components(required_arg(matches, "form")?)?;
        let messages = check_components(&components, &Registry::builtin());

        if messages.is_empty() {
            tracing::info!("Definition check identified no issues");
            return Ok(());
        }

        let errors = report_checks(&messages);
        let fail_level = match required_arg(matches, "fail-level")? {
            "warning" => CheckLevel::Warning,
            _ => CheckLevel::Error,
        };
        let failing = messages.iter().filter(|m| m.level >= fail_level).count();
        if failing > 0 {
            return Err(FormworkError::CommandFailed(format!(
                "Definition check found {failing} issue(s) at or above {fail_level} ({errors} error(s))"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandRegistry, BIN_NAME};
    use std::io::Write;

    fn form_file(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    async fn run(args: &[&str]) -> Result<(), FormworkError> {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(CheckCommand));
        let mut argv = vec![BIN_NAME, "check"];
        argv.extend_from_slice(args);
        let matches = registry.build_cli().try_get_matches_from(argv).unwrap();
        registry.execute(&matches, &Settings::default()).await
    }

    #[tokio::test]
    async fn test_clean_definition_passes() {
        let form = form_file(r#"[{"type": "textfield", "key": "name"}]"#);
        assert!(run(&["--form", form.path().to_str().unwrap()]).await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_keys_fail() {
        let form = form_file(
            r#"[{"type": "textfield", "key": "name"}, {"type": "email", "key": "name"}]"#,
        );
        let err = run(&["--form", form.path().to_str().unwrap()]).await.unwrap_err();
        assert!(matches!(err, FormworkError::CommandFailed(_)));
    }

    #[tokio::test]
    async fn test_warnings_fail_only_when_asked() {
        let form = form_file(r#"[{"type": "radio", "key": "r", "values": []}]"#);
        let path = form.path().to_str().unwrap();
        assert!(run(&["--form", path]).await.is_ok());
        assert!(run(&["--form", path, "--fail-level", "warning"]).await.is_err());
    }

    #[test]
    fn test_report_counts_errors() {
        let messages = vec![
            CheckMessage {
                level: CheckLevel::Warning,
                msg: "w".to_string(),
                hint: None,
                id: "components.W001".to_string(),
            },
            CheckMessage {
                level: CheckLevel::Critical,
                msg: "c".to_string(),
                hint: None,
                id: "components.E002".to_string(),
            },
        ];
        assert_eq!(report_checks(&messages), 1);
    }
}
