//! The `validate` management command.
//!
//! Composes the schema of a form definition and validates a submission
//! against it, printing one line per violation.

use std::sync::Arc;

use async_trait::async_trait;
use formwork_core::{FormworkError, Settings};
use formwork_schema::{
    validate_form, CatalogFormatter, NoopRemoteValidator, Registry, ValidationContext,
    ValidationReport,
};

use super::{load_catalogs, load_components, load_submission, required_arg};
use crate::command::ManagementCommand;

/// Validates a submission against a form definition.
///
/// Exits non-zero when the submission has violations. Remote plugins are
/// not reachable from the command line; unless `--no-plugins` is given they
/// are consulted through a validator that accepts every value.
pub struct ValidateCommand;

/// Renders a report as text: one `path: message` line per violation.
pub fn render_report(report: &ValidationReport) -> String {
    report
        .violations()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the validation context from settings and command-line overrides.
pub fn build_context(
    settings: &Settings,
    locale: Option<&str>,
    no_plugins: bool,
) -> ValidationContext {
    let mut ctx = ValidationContext::from_settings(
        settings,
        Registry::builtin(),
        Arc::new(NoopRemoteValidator),
    );
    if let Some(tag) = locale {
        ctx = ctx.with_formatter(Arc::new(CatalogFormatter::new(tag)));
    }
    if no_plugins {
        ctx = ctx.with_validate_plugins(false);
    }
    ctx
}

#[async_trait]
impl ManagementCommand for ValidateCommand {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn help(&self) -> &'static str {
        "Validate a submission against a form definition"
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
            clap::Arg::new("data")
                .long("data")
                .short('d')
                .required(true)
                .value_name("PATH")
                .help("Submission data (JSON)"),
        )
        .arg(
            clap::Arg::new("locale")
                .long("locale")
                .short('l')
                .value_name("TAG")
                .help("Locale for messages (defaults to the configured language)"),
        )
        .arg(
            clap::Arg::new("no-plugins")
                .long("no-plugins")
                .action(clap::ArgAction::SetTrue)
                .help("Do not attach remote-plugin validation"),
        )
        .arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Print the report as JSON"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), FormworkError> {
        let form_path = required_arg(matches, "form")?;
        let components = load_components(form_path)?;
        let data = load_submission(required_arg(matches, "data")?)?;
        load_catalogs(settings)?;

        let ctx = build_context(
            settings,
            matches.get_one::<String>("locale").map(String::as_str),
            matches.get_flag("no-plugins"),
        );
        let report = validate_form(form_path, &components, &data, &ctx).await?;

        if matches.get_flag("json") {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if !report.is_valid() {
            println!("{}", render_report(&report));
        }

        if report.is_valid() {
            tracing::info!("Submission is valid");
            Ok(())
        } else {
            Err(FormworkError::CommandFailed(format!(
                "Submission has {} violation(s)",
                report.len()
            )))
        }
    }
}
