//! The `kinds` management command.

use async_trait::async_trait;
use formwork_core::{FormworkError, Settings};
use formwork_schema::{ComponentKind, Registry};

use crate::command::ManagementCommand;

/// Lists the component kinds the built-in registry can compose, one per line.
pub struct KindsCommand;

/// The built-in kind names, in registration order.
pub fn builtin_kind_names() -> Vec<&'static str> {
    Registry::builtin()
        .kinds()
        .into_iter()
        .map(ComponentKind::as_str)
        .collect()
}

#[async_trait]
impl ManagementCommand for KindsCommand {
    fn name(&self) -> &'static str {
        "kinds"
    }

    fn help(&self) -> &'static str {
        "List the registered component kinds"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        _settings: &Settings,
    ) -> Result<(), FormworkError> {
        for name in builtin_kind_names() {
            println!("{name}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandRegistry, BIN_NAME};

    #[test]
    fn test_builtin_kind_names() {
        let names = builtin_kind_names();
        for expected in ["textfield", "currency", "editgrid", "addressNL", "signature"] {
            assert!(names.contains(&expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn test_kinds_command_runs() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(KindsCommand));
        let matches = registry.build_cli().try_get_matches_from([BIN_NAME, "kinds"]).unwrap();
        assert!(registry.execute(&matches, &Settings::default()).await.is_ok());
    }
}
