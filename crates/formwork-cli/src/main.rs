//! The `formwork` command-line entry point.

use std::process::ExitCode;

use formwork_cli::command::CommandRegistry;
use formwork_cli::commands::register_builtin_commands;
use formwork_cli::load_settings;
use formwork_core::logging::setup_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings = match load_settings(matches.get_one::<String>("settings").map(String::as_str)) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{e}");
            return exit_code(e.exit_code());
        }
    };
    setup_logging(&settings);

    match registry.execute(&matches, &settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            exit_code(e.exit_code())
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
