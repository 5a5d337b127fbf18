//! invoice-ninja: Invoice Ninja API client and webhook receiver
//!
//! Entry point for the invoice-ninja application.

use invoice_ninja::config::{
    Cli, Command, ConfigError, ValidatedConfig, parse_query_pairs, write_default_config,
};
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Command::Init { output } = &cli.command {
        return handle_init(output);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => return config_error(&e),
    };

    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    match &cli.command {
        Command::Get { path, query } => {
            let token = match config.api_token() {
                Ok(token) => token.to_string(),
                Err(e) => return config_error(&e),
            };
            let query = match parse_query_pairs(query) {
                Ok(query) => query,
                Err(e) => return config_error(&e),
            };
            let request = run::get_request(path, query);

            run_application(async move {
                let json = run::get(&config, &token, &request).await?;
                println!("{json}");
                Ok(())
            })
        }
        Command::Serve | Command::Init { .. } => run_application(run::serve(config)),
    }
}

fn config_error(error: &ConfigError) -> ExitCode {
    eprintln!("Configuration error: {error}");
    print_config_hint(error);
    exit_code::CONFIG_ERROR
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Runs a command future on a fresh runtime.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(
    command: impl std::future::Future<Output = Result<(), run::RunError>>,
) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(command) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}
