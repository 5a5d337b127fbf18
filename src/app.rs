//! Process-level glue for the binary: exit statuses, operator hints and
//! log output.

use invoice_ninja::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Exit statuses reported by `invoice-ninja`.
pub mod exit_code {
    use std::process::ExitCode;

    /// The command finished normally.
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Status 1: the arguments, environment or config file were unusable.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Status 2: the configuration was fine but serving or calling the API failed.
    // `ExitCode::from` is not const.
    pub fn runtime_error() -> ExitCode {
        ExitCode::from(2)
    }
}

/// Tells the operator how to recover from the config errors they hit most.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { field: f, .. } if *f == field::TOKEN => {
            eprintln!("\nCreate an API token under Settings > Account Management > API Tokens.");
        }
        ConfigError::FileRead { .. } | ConfigError::TomlParse(_) => {
            eprintln!("\nRun 'invoice-ninja init' to generate a configuration template.");
        }
        ConfigError::InvalidWebhookPath { .. } => {
            eprintln!("\nUse a literal route such as '/webhook' or '/hooks/invoice-ninja'.");
        }
        _ => {}
    }
}

/// Installs the global log subscriber.
///
/// Logs go to stderr so `get` output on stdout stays pipeable. `RUST_LOG`
/// wins over `verbose` when set.
pub fn setup_tracing(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
