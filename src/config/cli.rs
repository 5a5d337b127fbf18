//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::ConfigError;

/// invoice-ninja: Invoice Ninja API client and webhook receiver
///
/// Calls the Invoice Ninja REST API with client-side rate limiting and
/// retries, and serves a signed webhook endpoint.
#[derive(Debug, Parser)]
#[command(name = "invoice-ninja")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// API token sent as X-API-TOKEN
    #[arg(long, env = "INVOICE_NINJA_API_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long = "base-url", global = true)]
    pub base_url: Option<String>,

    /// Client-side rate limit in requests per second
    #[arg(long = "rate-limit", global = true)]
    pub rate_limit: Option<u32>,

    /// Maximum number of retries after the first attempt
    #[arg(long = "max-retries", global = true)]
    pub max_retries: Option<u32>,

    /// Shared secret for webhook signatures (empty disables verification)
    #[arg(
        long = "webhook-secret",
        env = "INVOICE_NINJA_WEBHOOK_SECRET",
        hide_env_values = true,
        global = true
    )]
    pub webhook_secret: Option<String>,

    /// Webhook listen address
    #[arg(long, global = true)]
    pub listen: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for invoice-ninja
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "invoice-ninja.toml")]
        output: PathBuf,
    },

    /// Serve the webhook endpoint
    Serve,

    /// GET an API path and print the JSON response
    Get {
        /// API path, e.g. /api/v1/invoices
        path: String,

        /// Query parameter in 'key=value' format (can be specified multiple times)
        #[arg(long = "query", short, value_name = "K=V")]
        query: Vec<String>,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Command::Init { .. })
    }
}

/// Splits `key=value` query arguments into pairs.
///
/// The value may itself contain `=`; the key may not be empty.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidQuery`] for an argument without `=` or with
/// an empty key.
pub fn parse_query_pairs(raw: &[String]) -> Result<Vec<(String, String)>, ConfigError> {
    raw.iter()
        .map(|arg| match arg.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(ConfigError::InvalidQuery { value: arg.clone() }),
        })
        .collect()
}
