//! Configuration layer for the invoice-ninja binary.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values passed on the command line or through
//!    `INVOICE_NINJA_API_TOKEN` / `INVOICE_NINJA_WEBHOOK_SECRET`
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The API token has no default. It is only required by `get`, which asks
//! for it through [`ValidatedConfig::api_token`].
//!
//! # CLI-Only vs TOML-Only Options
//!
//! Some options are TOML-only (not available via CLI):
//! - `api.timeout` (default: 30s)
//! - `retry.initial_backoff_ms`, `retry.max_backoff_ms`, `retry.multiplier`,
//!   `retry.status_codes`, `retry.jitter`
//! - `webhook.path` (default: `/webhook`)
//!
//! # Webhook Secret
//!
//! An empty secret disables signature verification. An explicit empty
//! `--webhook-secret` therefore turns verification off even when the config
//! file sets one.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, parse_query_pairs};
pub use error::{ConfigError, field};
pub use toml::{
    ApiSection, RateLimitSection, RetrySection, TomlConfig, WebhookSection,
    default_config_template,
};
pub use validated::{ValidatedConfig, write_default_config};
