//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// API connection section
    #[serde(default)]
    pub api: ApiSection,

    /// Client-side rate limit section
    #[serde(default)]
    pub rate_limit: RateLimitSection,

    /// Retry policy configuration
    #[serde(default)]
    pub retry: RetrySection,

    /// Webhook receiver section
    #[serde(default)]
    pub webhook: WebhookSection,
}

/// API connection section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
    /// API token
    pub token: Option<String>,

    /// API base URL
    pub base_url: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

/// Client-side rate limit section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitSection {
    /// Requests admitted per rolling second
    pub requests_per_second: Option<u32>,
}

/// Retry policy configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetrySection {
    /// Maximum number of retries after the first attempt
    pub max_retries: Option<u32>,

    /// Initial backoff in milliseconds
    pub initial_backoff_ms: Option<u64>,

    /// Maximum backoff in milliseconds
    pub max_backoff_ms: Option<u64>,

    /// Backoff multiplier
    pub multiplier: Option<f64>,

    /// HTTP status codes that are retried
    pub status_codes: Option<Vec<u16>>,

    /// Random extra delay of up to 30% of the backoff
    pub jitter: Option<bool>,
}

/// Webhook receiver section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookSection {
    /// Socket address to listen on
    pub listen: Option<String>,

    /// Route the dispatcher is mounted at
    pub path: Option<String>,

    /// Shared signing secret
    pub secret: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# invoice-ninja configuration file

[api]
# API token (required for `get`; prefer INVOICE_NINJA_API_TOKEN)
# token = "your-api-token"

# API base URL (default: https://invoicing.co)
# base_url = "https://invoicing.co"

# Request timeout in seconds (default: 30)
# timeout = 30

[rate_limit]
# Requests admitted per rolling second (default: 10)
requests_per_second = 10

[retry]
# Retries after the first attempt (default: 3, 0 disables retrying)
# max_retries = 3

# Initial backoff in milliseconds (default: 1000)
# initial_backoff_ms = 1000

# Maximum backoff in milliseconds (default: 30000)
# max_backoff_ms = 30000

# Backoff multiplier, must be greater than 1 (default: 2.0)
# multiplier = 2.0

# Status codes that are retried (default: [429, 500, 502, 503, 504])
# status_codes = [429, 500, 502, 503, 504]

# Add up to 30% random extra delay (default: true)
# jitter = true

[webhook]
# Listen address for `serve` (default: 127.0.0.1:8080)
# listen = "127.0.0.1:8080"

# Route the webhook is served at (default: /webhook)
# path = "/webhook"

# Shared signing secret; empty disables verification
# (prefer INVOICE_NINJA_WEBHOOK_SECRET)
# secret = "your-webhook-secret"
"#
    .to_string()
}
