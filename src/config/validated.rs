//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::api::{ClientOptions, RetryConfig};
use crate::webhook::WebhookSecret;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// The API token stays optional here because only `get` needs it; use
/// [`ValidatedConfig::api_token`] to require it.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
pub struct ValidatedConfig {
    /// API token, if one was given
    pub token: Option<String>,

    /// API base URL
    pub base_url: Url,

    /// Timeout for one HTTP exchange
    pub timeout: Duration,

    /// Client-side rate limit
    pub requests_per_second: u32,

    /// Retry behavior for outbound requests
    pub retry: RetryConfig,

    /// Webhook listen address
    pub listen: SocketAddr,

    /// Route the webhook dispatcher is mounted at
    pub webhook_path: String,

    /// Webhook signing secret; `None` disables verification
    pub webhook_secret: Option<WebhookSecret>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("requests_per_second", &self.requests_per_second)
            .field("retry", &self.retry)
            .field("listen", &self.listen)
            .field("webhook_path", &self.webhook_path)
            .field("webhook_secret", &self.webhook_secret)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ base_url: {}, token: {}, timeout: {}s, rate_limit: {}/s, \
             retry: {}x/{}ms..{}ms, listen: {}, path: {}, signatures: {} }}",
            self.base_url,
            if self.token.is_some() { "set" } else { "unset" },
            self.timeout.as_secs(),
            self.requests_per_second,
            self.retry.max_retries,
            self.retry.initial_backoff.as_millis(),
            self.retry.max_backoff.as_millis(),
            self.listen,
            self.webhook_path,
            if self.webhook_secret.is_some() { "verified" } else { "unverified" },
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values, which take
    /// precedence over built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The base URL is invalid or not http(s)
    /// - The timeout is zero
    /// - The rate limit is zero
    /// - The retry settings are inconsistent
    /// - The listen address or webhook path is invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let token = Self::resolve_token(cli, toml);
        let base_url = Self::resolve_base_url(cli, toml)?;
        let timeout = Self::resolve_timeout(toml)?;
        let requests_per_second = Self::resolve_rate_limit(cli, toml)?;
        let retry = Self::build_retry_config(cli, toml)?;
        let listen = Self::resolve_listen(cli, toml)?;
        let webhook_path = Self::resolve_webhook_path(toml)?;
        let webhook_secret = Self::resolve_webhook_secret(cli, toml);

        Ok(Self {
            token,
            base_url,
            timeout,
            requests_per_second,
            retry,
            listen,
            webhook_path,
            webhook_secret,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns the API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequired`] if no token was configured.
    pub fn api_token(&self) -> Result<&str, ConfigError> {
        self.token.as_deref().ok_or_else(|| {
            ConfigError::missing(
                field::TOKEN,
                "Use --token, set INVOICE_NINJA_API_TOKEN, or set api.token in config file",
            )
        })
    }

    /// Returns the options for building the API client.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.as_str().to_string(),
            timeout: self.timeout,
            requests_per_second: self.requests_per_second,
            retry: self.retry.clone(),
        }
    }

    fn resolve_token(cli: &Cli, toml: Option<&TomlConfig>) -> Option<String> {
        cli.token
            .as_deref()
            .or_else(|| toml.and_then(|t| t.api.token.as_deref()))
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    fn resolve_base_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let url_str = cli
            .base_url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.api.base_url.as_deref()))
            .unwrap_or(defaults::BASE_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: "scheme must be http or https".to_string(),
            });
        }

        Ok(url)
    }

    fn resolve_timeout(toml: Option<&TomlConfig>) -> Result<Duration, ConfigError> {
        let seconds = toml
            .and_then(|t| t.api.timeout)
            .unwrap_or(defaults::TIMEOUT_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "timeout",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_rate_limit(cli: &Cli, toml: Option<&TomlConfig>) -> Result<u32, ConfigError> {
        let requests_per_second = cli
            .rate_limit
            .or_else(|| toml.and_then(|t| t.rate_limit.requests_per_second))
            .unwrap_or(defaults::REQUESTS_PER_SECOND);

        if requests_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit(
                "requests_per_second must be greater than 0".to_string(),
            ));
        }

        Ok(requests_per_second)
    }

    fn build_retry_config(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<RetryConfig, ConfigError> {
        let retry = toml.map(|t| &t.retry);

        // Only max_retries has a CLI flag; the rest are TOML > default
        let max_retries = cli
            .max_retries
            .or_else(|| retry.and_then(|r| r.max_retries))
            .unwrap_or(defaults::RETRY_MAX_RETRIES);

        let initial_backoff_ms = retry
            .and_then(|r| r.initial_backoff_ms)
            .unwrap_or(defaults::RETRY_INITIAL_BACKOFF_MS);

        let max_backoff_ms = retry
            .and_then(|r| r.max_backoff_ms)
            .unwrap_or(defaults::RETRY_MAX_BACKOFF_MS);

        let multiplier = retry
            .and_then(|r| r.multiplier)
            .unwrap_or(defaults::RETRY_MULTIPLIER);

        let status_codes = retry
            .and_then(|r| r.status_codes.clone())
            .unwrap_or_else(|| defaults::RETRY_STATUS_CODES.to_vec());

        let jitter = retry
            .and_then(|r| r.jitter)
            .unwrap_or(defaults::RETRY_JITTER);

        if !multiplier.is_finite() || multiplier <= 1.0 {
            return Err(ConfigError::InvalidRetry(
                "multiplier must be a finite number greater than 1".to_string(),
            ));
        }

        if max_backoff_ms < initial_backoff_ms {
            return Err(ConfigError::InvalidRetry(format!(
                "max_backoff_ms ({max_backoff_ms}) must be >= initial_backoff_ms \
                 ({initial_backoff_ms})"
            )));
        }

        if let Some(code) = status_codes.iter().find(|c| !(100..=599).contains(*c)) {
            return Err(ConfigError::InvalidRetry(format!(
                "status code {code} is outside 100..=599"
            )));
        }

        Ok(RetryConfig::new()
            .with_max_retries(max_retries)
            .with_initial_backoff(Duration::from_millis(initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(max_backoff_ms))
            .with_backoff_multiplier(multiplier)
            .with_retryable_status_codes(status_codes)
            .with_jitter(jitter))
    }

    fn resolve_listen(cli: &Cli, toml: Option<&TomlConfig>) -> Result<SocketAddr, ConfigError> {
        let listen = cli
            .listen
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.listen.as_deref()))
            .unwrap_or(defaults::WEBHOOK_LISTEN);

        listen
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidListen {
                value: listen.to_string(),
                reason: e.to_string(),
            })
    }

    fn resolve_webhook_path(toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let path = toml
            .and_then(|t| t.webhook.path.as_deref())
            .unwrap_or(defaults::WEBHOOK_PATH);

        let invalid = |reason| ConfigError::InvalidWebhookPath {
            path: path.to_string(),
            reason,
        };

        if !path.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        // The route is mounted literally; reject anything the router would
        // read as a capture or wildcard.
        if path.contains(['{', '}']) {
            return Err(invalid("must not contain '{' or '}'"));
        }

        if path.split('/').any(|s| s.starts_with([':', '*'])) {
            return Err(invalid("segments must not start with ':' or '*'"));
        }

        Ok(path.to_string())
    }

    fn resolve_webhook_secret(cli: &Cli, toml: Option<&TomlConfig>) -> Option<WebhookSecret> {
        // An explicit empty CLI secret disables verification even if TOML sets one
        cli.webhook_secret
            .as_deref()
            .or_else(|| toml.and_then(|t| t.webhook.secret.as_deref()))
            .and_then(WebhookSecret::new)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}
