//! Retry configuration and backoff computation.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::Rng;

use crate::transport::HttpError;

use super::RequestError;

/// Configuration for retrying failed API requests.
///
/// Uses exponential backoff with optional jitter and a maximum delay cap.
/// Treat a value as immutable once handed to a client; replace it wholesale
/// to change behavior.
///
/// # Defaults
///
/// - `max_retries`: 3 (four attempts in total)
/// - `initial_backoff`: 1 second
/// - `max_backoff`: 30 seconds
/// - `backoff_multiplier`: 2.0
/// - `retryable_status_codes`: 429, 500, 502, 503, 504
/// - `jitter`: enabled
///
/// # Example
///
/// ```
/// use invoice_ninja::api::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::new()
///     .with_max_retries(5)
///     .with_initial_backoff(Duration::from_millis(200))
///     .with_max_backoff(Duration::from_secs(10))
///     .with_backoff_multiplier(1.5)
///     .with_jitter(false);
///
/// assert_eq!(config.base_backoff(1), Duration::from_millis(300));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Number of retries after the first attempt.
    ///
    /// A value of 0 means exactly one attempt.
    pub max_retries: u32,

    /// Delay before the first retry.
    pub initial_backoff: Duration,

    /// Upper bound on any computed delay. Should be at least
    /// `initial_backoff`; if it is smaller, every delay is clamped to it.
    pub max_backoff: Duration,

    /// Factor applied to the delay after each retry. Must be greater than 1.
    pub backoff_multiplier: f64,

    /// API status codes that are worth retrying.
    pub retryable_status_codes: BTreeSet<u16>,

    /// Whether to add up to [`Self::JITTER_FRACTION`] of random extra delay.
    pub jitter: bool,
}

impl RetryConfig {
    /// Default number of retries.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Default initial backoff (1 second).
    pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);

    /// Default maximum backoff (30 seconds).
    pub const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(30);

    /// Default multiplier (2.0).
    pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

    /// Default retryable status codes.
    pub const DEFAULT_RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

    /// Delay after a 429 response that carried no `Retry-After` hint.
    pub const RATE_LIMIT_BACKOFF: Duration = Duration::from_secs(60);

    /// Largest share of the base delay added as jitter.
    pub const JITTER_FRACTION: f64 = 0.3;

    /// Creates a retry configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
            max_backoff: Self::DEFAULT_MAX_BACKOFF,
            backoff_multiplier: Self::DEFAULT_BACKOFF_MULTIPLIER,
            retryable_status_codes: Self::DEFAULT_RETRYABLE_STATUS_CODES.into(),
            jitter: true,
        }
    }

    /// Sets the number of retries after the first attempt.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the delay before the first retry.
    ///
    /// Zero is supported (useful in tests) but creates a tight retry loop.
    #[must_use]
    pub const fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Sets the maximum delay between retries.
    ///
    /// Not checked against `initial_backoff`, since the builders may be
    /// called in either order. A cap below the initial delay makes every
    /// delay equal to the cap.
    #[must_use]
    pub const fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    /// Sets the backoff multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `multiplier` is not a finite number greater than 1.0.
    #[must_use]
    pub fn with_backoff_multiplier(mut self, multiplier: f64) -> Self {
        assert!(
            multiplier.is_finite() && multiplier > 1.0,
            "backoff_multiplier must be greater than 1"
        );
        self.backoff_multiplier = multiplier;
        self
    }

    /// Replaces the set of retryable status codes.
    #[must_use]
    pub fn with_retryable_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_status_codes = codes.into_iter().collect();
        self
    }

    /// Enables or disables jitter.
    #[must_use]
    pub const fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Returns true if a failure with this status code may be retried.
    #[must_use]
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_status_codes.contains(&status)
    }

    /// Decides whether the failure of attempt `attempt` (0-indexed) is retried.
    ///
    /// Transport failures are retried unless they stem from configuration;
    /// API failures only when their status is retryable. Cancellation and
    /// encoding problems are never retried.
    #[must_use]
    pub fn should_retry(&self, error: &RequestError, attempt: u32) -> bool {
        if attempt >= self.max_retries {
            return false;
        }

        match error {
            RequestError::Api(e) => self.is_retryable_status(e.status),
            RequestError::Transport(e) => e.is_retryable(),
            RequestError::Cancelled
            | RequestError::Encode(_)
            | RequestError::Decode(_)
            | RequestError::InvalidPath { .. } => false,
        }
    }

    /// Computes the delay before retrying after attempt `attempt` (0-indexed)
    /// failed with `error`.
    ///
    /// A 429 response waits for its `Retry-After` hint, or
    /// [`Self::RATE_LIMIT_BACKOFF`] without one, regardless of `attempt`.
    /// Otherwise the delay is `initial_backoff * multiplier^attempt`, plus
    /// jitter if enabled, capped at `max_backoff`.
    #[must_use]
    pub fn backoff(&self, attempt: u32, error: &RequestError) -> Duration {
        if let Some(api) = error.as_api().filter(|e| e.is_rate_limited()) {
            return api.retry_after.unwrap_or(Self::RATE_LIMIT_BACKOFF);
        }

        let base = self.exponential_secs(attempt);
        if !self.jitter {
            return self.cap(base);
        }

        let fraction = rand::rng().random_range(0.0..=Self::JITTER_FRACTION);
        self.cap(base + base * fraction)
    }

    /// Computes the delay for attempt `attempt` without jitter or 429 handling.
    #[must_use]
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        self.cap(self.exponential_secs(attempt))
    }

    fn exponential_secs(&self, attempt: u32) -> f64 {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent)
    }

    /// Clamps a delay in seconds to `[0, max_backoff]`.
    fn cap(&self, secs: f64) -> Duration {
        let capped = secs.max(0.0).min(self.max_backoff.as_secs_f64());
        Duration::try_from_secs_f64(capped).unwrap_or(self.max_backoff)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension trait for checking if a transport error is retryable.
///
/// Determines whether an error represents a transient failure that
/// warrants another attempt.
pub trait IsRetryable {
    /// Returns true if the error is potentially transient and should be retried.
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for HttpError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            Self::Connection(_) | Self::Timeout => true,
            // Configuration issues, not transient
            Self::InvalidUrl(_) | Self::Setup(_) => false,
        }
    }
}
