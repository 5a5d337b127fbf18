//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default API base URL.
pub const BASE_URL: &str = crate::api::DEFAULT_BASE_URL;

/// Default timeout for one HTTP exchange, in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Default client-side rate limit.
pub const REQUESTS_PER_SECOND: u32 = 10;

/// Default maximum number of retries after the first attempt.
pub const RETRY_MAX_RETRIES: u32 = 3;

/// Default initial retry backoff in milliseconds.
pub const RETRY_INITIAL_BACKOFF_MS: u64 = 1_000;

/// Default maximum retry backoff in milliseconds.
pub const RETRY_MAX_BACKOFF_MS: u64 = 30_000;

/// Default retry backoff multiplier.
pub const RETRY_MULTIPLIER: f64 = 2.0;

/// Status codes retried by default.
pub const RETRY_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Jitter is on unless disabled.
pub const RETRY_JITTER: bool = true;

/// Default webhook listen address.
pub const WEBHOOK_LISTEN: &str = "127.0.0.1:8080";

/// Default webhook route.
pub const WEBHOOK_PATH: &str = "/webhook";
