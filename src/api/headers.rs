//! Rate-limit related response headers.

use std::time::{Duration, SystemTime};

use http::HeaderMap;

/// Header carrying the request allowance per window.
pub const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
/// Header carrying the requests left in the current window.
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
/// Header carrying the window reset time as unix seconds.
pub const RATE_LIMIT_RESET: &str = "x-ratelimit-reset";

/// Rate-limit information reported by the API.
///
/// Fields are `None` when the header is absent or unparsable; the API
/// does not always send a reset timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitInfo {
    /// Maximum number of requests allowed per window.
    pub limit: Option<u32>,
    /// Number of requests remaining in the current window.
    pub remaining: Option<u32>,
    /// When the current window resets.
    pub reset: Option<SystemTime>,
}

impl RateLimitInfo {
    /// Parses rate-limit information from response headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let reset = parse::<u64>(headers, RATE_LIMIT_RESET)
            .map(|secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs));

        Self {
            limit: parse(headers, RATE_LIMIT_LIMIT),
            remaining: parse(headers, RATE_LIMIT_REMAINING),
            reset,
        }
    }
}

/// Reads a `Retry-After` hint given in delta-seconds.
///
/// HTTP-date values are not supported and yield `None`.
#[must_use]
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    parse::<u64>(headers, http::header::RETRY_AFTER.as_str()).map(Duration::from_secs)
}

fn parse<T: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
