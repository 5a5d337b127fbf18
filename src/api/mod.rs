//! Outbound API access.
//!
//! Requests flow through a stack of [`RequestExecutor`]s:
//!
//! - [`HttpExecutor`] builds the HTTP exchange and classifies failure statuses
//! - [`RetryingExecutor`] gates every attempt on a shared [`RateLimiter`] and
//!   retries transient failures per [`RetryConfig`]
//!
//! [`InvoiceNinja`] is the typed facade over the default stack.

mod client;
mod error;
mod executor;
mod headers;
mod rate_limit;
mod request;
mod retry;
mod retrying;

#[cfg(test)]
mod rate_limit_tests;
#[cfg(test)]
mod retrying_tests;

pub use client::{ClientOptions, DefaultExecutor, InvoiceNinja};
pub use error::{ApiError, BuildError, Cancelled, ErrorKind, RequestError, classify};
pub use executor::{DEFAULT_BASE_URL, DEMO_BASE_URL, HttpExecutor, RequestExecutor, USER_AGENT};
pub use headers::{
    RATE_LIMIT_LIMIT, RATE_LIMIT_REMAINING, RATE_LIMIT_RESET, RateLimitInfo, retry_after,
};
pub use rate_limit::RateLimiter;
pub use request::ApiRequest;
pub use retry::{IsRetryable, RetryConfig};
pub use retrying::RetryingExecutor;
