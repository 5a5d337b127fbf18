//! Rate-limited, retrying executor decorator.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::time::{Sleeper, TokioSleeper};
use crate::transport::HttpResponse;

use super::{ApiRequest, RateLimiter, RequestError, RequestExecutor, RetryConfig};

/// [`RequestExecutor`] that waits for a rate-limit slot before every attempt
/// and retries transient failures with backoff.
///
/// The limiter is held through an `Arc` so several executors can share one
/// budget. Every attempt, retries included, consumes one admission.
///
/// # Type Parameters
///
/// - `E`: The wrapped executor
/// - `S`: The sleeper used for backoff delays (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use invoice_ninja::api::{HttpExecutor, RateLimiter, RetryConfig, RetryingExecutor};
/// use invoice_ninja::transport::ReqwestClient;
///
/// let inner = HttpExecutor::new(ReqwestClient::new(), "https://invoicing.co", "token").unwrap();
/// let executor = RetryingExecutor::new(inner, Arc::new(RateLimiter::new(10)))
///     .with_config(RetryConfig::new().with_max_retries(5));
/// assert_eq!(executor.config().max_retries, 5);
/// ```
#[derive(Debug)]
pub struct RetryingExecutor<E, S = TokioSleeper> {
    inner: E,
    limiter: Arc<RateLimiter>,
    config: RetryConfig,
    sleeper: S,
}

impl<E> RetryingExecutor<E, TokioSleeper> {
    /// Wraps `inner` with the default retry configuration.
    #[must_use]
    pub fn new(inner: E, limiter: Arc<RateLimiter>) -> Self {
        Self {
            inner,
            limiter,
            config: RetryConfig::default(),
            sleeper: TokioSleeper,
        }
    }
}

impl<E, S> RetryingExecutor<E, S> {
    /// Sets a custom sleeper for backoff delays.
    ///
    /// This is primarily useful for testing to avoid actual delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RetryingExecutor<E, S2> {
        RetryingExecutor {
            inner: self.inner,
            limiter: self.limiter,
            config: self.config,
            sleeper,
        }
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_config(mut self, config: RetryConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the retry configuration.
    ///
    /// Requires exclusive access, so no request is in flight.
    pub fn set_config(&mut self, config: RetryConfig) {
        self.config = config;
    }

    /// Replaces the rate limiter with a fresh one allowing
    /// `requests_per_second`.
    ///
    /// # Panics
    ///
    /// Panics if `requests_per_second` is 0.
    pub fn set_rate_limit(&mut self, requests_per_second: u32) {
        self.limiter = Arc::new(RateLimiter::new(requests_per_second));
    }

    /// Returns the retry configuration.
    #[must_use]
    pub const fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Returns the shared rate limiter.
    #[must_use]
    pub const fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Returns the wrapped executor.
    #[must_use]
    pub const fn inner(&self) -> &E {
        &self.inner
    }
}

impl<E: RequestExecutor, S: Sleeper> RequestExecutor for RetryingExecutor<E, S> {
    async fn execute(
        &self,
        request: &ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        let mut attempt = 0;

        loop {
            self.limiter.admit(cancel).await?;

            let error = match self.inner.execute(request, cancel).await {
                Ok(response) => return Ok(response),
                Err(e) => e,
            };

            if !self.config.should_retry(&error, attempt) {
                return Err(error);
            }

            let delay = self.config.backoff(attempt, &error);
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                attempt = attempt + 1,
                delay_ms = delay.as_millis(),
                error = %error,
                "Request failed, retrying"
            );

            tokio::select! {
                () = self.sleeper.sleep(delay) => {}
                () = cancel.cancelled() => return Err(RequestError::Cancelled),
            }

            attempt += 1;
        }
    }
}
