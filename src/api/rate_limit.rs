//! Client-side sliding-window rate limiting.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::Cancelled;

/// Admission gate bounding the outbound request rate.
///
/// Keeps the timestamps of admitted requests within a trailing one-second
/// window. A caller is admitted once fewer than `capacity` timestamps remain
/// in the window; otherwise it sleeps until the oldest one leaves the window
/// and re-evaluates. Wake order among blocked callers is unspecified.
///
/// Share one limiter between tasks through an `Arc`.
///
/// # Example
///
/// ```
/// use invoice_ninja::api::RateLimiter;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let limiter = RateLimiter::new(10);
/// let cancel = CancellationToken::new();
/// limiter.admit(&cancel).await.expect("not cancelled");
/// # }
/// ```
#[derive(Debug)]
pub struct RateLimiter {
    capacity: usize,
    window: Duration,
    admitted: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Length of the rolling window.
    pub const WINDOW: Duration = Duration::from_secs(1);

    /// Minimum value for `requests_per_second`.
    pub const MIN_REQUESTS_PER_SECOND: u32 = 1;

    /// Creates a limiter admitting `requests_per_second` requests per window.
    ///
    /// # Panics
    ///
    /// Panics if `requests_per_second` is 0.
    #[must_use]
    pub fn new(requests_per_second: u32) -> Self {
        assert!(
            requests_per_second >= Self::MIN_REQUESTS_PER_SECOND,
            "requests_per_second must be at least 1"
        );
        let capacity = requests_per_second as usize;
        Self {
            capacity,
            window: Self::WINDOW,
            admitted: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Returns the number of requests admitted per window.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Waits until a request may be sent, then records it.
    ///
    /// Returns immediately if the window has room. Nothing is recorded when
    /// the wait is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`Cancelled`] if `cancel` has fired or fires while waiting.
    pub async fn admit(&self, cancel: &CancellationToken) -> Result<(), Cancelled> {
        loop {
            if cancel.is_cancelled() {
                return Err(Cancelled);
            }

            let Err(wait) = self.try_admit() else {
                return Ok(());
            };

            tracing::debug!(wait_ms = wait.as_millis(), "Rate limit reached, waiting");

            tokio::select! {
                () = tokio::time::sleep(wait) => {}
                () = cancel.cancelled() => return Err(Cancelled),
            }
        }
    }

    /// Prunes expired entries and records `now` if there is room.
    ///
    /// Returns the time until the oldest entry leaves the window otherwise.
    fn try_admit(&self) -> Result<(), Duration> {
        let mut admitted = self.admitted.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        while admitted
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.window)
        {
            admitted.pop_front();
        }

        match admitted.front() {
            Some(oldest) if admitted.len() >= self.capacity => {
                Err((*oldest + self.window).saturating_duration_since(now))
            }
            _ => {
                admitted.push_back(now);
                Ok(())
            }
        }
    }
}
