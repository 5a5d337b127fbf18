//! Tests for `RetryingExecutor`.

use super::*;
use crate::time::{InstantSleeper, Sleeper};
use crate::transport::{HttpError, HttpResponse};
use http::{HeaderMap, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Executor that replays a scripted sequence of outcomes.
#[derive(Debug)]
struct ScriptedExecutor {
    outcomes: Mutex<Vec<Result<u16, RequestError>>>,
    calls: AtomicUsize,
}

impl ScriptedExecutor {
    fn new(outcomes: Vec<Result<u16, RequestError>>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes),
            calls: AtomicUsize::new(0),
        })
    }

    /// `failures` copies of `status`, then a 200.
    fn failing_then_ok(status: u16, failures: usize) -> Arc<Self> {
        let mut outcomes: Vec<Result<u16, RequestError>> = (0..failures)
            .map(|_| Err(classify(status, b"").into()))
            .collect();
        outcomes.push(Ok(200));
        Self::new(outcomes)
    }

    fn always(status: u16, times: usize) -> Arc<Self> {
        Self::new(
            (0..times)
                .map(|_| Err(classify(status, b"").into()))
                .collect(),
        )
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RequestExecutor for Arc<ScriptedExecutor> {
    async fn execute(
        &self,
        _request: &ApiRequest,
        _cancel: &CancellationToken,
    ) -> Result<HttpResponse, RequestError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let status = self.outcomes.lock().unwrap().remove(0)?;
        Ok(HttpResponse::new(
            StatusCode::from_u16(status).unwrap(),
            HeaderMap::new(),
            bytes::Bytes::new(),
        ))
    }
}

/// Sleeper that records requested delays without waiting.
#[derive(Debug, Clone, Default)]
struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

fn retrying(
    inner: &Arc<ScriptedExecutor>,
    config: RetryConfig,
) -> RetryingExecutor<Arc<ScriptedExecutor>, InstantSleeper> {
    RetryingExecutor::new(Arc::clone(inner), Arc::new(RateLimiter::new(100)))
        .with_config(config)
        .with_sleeper(InstantSleeper)
}

fn request() -> ApiRequest {
    ApiRequest::get("/api/v1/invoices")
}

mod retry_count {
    use super::*;

    #[tokio::test]
    async fn success_on_first_attempt() {
        let inner = ScriptedExecutor::new(vec![Ok(200)]);
        let exec = retrying(&inner, RetryConfig::new());

        let response = exec.execute(&request(), &CancellationToken::new()).await.unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let inner = ScriptedExecutor::failing_then_ok(503, 2);
        let exec = retrying(&inner, RetryConfig::new().with_max_retries(3));

        let result = exec.execute(&request(), &CancellationToken::new()).await;

        assert!(result.is_ok());
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn retries_exactly_min_of_max_and_failures() {
        for max_retries in 0..4u32 {
            for failures in 0..6usize {
                let inner = ScriptedExecutor::failing_then_ok(500, failures);
                let exec = retrying(&inner, RetryConfig::new().with_max_retries(max_retries));

                let result = exec.execute(&request(), &CancellationToken::new()).await;

                let retries = failures.min(max_retries as usize);
                assert_eq!(
                    inner.calls(),
                    retries + 1,
                    "max_retries={max_retries} failures={failures}"
                );
                assert_eq!(result.is_ok(), failures <= max_retries as usize);
            }
        }
    }

    #[tokio::test]
    async fn exhausted_retries_return_last_error() {
        let inner = ScriptedExecutor::new(vec![
            Err(classify(500, b"").into()),
            Err(classify(502, b"").into()),
            Err(classify(503, b"").into()),
        ]);
        let exec = retrying(&inner, RetryConfig::new().with_max_retries(2));

        let error = exec
            .execute(&request(), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(error.as_api().map(|e| e.status), Some(503));
        assert_eq!(inner.calls(), 3);
    }

    #[tokio::test]
    async fn zero_max_retries_makes_one_attempt() {
        let inner = ScriptedExecutor::always(503, 1);
        let exec = retrying(&inner, RetryConfig::new().with_max_retries(0));

        let result = exec.execute(&request(), &CancellationToken::new()).await;

        assert!(result.is_err());
        assert_eq!(inner.calls(), 1);
    }

    #[tokio::test]
    async fn transport_errors_are_retried() {
        let inner = ScriptedExecutor::new(vec![Err(HttpError::Timeout.into()), Ok(200)]);
        let exec = retrying(&inner, RetryConfig::new());

        assert!(exec.execute(&request(), &CancellationToken::new()).await.is_ok());
        assert_eq!(inner.calls(), 2);
    }
}

mod short_circuit {
    use super::*;

    #[tokio::test]
    async fn non_retryable_statuses_fail_after_first_attempt() {
        for status in [400, 401, 403, 404, 422] {
            let inner = ScriptedExecutor::always(status, 1);
            let exec = retrying(&inner, RetryConfig::new());

            let error = exec
                .execute(&request(), &CancellationToken::new())
                .await
                .unwrap_err();

            assert_eq!(error.as_api().map(|e| e.status), Some(status));
            assert_eq!(inner.calls(), 1, "status {status}");
        }
    }

    #[tokio::test]
    async fn invalid_url_is_not_retried() {
        let inner = ScriptedExecutor::new(vec![Err(HttpError::InvalidUrl("x".into()).into())]);
        let exec = retrying(&inner, RetryConfig::new());

        assert!(exec.execute(&request(), &CancellationToken::new()).await.is_err());
        assert_eq!(inner.calls(), 1);
    }
}

mod backoff_delays {
    use super::*;

    #[tokio::test]
    async fn sleeps_with_exponential_backoff() {
        let inner = ScriptedExecutor::failing_then_ok(500, 3);
        let sleeper = RecordingSleeper::default();
        let exec = RetryingExecutor::new(Arc::clone(&inner), Arc::new(RateLimiter::new(100)))
            .with_config(RetryConfig::new().with_jitter(false))
            .with_sleeper(sleeper.clone());

        exec.execute(&request(), &CancellationToken::new()).await.unwrap();

        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4)
            ]
        );
    }

    #[tokio::test]
    async fn rate_limited_response_uses_long_backoff() {
        let inner = ScriptedExecutor::failing_then_ok(429, 1);
        let sleeper = RecordingSleeper::default();
        let exec = RetryingExecutor::new(Arc::clone(&inner), Arc::new(RateLimiter::new(100)))
            .with_sleeper(sleeper.clone());

        exec.execute(&request(), &CancellationToken::new()).await.unwrap();

        assert_eq!(sleeper.delays(), vec![RetryConfig::RATE_LIMIT_BACKOFF]);
    }

    #[tokio::test]
    async fn no_sleep_after_final_attempt() {
        let inner = ScriptedExecutor::always(500, 2);
        let sleeper = RecordingSleeper::default();
        let exec = RetryingExecutor::new(Arc::clone(&inner), Arc::new(RateLimiter::new(100)))
            .with_config(RetryConfig::new().with_max_retries(1))
            .with_sleeper(sleeper.clone());

        let _ = exec.execute(&request(), &CancellationToken::new()).await;

        assert_eq!(sleeper.delays().len(), 1);
    }
}

mod rate_limiting {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn every_attempt_consumes_an_admission() {
        let inner = ScriptedExecutor::failing_then_ok(500, 2);
        let limiter = Arc::new(RateLimiter::new(2));
        let exec = RetryingExecutor::new(Arc::clone(&inner), Arc::clone(&limiter))
            .with_config(RetryConfig::new().with_initial_backoff(Duration::ZERO))
            .with_sleeper(InstantSleeper);
        let start = Instant::now();

        exec.execute(&request(), &CancellationToken::new()).await.unwrap();

        // Third attempt had to wait for the window to roll over.
        assert_eq!(inner.calls(), 3);
        assert!(start.elapsed() >= RateLimiter::WINDOW);
    }

    #[test]
    fn set_rate_limit_replaces_limiter() {
        let inner = ScriptedExecutor::new(vec![]);
        let mut exec = RetryingExecutor::new(inner, Arc::new(RateLimiter::new(10)));

        exec.set_rate_limit(25);

        assert_eq!(exec.limiter().capacity(), 25);
    }

    #[test]
    fn set_config_replaces_config() {
        let inner = ScriptedExecutor::new(vec![]);
        let mut exec = RetryingExecutor::new(inner, Arc::new(RateLimiter::new(10)));

        exec.set_config(RetryConfig::new().with_max_retries(9));

        assert_eq!(exec.config().max_retries, 9);
    }
}

mod cancellation {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn cancel_during_backoff_returns_promptly() {
        let inner = ScriptedExecutor::always(503, 4);
        let exec = RetryingExecutor::new(Arc::clone(&inner), Arc::new(RateLimiter::new(100)))
            .with_config(
                RetryConfig::new()
                    .with_jitter(false)
                    .with_initial_backoff(Duration::from_secs(10))
                    .with_max_backoff(Duration::from_secs(10)),
            );
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.cancel();
        });
        let start = Instant::now();

        let error = exec.execute(&request(), &cancel).await.unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(inner.calls(), 1);
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn cancelled_before_start_makes_no_attempt() {
        let inner = ScriptedExecutor::new(vec![Ok(200)]);
        let exec = retrying(&inner, RetryConfig::new());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let error = exec.execute(&request(), &cancel).await.unwrap_err();

        assert!(error.is_cancelled());
        assert_eq!(inner.calls(), 0);
    }
}
