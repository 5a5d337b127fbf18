//! Tests for `RateLimiter`.
//!
//! Timing tests run on paused tokio time, so sleeps advance the virtual
//! clock instantly.

use super::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Asserts `start.elapsed()` is `expected`, allowing timer-wheel rounding.
fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(5),
        "elapsed {elapsed:?}, expected {expected:?}"
    );
}

mod construction {
    use super::*;

    #[test]
    fn new_sets_capacity() {
        assert_eq!(RateLimiter::new(10).capacity(), 10);
    }

    #[test]
    #[should_panic(expected = "requests_per_second must be at least 1")]
    fn zero_capacity_panics() {
        let _ = RateLimiter::new(0);
    }

    #[test]
    fn limiter_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateLimiter>();
    }
}

mod admission {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn up_to_capacity_is_admitted_without_waiting() {
        let limiter = RateLimiter::new(5);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..5 {
            limiter.admit(&cancel).await.unwrap();
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn request_over_capacity_waits_for_window() {
        let limiter = RateLimiter::new(3);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.admit(&cancel).await.unwrap();
        }
        limiter.admit(&cancel).await.unwrap();

        assert_elapsed(start, RateLimiter::WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_is_measured_from_oldest_admission() {
        let limiter = RateLimiter::new(2);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        limiter.admit(&cancel).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        limiter.admit(&cancel).await.unwrap();

        limiter.admit(&cancel).await.unwrap();

        assert_elapsed(start, RateLimiter::WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_free_capacity() {
        let limiter = RateLimiter::new(2);
        let cancel = CancellationToken::new();

        limiter.admit(&cancel).await.unwrap();
        limiter.admit(&cancel).await.unwrap();
        tokio::time::sleep(RateLimiter::WINDOW).await;

        let before = Instant::now();
        limiter.admit(&cancel).await.unwrap();
        limiter.admit(&cancel).await.unwrap();

        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn sustained_load_respects_capacity() {
        let limiter = RateLimiter::new(4);
        let cancel = CancellationToken::new();
        let start = Instant::now();

        for _ in 0..12 {
            limiter.admit(&cancel).await.unwrap();
        }

        // Three full windows: 4 immediately, 4 after 1s, 4 after 2s.
        assert_elapsed(start, Duration::from_secs(2));
    }
}

mod concurrency {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_within_capacity_all_pass() {
        let limiter = Arc::new(RateLimiter::new(8));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let cancel = cancel.clone();
                tokio::spawn(async move { limiter.admit(&cancel).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_overflow_is_deferred_to_next_window() {
        let limiter = Arc::new(RateLimiter::new(3));
        let cancel = CancellationToken::new();
        let start = Instant::now();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    limiter.admit(&cancel).await.unwrap();
                    start.elapsed()
                })
            })
            .collect();

        let mut elapsed = Vec::new();
        for handle in handles {
            elapsed.push(handle.await.unwrap());
        }
        elapsed.sort();

        assert_eq!(&elapsed[..3], &[Duration::ZERO; 3]);
        assert!(elapsed[3..].iter().all(|e| *e >= RateLimiter::WINDOW));
    }
}

mod cancellation {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn already_cancelled_token_is_rejected_without_recording() {
        let limiter = RateLimiter::new(1);
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(limiter.admit(&cancel).await, Err(Cancelled));

        let start = Instant::now();
        limiter.admit(&CancellationToken::new()).await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelling_blocked_caller_returns_promptly() {
        let limiter = Arc::new(RateLimiter::new(1));
        limiter.admit(&CancellationToken::new()).await.unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        let start = Instant::now();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let result = limiter.admit(&cancel).await;

        assert_eq!(result, Err(Cancelled));
        assert_elapsed(start, Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_wait_does_not_consume_capacity() {
        let limiter = RateLimiter::new(1);
        limiter.admit(&CancellationToken::new()).await.unwrap();

        let cancel = CancellationToken::new();
        cancel.cancel();
        let _ = limiter.admit(&cancel).await;

        let start = Instant::now();
        limiter.admit(&CancellationToken::new()).await.unwrap();
        assert_elapsed(start, RateLimiter::WINDOW);
    }
}
