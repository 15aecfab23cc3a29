//! Minimum-interval gate shared by every outbound call.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// Enforces a minimum interval between consecutive outbound HTTP calls.
///
/// Token exchanges and data requests go through the same gate. The lock is
/// held for the whole call, so concurrent callers sharing a client are
/// dispatched one at a time.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter with the given minimum interval.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    /// The configured minimum interval.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Run `call` once the interval since the previous call has elapsed.
    ///
    /// The dispatch time is recorded when `call` completes, whether it
    /// succeeded or not.
    pub async fn throttle<F: Future>(&self, call: F) -> F::Output {
        let mut last_dispatch = self.last_dispatch.lock().await;

        if let Some(last) = *last_dispatch {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let wait = self.min_interval - elapsed;
                debug!("Rate limiting: waiting {}ms", wait.as_millis());
                sleep(wait).await;
            }
        }

        let output = call.await;
        *last_dispatch = Some(Instant::now());
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_first_call_is_not_delayed() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let started = Instant::now();
        limiter.throttle(async {}).await;
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_back_to_back_calls_are_spaced() {
        let interval = Duration::from_millis(100);
        let limiter = RateLimiter::new(interval);

        let first = limiter.throttle(async { Instant::now() }).await;
        let second = limiter.throttle(async { Instant::now() }).await;

        assert!(second.duration_since(first) >= interval);
    }

    #[tokio::test]
    async fn test_interval_counts_from_call_completion() {
        let interval = Duration::from_millis(100);
        let limiter = RateLimiter::new(interval);

        let first_done = limiter
            .throttle(async {
                sleep(Duration::from_millis(50)).await;
                Instant::now()
            })
            .await;
        let second_sent = limiter.throttle(async { Instant::now() }).await;

        assert!(second_sent.duration_since(first_done) >= interval);
    }

    #[tokio::test]
    async fn test_concurrent_callers_are_serialized() {
        let interval = Duration::from_millis(50);
        let limiter = Arc::new(RateLimiter::new(interval));

        let handles: Vec<_> = (0..3)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                tokio::spawn(async move { limiter.throttle(async { Instant::now() }).await })
            })
            .collect();

        let mut sent = Vec::new();
        for handle in handles {
            sent.push(handle.await.unwrap());
        }
        sent.sort();

        for pair in sent.windows(2) {
            assert!(pair[1].duration_since(pair[0]) >= interval);
        }
    }
}
