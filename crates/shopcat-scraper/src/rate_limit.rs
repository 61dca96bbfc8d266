//! Rate limiting and retry utilities for the storefront client.
//!
//! A blocked request (any failure status other than 404) waits out a fixed
//! cooldown and is tried again. Everything else, including transport failures and parse
//! errors, is propagated immediately.

use std::future::Future;
use std::time::Duration;

use futures::future::BoxFuture;
use shopcat_core::app_config::DEFAULT_RETRY_COOLDOWN_SECS;

use crate::error::ScraperError;

/// Suspends the current task for a given duration.
///
/// The client sleeps through this trait so tests can observe cooldowns
/// without waiting for them.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()>;
}

/// [`Sleeper`] backed by `tokio::time::sleep`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// How blocked requests are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed wait before every retry. Does not grow.
    pub cooldown: Duration,
    /// Additional attempts after the first failure. `None` never gives up.
    pub max_retries: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(DEFAULT_RETRY_COOLDOWN_SECS),
            max_retries: None,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(cooldown: Duration, max_retries: Option<u32>) -> Self {
        Self {
            cooldown,
            max_retries,
        }
    }

    /// A policy that never retries.
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            cooldown: Duration::ZERO,
            max_retries: Some(0),
        }
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_retries.is_some_and(|max| attempt >= max)
    }
}

/// Returns `true` if `err` means the storefront is throttling or temporarily
/// refusing us.
///
/// Only [`ScraperError::Blocked`] qualifies. Network failures are fatal:
/// an unreachable host will not become reachable by waiting three minutes.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(err, ScraperError::Blocked { .. })
}

/// Executes `operation`, sleeping `policy.cooldown` and trying again each time
/// it fails with a retriable error.
///
/// With `policy.max_retries = Some(n)` the operation runs at most `n + 1` times
/// and the last error is returned. With `None` it runs until it succeeds or
/// fails with a non-retriable error.
pub(crate) async fn retry_with_cooldown<T, F, Fut>(
    policy: RetryPolicy,
    sleeper: &dyn Sleeper,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || policy.exhausted(attempt) {
                    return Err(err);
                }
                tracing::warn!(
                    attempt,
                    max_retries = ?policy.max_retries,
                    cooldown_secs = policy.cooldown.as_secs(),
                    error = %err,
                    "blocked by storefront, sleeping before retry"
                );
            }
        }

        sleeper.sleep(policy.cooldown).await;
        attempt = attempt.saturating_add(1);
        tracing::info!(attempt, "retrying blocked request");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> BoxFuture<'static, ()> {
            self.slept.lock().unwrap().push(duration);
            Box::pin(async {})
        }
    }

    fn blocked() -> ScraperError {
        ScraperError::Blocked {
            domain: "test.example.com".to_owned(),
            status: 429,
        }
    }

    fn policy(max_retries: Option<u32>) -> RetryPolicy {
        RetryPolicy::new(Duration::from_mins(3), max_retries)
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_cooldown(policy(Some(3)), &sleeper, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sleeps_fixed_cooldown_between_blocked_attempts() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_cooldown(policy(None), &sleeper, || {
            let cc = Arc::clone(&cc);
            async move {
                let n = cc.fetch_add(1, Ordering::SeqCst);
                if n < 3 {
                    Err(blocked())
                } else {
                    Ok::<u32, ScraperError>(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99);
        assert_eq!(call_count.load(Ordering::SeqCst), 4);
        assert_eq!(
            *sleeper.slept.lock().unwrap(),
            vec![Duration::from_mins(3); 3]
        );
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_retries() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_cooldown(policy(Some(2)), &sleeper, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(blocked())
            }
        })
        .await;
        // max_retries=2 → 3 total attempts
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.slept.lock().unwrap().len(), 2);
        assert!(matches!(result, Err(ScraperError::Blocked { .. })));
    }

    #[tokio::test]
    async fn no_retry_policy_tries_once() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_cooldown(RetryPolicy::no_retry(), &sleeper, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(blocked())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_cooldown(policy(None), &sleeper, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::NotFound {
                    url: "https://example.com/products.json".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::NotFound { .. })));
    }

    #[tokio::test]
    async fn does_not_retry_deserialize_error() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_cooldown(policy(None), &sleeper, || {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                let e = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
                Err::<u32, ScraperError>(ScraperError::Deserialize {
                    context: "test".to_owned(),
                    source: e,
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(ScraperError::Deserialize { .. })));
    }

    #[test]
    fn default_policy_is_unbounded_three_minutes() {
        let p = RetryPolicy::default();
        assert_eq!(p.cooldown, Duration::from_mins(3));
        assert_eq!(p.max_retries, None);
    }
}
