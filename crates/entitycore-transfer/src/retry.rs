use std::future::Future;
use std::time::Duration;

use entitycore_core::{Error, Result};

/// Bounded retry with exponential backoff.
///
/// Validated at construction: at least one attempt, strictly positive base
/// delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_base: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: Duration) -> Result<Self> {
        if max_retries < 1 {
            return Err(Error::Validation(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if backoff_base.is_zero() {
            return Err(Error::Validation(
                "backoff_base must be strictly positive".to_string(),
            ));
        }

        Ok(Self {
            max_retries,
            backoff_base,
        })
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay before the retry following failed attempt `attempt` (1-based):
    /// `backoff_base * 2^(attempt - 1)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Run `operation` up to `policy.max_retries()` times.
///
/// A failure for which `retryable` returns false propagates immediately; a
/// retryable failure on attempt `k < max_retries` sleeps the backoff delay
/// and tries again. When every attempt fails, the caller observes the last
/// failure. The operation is invoked between 1 and `max_retries` times,
/// never more.
pub async fn execute_with_retry<T, E, F, Fut, R>(
    mut operation: F,
    policy: &RetryPolicy,
    retryable: R,
) -> std::result::Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    R: Fn(&E) -> bool,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < policy.max_retries() && retryable(&error) => {
                tokio::time::sleep(policy.delay(attempt)).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn policy(max_retries: u32, base_ms: u64) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(base_ms)).unwrap()
    }

    #[test]
    fn test_policy_preconditions() {
        assert!(RetryPolicy::new(0, Duration::from_millis(1)).is_err());
        assert!(RetryPolicy::new(1, Duration::ZERO).is_err());
        assert!(RetryPolicy::new(1, Duration::from_millis(1)).is_ok());
    }

    #[test]
    fn test_backoff_schedule() {
        let policy = policy(5, 250);
        assert_eq!(policy.delay(1), Duration::from_millis(250));
        assert_eq!(policy.delay(2), Duration::from_millis(500));
        assert_eq!(policy.delay(3), Duration::from_millis(1000));
        assert_eq!(policy.delay(4), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_permanent_failure_invokes_exactly_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_op = calls.clone();

        let result: std::result::Result<(), String> = execute_with_retry(
            move || {
                let calls = calls_in_op.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                    Err(format!("attempt {n}"))
                }
            },
            &policy(4, 10),
            |_| true,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        // the *last* failure is observed, not the first
        assert_eq!(result.unwrap_err(), "attempt 4");
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_double() {
        let start = Instant::now();

        let _: std::result::Result<(), ()> = execute_with_retry(
            || async { Err(()) },
            &policy(4, 100),
            |_| true,
        )
        .await;

        // 100ms + 200ms + 400ms of virtual time; no sleep after the final
        // attempt
        assert_eq!(start.elapsed(), Duration::from_millis(700));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_short_circuits() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_op = calls.clone();

        let result: std::result::Result<(), &str> = execute_with_retry(
            move || {
                let calls = calls_in_op.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("bad request")
                }
            },
            &policy(5, 10),
            |_| false,
        )
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls_in_op = calls.clone();

        let result = execute_with_retry(
            move || {
                let calls = calls_in_op.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err("transient")
                    } else {
                        Ok(42)
                    }
                }
            },
            &policy(5, 10),
            |_| true,
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
