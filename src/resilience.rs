//! Resilient call wrapper: retry with backoff under an overall deadline
//!
//! Wraps a single external operation with a bounded number of attempts,
//! exponential backoff (`base * 2^attempt`) and a hard deadline. Timed-out
//! attempts are cancelled by dropping their future; no signal-based timeouts.
//! On exhaustion the caller-supplied fallback is returned, tagged so callers
//! can still distinguish a degraded reply from a real one.

use std::future::Future;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::metrics;

/// Retry/deadline parameters for one class of external call.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub deadline: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, deadline: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
            deadline,
        }
    }

    /// Retriever calls: 3 attempts, 1s base backoff, 10s total.
    pub fn retriever() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(10))
    }

    /// Translator calls: 3 attempts, 1s base backoff, 5s total.
    pub fn translator() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(5))
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Result of a resilient call. Functionally both variants carry the declared
/// result type; `Fallback` marks that the operation was exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome<T> {
    Success(T),
    Fallback(T),
}

impl<T> CallOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            CallOutcome::Success(v) | CallOutcome::Fallback(v) => v,
        }
    }

    pub fn used_fallback(&self) -> bool {
        matches!(self, CallOutcome::Fallback(_))
    }
}

/// Run `op` with retries and an overall deadline.
///
/// Each attempt runs under `tokio::time::timeout` bounded by the time left
/// until the deadline; expiry drops the in-flight future. One latency
/// observation is emitted per attempt, plus timeout/retry counters, all under
/// the given operation `name`.
pub async fn call_with_retry<T, F, Fut>(
    name: &str,
    policy: &RetryPolicy,
    fallback: impl FnOnce() -> T,
    op: F,
) -> CallOutcome<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let started = Instant::now();

    for attempt in 0..policy.max_attempts {
        let remaining = match policy.deadline.checked_sub(started.elapsed()) {
            Some(d) if !d.is_zero() => d,
            _ => {
                warn!(op = name, attempt, "deadline exhausted before attempt");
                break;
            }
        };

        let attempt_started = Instant::now();
        match tokio::time::timeout(remaining, op()).await {
            Ok(Ok(value)) => {
                metrics::observe_latency(name, attempt_started.elapsed());
                return CallOutcome::Success(value);
            }
            Ok(Err(e)) => {
                metrics::observe_latency(name, attempt_started.elapsed());
                warn!(
                    op = name,
                    attempt = attempt + 1,
                    max = policy.max_attempts,
                    error = %e,
                    "external call failed"
                );
            }
            Err(_) => {
                metrics::observe_latency(name, attempt_started.elapsed());
                metrics::timeout(name);
                warn!(
                    op = name,
                    attempt = attempt + 1,
                    max = policy.max_attempts,
                    "external call timed out, in-flight future dropped"
                );
            }
        }

        // Back off before the next attempt, but never past the deadline.
        if attempt + 1 < policy.max_attempts {
            let delay = policy.backoff(attempt);
            let remaining = policy.deadline.saturating_sub(started.elapsed());
            if remaining.is_zero() {
                break;
            }
            metrics::retry(name);
            info!(op = name, delay_ms = delay.as_millis() as u64, "retrying");
            tokio::time::sleep(delay.min(remaining)).await;
        }
    }

    metrics::incr(&format!("{name}_fallbacks"));
    CallOutcome::Fallback(fallback())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(5), Duration::from_secs(1));
        let outcome = call_with_retry("test_ok", &policy, Vec::new, || async {
            Ok(vec![1u32, 2, 3])
        })
        .await;
        assert!(!outcome.used_fallback());
        assert_eq!(outcome.into_inner(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_always_failing_op_returns_fallback() {
        let policy = RetryPolicy::new(3, Duration::from_millis(5), Duration::from_secs(1));
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_in = attempts.clone();

        let started = Instant::now();
        let outcome = call_with_retry(
            "test_fail",
            &policy,
            || "fallback".to_string(),
            move || {
                let attempts = attempts_in.clone();
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    anyhow::bail!("always fails")
                }
            },
        )
        .await;

        assert!(outcome.used_fallback());
        assert_eq!(outcome.into_inner(), "fallback");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        // sum(base * 2^i for i in 0..2) = 5 + 10 = 15ms of backoff plus slack.
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let policy = RetryPolicy::new(3, Duration::from_millis(1), Duration::from_secs(1));
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_in = attempts.clone();

        let outcome = call_with_retry(
            "test_transient",
            &policy,
            || 0u32,
            move || {
                let attempts = attempts_in.clone();
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                        anyhow::bail!("transient")
                    }
                    Ok(7u32)
                }
            },
        )
        .await;

        assert!(!outcome.used_fallback());
        assert_eq!(outcome.into_inner(), 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_deadline_cancels_slow_operation() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1), Duration::from_millis(50));
        let started = Instant::now();
        let outcome = call_with_retry("test_slow", &policy, || 0u32, || async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(1u32)
        })
        .await;

        assert!(outcome.used_fallback());
        // The deadline bounds the whole call, not each attempt.
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
