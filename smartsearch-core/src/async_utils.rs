//! Async helpers shared by the client and the relay
//!
//! One deadline race and one bounded retry, so neither side wires up its
//! own timer/abort plumbing per call site.

use crate::error::{SearchError, SearchResult};
use std::future::Future;
use tokio::time::{sleep, timeout, Duration};
use tracing::{debug, warn};

/// Base delay between retry attempts; jittered per attempt
const RETRY_DELAY_MS: u64 = 200;

/// Race an operation against a deadline.
///
/// On expiry the raced future is dropped, which aborts any in-flight
/// transport it owns, and the caller observes a `Timeout` distinct from
/// other transport failures.
pub async fn with_timeout<F, T>(
    future: F,
    duration: Duration,
    operation: &str,
) -> SearchResult<T>
where
    F: Future<Output = SearchResult<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(SearchError::Timeout {
            operation: operation.to_string(),
            duration_ms: duration.as_millis() as u64,
        }),
    }
}

/// Run an operation, retrying transient transport failures.
///
/// Only errors for which [`SearchError::is_retryable`] holds are retried,
/// at most `max_retries` additional times. Timeouts and upstream failures
/// pass through on the first occurrence.
pub async fn retry_transient<T, F, Fut>(
    mut operation: F,
    max_retries: u32,
    operation_name: &str,
) -> SearchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = SearchResult<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        debug!(
            operation = operation_name,
            attempt = attempt,
            "attempting operation"
        );

        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(
                        operation = operation_name,
                        attempt = attempt,
                        "operation succeeded after retry"
                    );
                }
                return Ok(result);
            }
            Err(error) if error.is_retryable() && attempt <= max_retries => {
                let delay = jittered_delay(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "transient failure, retrying"
                );
                sleep(delay).await;
            }
            Err(error) => return Err(error),
        }
    }
}

fn jittered_delay(attempt: u32) -> Duration {
    let base = RETRY_DELAY_MS * attempt as u64;
    let jitter = (base as f64 * 0.1 * (fastrand::f64() - 0.5) * 2.0) as i64;
    Duration::from_millis((base as i64 + jitter).max(0) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn timeout_fires_and_is_tagged() {
        let result: SearchResult<()> = with_timeout(
            async {
                sleep(Duration::from_secs(5)).await;
                Ok(())
            },
            Duration::from_millis(20),
            "slow_operation",
        )
        .await;

        match result {
            Err(SearchError::Timeout { operation, .. }) => {
                assert_eq!(operation, "slow_operation");
            }
            other => panic!("expected timeout, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried_up_to_the_cap() {
        let calls = AtomicU32::new(0);

        let result: SearchResult<()> = retry_transient(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(SearchError::Transport {
                        message: "connection refused".to_string(),
                        source: None,
                    })
                }
            },
            2,
            "flaky_operation",
        )
        .await;

        assert!(matches!(result, Err(SearchError::Transport { .. })));
        // one initial attempt plus two retries
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn timeouts_are_never_retried() {
        let calls = AtomicU32::new(0);

        let result: SearchResult<()> = retry_transient(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async {
                    Err(SearchError::Timeout {
                        operation: "send_text".to_string(),
                        duration_ms: 100,
                    })
                }
            },
            2,
            "deadline_operation",
        )
        .await;

        assert!(matches!(result, Err(SearchError::Timeout { .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn success_after_one_transient_failure() {
        let calls = AtomicU32::new(0);

        let result = retry_transient(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(SearchError::Transport {
                            message: "connection reset".to_string(),
                            source: None,
                        })
                    } else {
                        Ok(42)
                    }
                }
            },
            1,
            "recovering_operation",
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
