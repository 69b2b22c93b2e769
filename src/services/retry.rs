use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::warn;

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_DELAY_SECS: u64 = 2;

/// Bounded, fixed-delay retry: no exponential backoff, no jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_DELAY_SECS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

#[derive(Debug)]
pub enum RetryError<E> {
    /// The operation failed with an error the predicate refused to retry.
    Aborted(E),
    Exhausted { attempts: u32, last: E },
}

/// Runs `operation` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` attempts have been made. Attempts are strictly
/// sequential and `policy.delay` is awaited between them.
///
/// The operation receives the 1-based attempt number.
pub async fn retry_with<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    should_retry: P,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if !should_retry(&err) => return Err(RetryError::Aborted(err)),
            Err(err) if attempt >= max_attempts => {
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: err,
                })
            }
            Err(err) => {
                warn!(
                    "Attempt {}/{} failed: {}. Retrying in {:?}",
                    attempt, max_attempts, err, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use tokio::time::Instant;

    #[test]
    fn default_policy_is_three_attempts_two_seconds_apart() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay, Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_third_attempt_after_fixed_delays() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let result = retry_with(&RetryPolicy::default(), |_: &String| true, |attempt| {
            calls.set(calls.get() + 1);
            async move {
                if attempt < 3 {
                    Err(format!("attempt {} failed", attempt))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.get(), 3);
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_secs(4), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(5), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_and_keeps_last_error() {
        let calls = Cell::new(0);

        let result: Result<(), _> =
            retry_with(&RetryPolicy::default(), |_: &String| true, |attempt| {
                calls.set(calls.get() + 1);
                async move { Err(format!("failure {}", attempt)) }
            })
            .await;

        match result {
            Err(RetryError::Exhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(last, "failure 3");
            }
            other => panic!("expected exhausted retries, got {:?}", other),
        }
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_error_stops_immediately() {
        let calls = Cell::new(0);
        let started = Instant::now();

        let result: Result<(), _> = retry_with(
            &RetryPolicy::default(),
            |err: &String| err != "fatal",
            |_| {
                calls.set(calls.get() + 1);
                async { Err("fatal".to_string()) }
            },
        )
        .await;

        assert!(matches!(result, Err(RetryError::Aborted(ref e)) if e == "fatal"));
        assert_eq!(calls.get(), 1);
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_attempt_policy_still_runs_once() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(0, Duration::from_millis(10));

        let result: Result<(), _> = retry_with(&policy, |_: &String| true, |_| {
            calls.set(calls.get() + 1);
            async { Err("nope".to_string()) }
        })
        .await;

        assert!(matches!(result, Err(RetryError::Exhausted { attempts: 1, .. })));
        assert_eq!(calls.get(), 1);
    }
}
