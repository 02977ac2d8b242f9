//! Backoff policies and the retry executor for blocking reads
//!
//! Provides the backoff abstraction consumed by the queue service's blocking
//! `search` operation, plus a retry executor that sleeps between attempts.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Strategy deciding whether, and after which delay, a failed attempt is
/// retried.
///
/// Implementations are stateful: each call to `next_backoff` consumes one
/// retry from the policy's budget. `None` means stop retrying and surface
/// the last error to the caller.
pub trait BackoffPolicy: Send {
    /// Delay to wait before the next attempt, or `None` to stop.
    fn next_backoff(&mut self) -> Option<Duration>;

    /// Reset the policy to its initial state.
    fn reset(&mut self);
}

/// Factory producing a fresh policy per retried operation.
///
/// Services hold a factory rather than a policy because each blocking read
/// needs its own retry budget.
pub type BackoffFactory = Arc<dyn Fn() -> Box<dyn BackoffPolicy> + Send + Sync>;

/// Policy that never retries: the first failure is surfaced immediately.
///
/// Turns the blocking read into a single non-blocking attempt.
#[derive(Debug, Clone, Default)]
pub struct StopBackoff;

impl BackoffPolicy for StopBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        None
    }

    fn reset(&mut self) {}
}

/// Policy retrying a bounded number of times with a constant delay.
#[derive(Debug, Clone)]
pub struct ConstantBackoff {
    pub delay: Duration,
    pub max_retries: usize,
    retries: usize,
}

impl ConstantBackoff {
    pub fn new(delay: Duration, max_retries: usize) -> Self {
        Self {
            delay,
            max_retries,
            retries: 0,
        }
    }
}

impl Default for ConstantBackoff {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), 3)
    }
}

impl BackoffPolicy for ConstantBackoff {
    fn next_backoff(&mut self) -> Option<Duration> {
        if self.retries >= self.max_retries {
            return None;
        }
        self.retries += 1;
        Some(self.delay)
    }

    fn reset(&mut self) {
        self.retries = 0;
    }
}

/// Execute an operation under a backoff policy.
///
/// The operation runs at least once. On failure the policy is asked for the
/// next delay; `None` surfaces the last error. Suspension happens only
/// between attempts, so a `StopBackoff` policy makes this a plain
/// synchronous call.
pub async fn retry_backoff<T, E, F>(
    operation_name: &str,
    policy: &mut dyn BackoffPolicy,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Result<T, E>,
    E: std::fmt::Display,
{
    policy.reset();

    let mut attempt = 1usize;
    loop {
        match operation() {
            Ok(result) => return Ok(result),
            Err(error) => match policy.next_backoff() {
                Some(delay) => {
                    log::debug!(
                        "Operation '{}' failed on attempt {}, retrying in {:?}: {}",
                        operation_name,
                        attempt,
                        delay,
                        error
                    );
                    attempt += 1;
                    sleep(delay).await;
                }
                None => return Err(error),
            },
        }
    }
}
