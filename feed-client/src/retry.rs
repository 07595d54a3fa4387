//! Cancellation-aware retry loop.
//!
//! Runs an async operation up to [`RetryPolicy::max_attempts`] times,
//! sleeping `base_delay * 2^attempt` between failures. A cancellation,
//! whether reported by the operation or observed on the token, ends the
//! loop at once and consumes no further attempts.

use std::fmt::Display;
use std::future::Future;

use feed_core::RetryPolicy;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Errors that can tell a cancellation apart from a failure.
pub trait Retryable {
    /// Whether this error means the operation was cancelled.
    fn is_cancellation(&self) -> bool;

    /// The error to report when the token fires between attempts.
    fn cancellation() -> Self;
}

/// Run `op` with exponential backoff.
///
/// `op` receives the zero-based attempt number. The final error is
/// returned unchanged once attempts are exhausted.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> Result<T, E>
where
    E: Retryable + Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        if cancel.is_cancelled() {
            return Err(E::cancellation());
        }

        let error = match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if error.is_cancellation() {
            debug!(attempt, "attempt cancelled");
            return Err(error);
        }

        if !policy.should_retry(attempt) {
            warn!(attempts = attempt + 1, error = %error, "giving up");
            return Err(error);
        }

        let delay = policy.delay_after(attempt);
        debug!(attempt, ?delay, error = %error, "attempt failed, backing off");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(E::cancellation()),
            _ = tokio::time::sleep(delay) => {}
        }

        attempt += 1;
    }
}
