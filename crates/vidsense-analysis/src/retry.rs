//! Bounded retry with exponential back-off and jitter.
//!
//! [`crate::Analyzer::with_retry`] wraps each whole flow in
//! [`retry_with_backoff`], which retries only failures reported as transient
//! by [`AnalysisError::is_transient`].

use std::future::Future;
use std::time::Duration;

use crate::error::AnalysisError;

const MAX_DELAY_MS: u64 = 60_000;

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// With `backoff_base_ms = 500` the sleeps before attempts 2, 3 and 4 are
/// roughly 500 ms, 1 s and 2 s, each ±25 % jitter, capped at 60 s.
/// Non-transient errors are returned immediately.
///
/// # Errors
///
/// Returns the last error once attempts are exhausted, or the first
/// non-transient error.
pub async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, AnalysisError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AnalysisError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let delay = backoff_delay(backoff_base_ms, attempt);
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "transient analysis error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

fn backoff_delay(backoff_base_ms: u64, attempt: u32) -> Duration {
    let computed = backoff_base_ms.saturating_mul(1u64 << (attempt.saturating_sub(1)).min(10));
    let capped = computed.min(MAX_DELAY_MS);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
    Duration::from_millis(delay_ms)
}
