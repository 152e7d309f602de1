//! Retry with exponential back-off and jitter for catalog downloads.
//!
//! Non-retriable errors (404, parse failures, non-CSV responses) are
//! propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::LoaderError;

/// Upper bound for a single back-off sleep.
const MAX_DELAY_MS: u64 = 30_000;

/// Returns `true` if `err` represents a transient condition that should be
/// retried after a backoff delay.
///
/// Retriable: HTTP 429, HTTP 5xx, and network timeouts or connection failures.
pub(crate) fn is_retriable(err: &LoaderError) -> bool {
    match err {
        LoaderError::RateLimited { .. } => true,
        LoaderError::UnexpectedStatus { status, .. } => *status >= 500,
        LoaderError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        LoaderError::Csv { .. }
        | LoaderError::NotFound { .. }
        | LoaderError::UnexpectedContent { .. }
        | LoaderError::MissingColumn { .. }
        | LoaderError::InvalidSource { .. }
        | LoaderError::Unsupported { .. }
        | LoaderError::Io { .. } => false,
    }
}

/// Executes `operation`, retrying up to `max_retries` additional times on
/// transient errors.
///
/// The sleep before retry `n` (1-based) is `backoff_base_ms * 2^(n-1)`,
/// capped at 30 s, scaled by a random factor in `[0.75, 1.25)`.
/// With `max_retries = 2` the operation runs at most 3 times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, LoaderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LoaderError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient catalog fetch error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
