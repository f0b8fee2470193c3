//! Generic retry helper.
//!
//! Fixed-attempt, fixed-delay retry for provider calls. The delete lifecycle
//! operation wraps its provider call in [`retry_on_failure`]; everything else
//! runs single-shot.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::GcpError;

/// Run `op` up to `attempts` times, sleeping `delay` between failures.
///
/// Returns the first success, or the last error once attempts are exhausted.
/// Each failure is logged with `label` so retried operations are visible in
/// the engine's logs.
pub async fn retry_on_failure<T, F, Fut>(
    label: &str,
    attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, GcpError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, GcpError>>,
{
    debug_assert!(attempts > 0);
    let mut last_err = GcpError::Internal(format!("{label}: no attempts made"));
    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(%label, attempt, max = attempts, error = %e, "attempt failed");
                last_err = e;
            }
        }
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }
    Err(last_err)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test]
    async fn returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = retry_on_failure("noop", 3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, GcpError>(42) }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = retry_on_failure("flaky", 5, Duration::from_millis(1), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(GcpError::Transport("connection reset".into()))
                } else {
                    Ok("done")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausted_attempts_return_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = retry_on_failure("doomed", 3, Duration::from_millis(1), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(GcpError::Transport("still down".into())) }
        })
        .await;
        assert!(matches!(result, Err(GcpError::Transport(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
