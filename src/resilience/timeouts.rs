//! Timeout enforcement.
//!
//! Every attempt runs under its own deadline. When the deadline fires the
//! attempt future is dropped, which closes its connection; nothing keeps
//! running in the background.

use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Per-attempt deadline at the gateway entry point.
pub const GATEWAY_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Per-attempt deadline for in-process page data fetching.
pub const PAGE_FETCH_ATTEMPT_TIMEOUT: Duration = Duration::from_millis(3_500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {0:?} exceeded")]
pub struct DeadlineExceeded(pub Duration);

/// Run `fut` to completion or drop it once `limit` elapses.
pub async fn with_deadline<F>(limit: Duration, fut: F) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| DeadlineExceeded(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_drops_inner_future() {
        let dropped = Arc::new(AtomicBool::new(false));
        let guard = DropFlag(dropped.clone());

        let result = with_deadline(GATEWAY_ATTEMPT_TIMEOUT, async move {
            let _guard = guard;
            tokio::time::sleep(Duration::from_secs(20)).await;
        })
        .await;

        assert_eq!(result, Err(DeadlineExceeded(GATEWAY_ATTEMPT_TIMEOUT)));
        assert!(dropped.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fast_future_completes() {
        let result = with_deadline(PAGE_FETCH_ATTEMPT_TIMEOUT, async { 7 }).await;
        assert_eq!(result, Ok(7));
    }
}
