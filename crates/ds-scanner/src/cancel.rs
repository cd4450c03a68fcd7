//! Cooperative cancellation for a running scan.

use tokio_util::sync::CancellationToken;

/// Stop signal shared between the caller and the scan worker.
///
/// Set at most once; the walker polls it at the top of every directory
/// level and before every file and subdirectory. Clones observe the same
/// signal.
///
/// # Examples
///
/// ```
/// use ds_scanner::CancellationHandle;
///
/// let handle = CancellationHandle::new();
/// let worker_view = handle.clone();
/// assert!(!worker_view.is_cancelled());
///
/// handle.cancel();
/// handle.cancel(); // no-op
/// assert!(worker_view.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationHandle {
    token: CancellationToken,
}

impl CancellationHandle {
    /// Creates an unset handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent, and harmless after the scan finished.
    #[inline]
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called on any clone.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves when the handle is cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let a = CancellationHandle::new();
        let b = a.clone();
        b.cancel();
        assert!(a.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves() {
        let handle = CancellationHandle::new();
        let waiter = handle.clone();
        let task = tokio::spawn(async move { waiter.cancelled().await });
        handle.cancel();
        task.await.unwrap();
    }
}
