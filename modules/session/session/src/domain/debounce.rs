//! Last-call-wins quiet window.

use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

/// Coalesces rapid repeated invocations of one operation.
///
/// Every call to [`Debouncer::settle`] cancels the wait of the previous call
/// and starts its own. Only a call that survives the whole window proceeds.
pub struct Debouncer {
    window: Duration,
    pending: Mutex<Option<CancellationToken>>,
}

impl Debouncer {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: Mutex::new(None),
        }
    }

    /// Cancel the wait of the pending call without starting a new one.
    pub fn preempt(&self) {
        if let Some(previous) = self.pending.lock().take() {
            previous.cancel();
        }
    }

    /// Wait out the quiet window.
    ///
    /// Returns `false` when a later call superseded this one before the
    /// window elapsed.
    pub async fn settle(&self) -> bool {
        let token = CancellationToken::new();
        let previous = self.pending.lock().replace(token.clone());
        if let Some(previous) = previous {
            previous.cancel();
        }

        tokio::select! {
            () = token.cancelled() => false,
            () = tokio::time::sleep(self.window) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn single_call_proceeds_after_window() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let started = tokio::time::Instant::now();

        assert!(debouncer.settle().await);
        assert!(started.elapsed() >= Duration::from_millis(10));
    }

    #[tokio::test(start_paused = true)]
    async fn later_call_wins() {
        let debouncer = Debouncer::new(Duration::from_millis(10));

        let (first, second) = tokio::join!(debouncer.settle(), debouncer.settle());

        assert!(!first);
        assert!(second);
    }

    #[tokio::test(start_paused = true)]
    async fn preempt_cancels_pending_call() {
        let debouncer = Debouncer::new(Duration::from_millis(10));

        let (settled, ()) = tokio::join!(debouncer.settle(), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            debouncer.preempt();
        });

        assert!(!settled);
        assert!(debouncer.settle().await);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_outside_the_window_both_proceed() {
        let debouncer = Debouncer::new(Duration::from_millis(10));

        assert!(debouncer.settle().await);
        assert!(debouncer.settle().await);
    }
}
