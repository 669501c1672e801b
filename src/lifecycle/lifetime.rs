//! Application lifetime notifications.
//!
//! # States
//! ```text
//! created → started → stopping → stopped
//! ```
//! Each notification is one-shot: once signalled it stays signalled.
//!
//! # Design Decisions
//! - Backed by `CancellationToken`s, so signalling is idempotent and
//!   thread-safe, and waiting is a plain future
//! - Clones share state; the host registers one clone as a service and the
//!   run coordinator resolves it from there

use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// One-shot lifecycle notifications for an application.
#[derive(Debug, Clone, Default)]
pub struct ApplicationLifetime {
    started: CancellationToken,
    stopping: CancellationToken,
    stopped: CancellationToken,
}

impl ApplicationLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the application stops.
    ///
    /// Safe to call from any thread, any number of times; only the first call
    /// has an effect.
    pub fn request_stop(&self) {
        if !self.stopping.is_cancelled() {
            tracing::debug!("Application stop requested");
        }
        self.stopping.cancel();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stopping.is_cancelled()
    }

    /// Completes once a stop has been requested.
    pub fn stopping(&self) -> WaitForCancellationFuture<'_> {
        self.stopping.cancelled()
    }

    /// A token cancelled when a stop is requested.
    ///
    /// Cancelling the returned token does not request a stop.
    pub fn stopping_token(&self) -> CancellationToken {
        self.stopping.child_token()
    }

    pub fn notify_started(&self) {
        self.started.cancel();
    }

    pub fn is_started(&self) -> bool {
        self.started.is_cancelled()
    }

    /// Completes once the application has started.
    pub fn started(&self) -> WaitForCancellationFuture<'_> {
        self.started.cancelled()
    }

    pub fn notify_stopped(&self) {
        self.stopped.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.is_cancelled()
    }

    /// Completes once the application has stopped.
    pub fn stopped(&self) -> WaitForCancellationFuture<'_> {
        self.stopped.cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::time::Duration;

    #[test]
    fn test_request_stop_is_idempotent() {
        let lifetime = ApplicationLifetime::new();
        assert!(!lifetime.is_stop_requested());

        lifetime.request_stop();
        lifetime.request_stop();
        assert!(lifetime.is_stop_requested());
        assert!(!lifetime.is_stopped());
    }

    #[test]
    fn test_clones_share_state() {
        let lifetime = ApplicationLifetime::new();
        let clone = lifetime.clone();
        clone.notify_started();
        clone.request_stop();
        assert!(lifetime.is_started());
        assert!(lifetime.is_stop_requested());
    }

    #[test]
    fn test_stopping_token_is_observer_only() {
        let lifetime = ApplicationLifetime::new();
        let token = lifetime.stopping_token();
        token.cancel();
        assert!(!lifetime.is_stop_requested());

        let token = lifetime.stopping_token();
        lifetime.request_stop();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_started_and_stopped_futures_complete_on_notify() {
        let lifetime = ApplicationLifetime::new();
        let observer = lifetime.clone();
        let waiter = tokio::spawn(async move {
            observer.started().await;
            observer.stopped().await;
        });

        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        lifetime.notify_started();
        lifetime.notify_stopped();
        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("lifetime waiter never completed")
            .unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_requests_wake_single_waiter() {
        let lifetime = ApplicationLifetime::new();
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lifetime = lifetime.clone();
                let barrier = barrier.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    lifetime.request_stop();
                })
            })
            .collect();

        tokio::time::timeout(Duration::from_secs(5), lifetime.stopping())
            .await
            .expect("stop was never signalled");

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(lifetime.is_stop_requested());
    }
}
