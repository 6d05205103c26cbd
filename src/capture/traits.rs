//! Capture device abstraction
//!
//! Mirrors how a browser display-media session behaves: acquiring the device
//! may fail with a permission error, an acquired stream yields data chunks
//! periodically, and stopping must release the underlying handle.

use async_trait::async_trait;
use tokio::sync::watch;

use super::CaptureError;

/// Cloneable handle used to ask a running stream to stop. The stream keeps
/// yielding chunks that were produced before the signal fired and returns
/// `None` from `next_chunk` once drained.
#[derive(Clone)]
pub struct StopSignal {
    tx: watch::Sender<bool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolve once stop has been requested.
    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// An acquired capture session.
#[async_trait]
pub trait CaptureStream: Send {
    /// Next data chunk in capture order. Resolves to `None` once the stream
    /// was stopped and every chunk produced before the stop was drained.
    async fn next_chunk(&mut self) -> Option<Vec<u8>>;

    /// Stop handle for this stream, usable from another task.
    fn stop_signal(&self) -> StopSignal;

    /// Release the underlying device resources. Must be called exactly once,
    /// after the last chunk was drained.
    async fn release(&mut self);
}

/// Provider of the capture device (the injected external collaborator).
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Acquire a capture stream, waiting for the operator to grant
    /// permission. Fails with `PermissionDenied` or `DeviceUnavailable`.
    async fn acquire(&self) -> Result<Box<dyn CaptureStream>, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn stop_signal_wakes_waiters() {
        let signal = StopSignal::new();
        assert!(!signal.is_stopped());

        let waiter = signal.clone();
        let handle = tokio::spawn(async move {
            waiter.stopped().await;
        });

        tokio::time::sleep(Duration::from_millis(5)).await;
        signal.stop();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should wake after stop")
            .unwrap();
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn stopped_returns_immediately_when_already_stopped() {
        let signal = StopSignal::new();
        signal.stop();
        signal.stopped().await;
    }
}
