// src/timelapse/stop.rs
//! Cancellation for a playback run

use crate::error::{Result, TimelapseError};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;

/// Shared stop flag. Clones observe the same signal; once stopped it stays
/// stopped.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    /// Request every holder of this signal to stop.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        let mut rx = self.rx.clone();
        // The sender lives as long as `self`, so this only returns on stop.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }

    /// Sleep for `delay`, or fail with `SuspensionAborted` if stopped first.
    pub async fn sleep(&self, delay: Duration) -> Result<()> {
        if self.is_stopped() {
            return Err(TimelapseError::SuspensionAborted);
        }

        tokio::select! {
            biased;
            _ = self.stopped() => Err(TimelapseError::SuspensionAborted),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    /// Fire this signal on Ctrl+C.
    pub fn stop_on_ctrl_c(&self) {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Ctrl+C received, stopping playback");
                signal.stop();
            }
        });
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_sleep_completes() {
        let signal = StopSignal::new();
        let start = Instant::now();
        signal.sleep(Duration::from_secs(3)).await.unwrap();
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sleep_interrupted() {
        let signal = StopSignal::new();
        let remote = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            remote.stop();
        });

        let start = Instant::now();
        let result = signal.sleep(Duration::from_secs(60)).await;
        assert!(matches!(result, Err(TimelapseError::SuspensionAborted)));
        assert!(start.elapsed() < Duration::from_secs(60));
        assert!(signal.is_stopped());
    }

    #[tokio::test]
    async fn test_already_stopped() {
        let signal = StopSignal::new();
        signal.stop();
        let result = signal.sleep(Duration::from_secs(60)).await;
        assert!(matches!(result, Err(TimelapseError::SuspensionAborted)));
    }
}
