use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::{signal, sync::Notify};
use tracing::{info, warn};

/// Cancellation signal shared by every loop bound to the same host context.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Resolves once `stop` has been called, immediately if it already was.
    pub async fn wait(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent `stop` is not lost.
        notified.as_mut().enable();
        if self.is_stopped() {
            return;
        }
        notified.await;
    }

    /// Sleep for `interval` unless stopped first.
    ///
    /// Returns `true` when the full interval elapsed and the flag is still
    /// clear, `false` when the caller should stop.
    pub async fn sleep(&self, interval: Duration) -> bool {
        tokio::select! {
            _ = tokio::time::sleep(interval) => !self.is_stopped(),
            _ = self.wait() => false,
        }
    }
}

pub fn register_signal_handler(stop_flag: &StopFlag) {
    {
        let stop_flag = stop_flag.clone();
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping resource monitor...");
                    stop_flag.stop();
                }
                Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
            }
        });
    }
    #[cfg(unix)]
    {
        let stop_flag = stop_flag.clone();

        tokio::spawn(async move {
            match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(mut terminate) => {
                    terminate.recv().await;
                    info!("Terminate signal received, stopping resource monitor...");
                    stop_flag.stop();
                }
                Err(e) => warn!("Failed to install terminate signal handler: {}", e),
            }
        });
    }
}
