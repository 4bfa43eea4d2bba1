// Signal handling module
//
// SIGINT (Ctrl+C) and SIGTERM both trigger a graceful shutdown: the accept
// loop stops, active connections drain, the farewell line prints, and the
// process exits with code 0.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Signal handler state
pub struct SignalHandler {
    /// Notified once when shutdown is requested
    pub shutdown: Arc<Notify>,
    /// Set before `shutdown` is notified; the accept loop also polls this
    pub shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }

    fn request_shutdown(&self) {
        self.shutdown_requested.store(true, Ordering::SeqCst);
        self.shutdown.notify_waiters();
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the signal listener task (Unix)
///
/// SIGINT and SIGTERM are treated identically; there is no reload signal.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_shutdown_signal("SIGTERM"),
            _ = sigint.recv() => logger::log_shutdown_signal("SIGINT (Ctrl+C)"),
        }

        handler.request_shutdown();
    });
}

/// Non-Unix fallback: only Ctrl+C is handled
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            logger::log_shutdown_signal("Ctrl+C");
            handler.request_shutdown();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_without_shutdown_requested() {
        let handler = SignalHandler::new();
        assert!(!handler.shutdown_requested.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn request_shutdown_wakes_a_waiter() {
        let handler = Arc::new(SignalHandler::new());

        let waiter = Arc::clone(&handler);
        let wait = tokio::spawn(async move {
            waiter.shutdown.notified().await;
        });

        // Give the waiter a chance to register before notifying
        tokio::task::yield_now().await;
        handler.request_shutdown();

        tokio::time::timeout(std::time::Duration::from_secs(1), wait)
            .await
            .expect("waiter was not woken")
            .unwrap();
        assert!(handler.shutdown_requested.load(Ordering::SeqCst));
    }
}
