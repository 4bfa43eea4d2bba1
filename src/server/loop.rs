// Server loop module
// Accepts connections until a shutdown signal arrives, then drains and returns

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::Config;
use crate::logger;

/// How long to wait for in-flight connections after the listener closes
const DRAIN_GRACE: Duration = Duration::from_secs(5);

/// Poll interval while waiting for the connection counter to reach zero
const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop until shutdown is requested.
///
/// Returning from here is the only way the process ends on its own; the
/// caller prints the farewell line and `main` returns 0.
pub async fn run(listener: TcpListener, cfg: Arc<Config>, signals: Arc<SignalHandler>) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        // A signal delivered between loop iterations lands here
        if signals.shutdown_requested.load(Ordering::SeqCst) {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &cfg, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting before draining; in-flight connections keep their sockets
    drop(listener);
    drain_connections(&active_connections).await;
}

/// Wait for active connections to finish, up to `DRAIN_GRACE`.
///
/// Connections still open at the deadline are abandoned; the process is
/// about to exit and their sockets close with it.
async fn drain_connections(active_connections: &Arc<AtomicUsize>) {
    let deadline = tokio::time::Instant::now() + DRAIN_GRACE;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            break;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {active} connections still open"
            ));
            break;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn drain_returns_immediately_with_no_connections() {
        let counter = Arc::new(AtomicUsize::new(0));
        let start = std::time::Instant::now();
        drain_connections(&counter).await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn drain_waits_for_counter_to_reach_zero() {
        let counter = Arc::new(AtomicUsize::new(1));

        let worker = Arc::clone(&counter);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            worker.fetch_sub(1, Ordering::SeqCst);
        });

        drain_connections(&counter).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
