// Connection handling module
// Accepts a TCP connection and serves HTTP/1.1 on a spawned task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::handler;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    cfg: &Arc<Config>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment first, then check, so concurrent accepts cannot slip past the limit
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = cfg.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if cfg.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(cfg), Arc::clone(conn_counter));
}

/// Serve one connection on a spawned task.
///
/// Wraps the stream for hyper, applies keep-alive and timeout settings from
/// the performance config, and decrements the connection counter when the
/// connection closes.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    cfg: Arc<Config>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            cfg.performance.read_timeout,
            cfg.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(cfg.performance.keep_alive_timeout > 0);

        let service_cfg = Arc::clone(&cfg);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let cfg = Arc::clone(&service_cfg);
                async move { handler::handle_request(req, cfg, peer_addr).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
