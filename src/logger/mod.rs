//! Logger module
//!
//! Console and file logging for the server:
//! - Startup banner and farewell line
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;
mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Startup banner: reachable URLs, served directory, and the feature list.
/// Printed once the listener is bound, before the accept loop blocks.
pub fn log_server_start(config: &Config) {
    let port = config.server.port;

    write_info("======================================");
    write_info("freshserve is running at:");
    if config.server.host == "0.0.0.0" || config.server.host == "127.0.0.1" {
        write_info(&format!("   http://localhost:{port}"));
        write_info(&format!("   http://127.0.0.1:{port}"));
    } else {
        write_info(&format!("   http://{}:{port}", config.server.host));
    }
    write_info("");
    write_info(&format!("Serving directory: {}", config.site.root));
    write_info("");
    write_info("Features:");
    write_info("   - Cache-disabled responses (Cache-Control / Pragma / Expires)");
    write_info("   - GET and HEAD static file serving");
    write_info("   - Path traversal protection");
    write_info("   - Graceful Ctrl+C shutdown");
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("");
    write_info("Press Ctrl+C to stop the server");
    write_info("======================================\n");
}

/// Farewell line, printed after the accept loop has drained and stopped
pub fn log_server_stop() {
    write_info("\nServer stopped. Thanks for using freshserve!");
}

pub fn log_shutdown_signal(name: &str) {
    write_info(&format!("\n[Signal] {name} received, shutting down..."));
}

pub fn log_connection_accepted(peer_addr: &std::net::SocketAddr) {
    write_info(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    if writer::is_initialized() {
        writer::get().write_access(&entry.format(format));
    } else {
        println!("{}", entry.format(format));
    }
}
