//! Log writer module
//!
//! Routes the access log to stdout or a file and the error log to stderr or
//! a file. Sinks are fixed at startup.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Where a log stream ends up
enum LogSink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

/// Thread-safe log writer with separate access and error sinks
pub struct LogWriter {
    access: LogSink,
    error: LogSink,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: sink_for(access_log_file, LogSink::Stdout)?,
            error: sink_for(error_log_file, LogSink::Stderr)?,
        })
    }

    /// Write to the access/info sink
    pub fn write_access(&self, message: &str) {
        write_to_sink(&self.access, message);
    }

    /// Write to the error sink
    pub fn write_error(&self, message: &str) {
        write_to_sink(&self.error, message);
    }
}

fn sink_for(path: Option<&str>, fallback: LogSink) -> io::Result<LogSink> {
    match path {
        Some(p) => Ok(LogSink::File(Mutex::new(open_log_file(p)?))),
        None => Ok(fallback),
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_to_sink(sink: &LogSink, message: &str) {
    match sink {
        LogSink::Stdout => {
            println!("{message}");
        }
        LogSink::Stderr => {
            eprintln!("{message}");
        }
        LogSink::File(file) => {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{message}");
            }
        }
    }
}

/// Initialize the global log writer
///
/// Called once at application startup, before the banner.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer
///
/// Panics if `init()` has not been called; callers guard with
/// `is_initialized()`.
pub fn get() -> &'static LogWriter {
    LOG_WRITER
        .get()
        .expect("Log writer not initialized. Call logger::init() first.")
}

/// Check if the log writer has been initialized
pub fn is_initialized() -> bool {
    LOG_WRITER.get().is_some()
}
