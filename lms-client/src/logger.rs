//! Logging Infrastructure
//!
//! `tracing` subscriber setup for binaries and demos embedding the client.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`, stdout only
pub fn init_logger() {
    init_logger_with_file(None, None);
}

/// Initialize the logger with optional daily-rolling file output
///
/// `RUST_LOG` wins over `log_level` when set. A missing `log_dir` falls back
/// to stdout. Calling this twice is harmless.
pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, "lms-client");
            let _ = subscriber.with_ansi(false).with_writer(file_appender).try_init();
            return;
        }
        eprintln!("log directory {dir} does not exist, logging to stdout");
    }

    let _ = subscriber.try_init();
}
