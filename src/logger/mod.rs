//! Logger module
//!
//! Logging for the greeting server:
//! - Server lifecycle logging (start banner, shutdown)
//! - Access logging with multiple formats
//! - Error and warning logging
//! - Optional file targets for access and error logs

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger from configuration.
///
/// Should be called once at application startup, before the listener
/// starts accepting.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to the info/access target (stdout until `init` runs).
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to the error target (stderr until `init` runs).
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Daily App server started");
    write_info(&format!("Listening on: http://{addr}"));
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
    write_info("======================================\n");
}

pub fn log_shutdown(active_connections: usize) {
    write_info("\n[Shutdown] Stopped accepting connections");
    if active_connections > 0 {
        write_info(&format!(
            "[Shutdown] {active_connections} connection(s) still in flight, finishing in background"
        ));
    }
    write_info("[Shutdown] Bye");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
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

/// Write one formatted access-log line.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
