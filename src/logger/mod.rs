//! Logger module
//!
//! Provides logging utilities for the course service including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - Store mutation logging
//!
//! Everything is emitted through `tracing`; access lines use the `access`
//! target so they can be filtered separately (`RUST_LOG=access=off`).

mod format;
mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(&config.logging)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(%addr, "Course registry listening on http://{addr}");
    tracing::info!(
        level = %config.logging.level,
        access_log = config.logging.access_log,
        max_body_size = config.http.max_body_size,
        max_connections = ?config.performance.max_connections,
        "Configuration loaded"
    );
    if let Some(workers) = config.server.workers {
        tracing::info!(workers, "Worker threads configured");
    }
    if let Some(ref path) = config.logging.log_file {
        tracing::info!(path = %path, "Logging to file");
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_course_created(course_id: i64) {
    tracing::debug!(course_id, "Course created");
}

pub fn log_course_updated(path_id: i64, course_id: i64) {
    if path_id == course_id {
        tracing::debug!(course_id, "Course updated");
    } else {
        tracing::warn!(
            path_id,
            course_id,
            "Course updated with a different id than the one in the path"
        );
    }
}

pub fn log_course_deleted(course_id: i64) {
    tracing::debug!(course_id, "Course deleted");
}

pub fn log_shutdown(signal: &str) {
    tracing::info!(signal, "Shutdown requested, no longer accepting connections");
}
