//! Log writer module
//!
//! Installs the global `tracing` subscriber: level filter, text or JSON
//! formatting, and output to stderr or an append-mode log file.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Returns an error
/// if the log file cannot be opened or a subscriber is already installed.
pub fn init(logging: &LoggingConfig) -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let to_file = logging.log_file.is_some();
    let writer = match logging.log_file.as_deref() {
        Some(path) => BoxMakeWriter::new(Mutex::new(open_log_file(path)?)),
        None => BoxMakeWriter::new(io::stderr),
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .try_init(),
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(!to_file)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}
