// Server loop module
// Accepts connections until shutdown, then drains in-flight connections

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// How long in-flight connections get to finish after shutdown
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(5);

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the accept loop until shutdown is requested
///
/// Returns once the listener is closed and in-flight connections have
/// finished or the grace period has elapsed.
pub async fn run_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = signals.shutdown.notified() => break,
        }
    }

    // Stop accepting before waiting on in-flight work
    drop(listener);
    drain_connections(&active_connections, SHUTDOWN_GRACE_PERIOD).await;
}

/// Wait until the active connection count reaches zero or the deadline passes
async fn drain_connections(active_connections: &AtomicUsize, grace_period: Duration) {
    let deadline = tokio::time::Instant::now() + grace_period;

    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 {
            tracing::info!("All connections closed");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Grace period elapsed with {remaining} connection(s) still open"
            ));
            return;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
