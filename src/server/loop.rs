// Server loop module
// Accepts connections until shutdown is requested

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;

/// Run the accept loop until `signals` requests shutdown
///
/// In-flight connections keep running on their own tasks after this returns.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => tracing::error!(error = %e, "Failed to accept connection"),
                }
            }

            _ = signals.shutdown.notified() => {
                tracing::info!("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
}
