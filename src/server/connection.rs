// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;

/// Accept and process a connection, enforcing `max_connections`.
///
/// Returns `false` when the connection was rejected.
pub fn accept_connection(stream: TcpStream, peer_addr: SocketAddr, state: &Arc<AppState>) -> bool {
    if !try_acquire_slot(state) {
        tracing::warn!(
            peer = %peer_addr,
            max = ?state.config.performance.max_connections,
            "Max connections reached, connection rejected"
        );
        drop(stream);
        return false;
    }

    tracing::trace!(peer = %peer_addr, "Connection accepted");
    handle_connection(stream, peer_addr, Arc::clone(state));
    true
}

/// Count a new connection against the limit
///
/// Increment first, then check, so two racing accepts cannot both slip under it.
fn try_acquire_slot(state: &AppState) -> bool {
    let prev_count = state.active_connections.fetch_add(1, Ordering::SeqCst);
    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= max_conn {
            state.active_connections.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
    }
    true
}

/// Serve a connection in a spawned task.
///
/// HTTP/1.1 keep-alive: a connection that has not sent the next request's
/// headers within `keep_alive_timeout` is closed. The whole connection is
/// bounded by the larger of the read and write timeouts. The connection slot is
/// released when the task ends.
fn handle_connection(stream: TcpStream, peer_addr: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let perf = &state.config.performance;
        let timeout_duration = Duration::from_secs(perf.read_timeout.max(perf.write_timeout));

        let mut builder = http1::Builder::new();
        builder.keep_alive(perf.keep_alive_timeout > 0);
        if perf.keep_alive_timeout > 0 {
            // Covers the idle wait for the next request's headers
            builder
                .timer(TokioTimer::new())
                .header_read_timeout(Duration::from_secs(perf.keep_alive_timeout));
        }

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(peer = %peer_addr, error = %err, "Connection error"),
            Err(_) => tracing::warn!(
                peer = %peer_addr,
                seconds = timeout_duration.as_secs(),
                "Connection timeout"
            ),
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
