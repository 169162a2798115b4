// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Shutdown coordination between the signal task and the accept loop
#[derive(Debug, Default)]
pub struct SignalHandler {
    /// Notified once when shutdown is requested
    pub shutdown: Notify,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown; the permit is stored if nobody is waiting yet
    pub fn trigger_shutdown(&self) {
        self.shutdown.notify_one();
    }
}

/// Start signal handlers (Unix)
///
/// Handlers are registered before this returns, so a registration failure is an
/// error for the caller rather than a panic inside the spawned task.
///
/// | Signal  | Action        |
/// |---------|---------------|
/// | SIGTERM | Graceful stop |
/// | SIGINT  | Graceful stop |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tracing::debug!(pid = std::process::id(), "Signal handlers registered");

    tokio::spawn(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        tracing::info!(signal = name, "Initiating graceful shutdown");
        handler.trigger_shutdown();
    });
    Ok(())
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("Ctrl+C received, initiating graceful shutdown");
            handler.trigger_shutdown();
        }
    });
    Ok(())
}
