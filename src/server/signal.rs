// Signal handling
//
// Supported signals:
// - SIGTERM: graceful shutdown
// - SIGINT:  graceful shutdown (Ctrl+C)

use std::sync::Arc;
use tokio::sync::Notify;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Arc<Notify>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start the signal handler task (Unix).
///
/// Listens for SIGTERM and SIGINT and notifies the accept loop to stop.
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                println!("\n[SIGNAL] SIGTERM received, initiating graceful shutdown");
            }
            _ = sigint.recv() => {
                println!("\n[SIGNAL] SIGINT received, initiating graceful shutdown");
            }
        }

        // notify_one stores a permit, so the accept loop sees the
        // shutdown even if it was mid-accept when the signal fired
        handler.shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            println!("\n[SIGNAL] Ctrl+C received, initiating graceful shutdown");
            handler.shutdown.notify_one();
        }
    });
}
