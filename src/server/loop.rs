// Server accept loop
// Accepts connections until the shutdown signal fires

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop until `shutdown` is notified.
///
/// Accept errors are logged and the loop continues; individual
/// connections are served on their own tasks and keep running after
/// the loop stops accepting.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<Notify>,
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

            () = shutdown.notified() => {
                logger::log_shutdown(active_connections.load(Ordering::SeqCst));
                break;
            }
        }
    }
}
