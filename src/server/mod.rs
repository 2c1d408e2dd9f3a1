// Server module entry point
// Listener creation, accept loop, connection handling, signal handling

pub mod connection;
pub mod listener;
pub mod signal;

// Rust does not allow `loop` as a module name (keyword), so the module
// is exposed as server_loop
#[path = "loop.rs"]
pub mod server_loop;

// Re-export commonly used items
pub use listener::create_reusable_listener;
pub use server_loop::start_server_loop;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::logger;

/// Bind the configured address and serve until a shutdown signal.
pub async fn run(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = create_reusable_listener(addr)?;

    logger::init(&cfg)?;
    logger::log_server_start(&addr, &cfg);

    let signals = Arc::new(signal::SignalHandler::new());
    signal::start_signal_handler(Arc::clone(&signals));

    let state = Arc::new(AppState::new(cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    start_server_loop(
        listener,
        state,
        active_connections,
        Arc::clone(&signals.shutdown),
    )
    .await;

    Ok(())
}
