// Application state
// Immutable shared state handed to every connection task

use super::types::Config;

/// Application state shared across connection tasks.
///
/// The greeting server has no mutable runtime state; this wraps the
/// loaded configuration so handlers and the connection layer read one
/// `Arc` instead of cloning config sections around.
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}
