//! Request handler module
//!
//! Routing dispatch for the greeting server. There is exactly one
//! route; everything else is a 404.

pub mod router;

// Re-export main entry point
pub use router::{handle_request, GREETING};
