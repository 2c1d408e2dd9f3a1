//! HTTP protocol layer
//!
//! Response building, decoupled from routing and connection handling.

pub mod response;

// Re-export commonly used builders
pub use response::{build_404_response, build_greeting_response};
