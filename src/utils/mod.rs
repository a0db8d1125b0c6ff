//! Process-level helpers
//!
//! Currently only shutdown signal handling for the server loop.

pub mod signals;

pub use signals::shutdown_signal;
