//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod tick_source;
pub mod announcer;

// Re-export main functions
pub use tick_source::tick_source_task;
pub use announcer::{announce_events, announcer_task};
