//! State management module
//!
//! This module contains the phase timer and the shared application state
//! that serializes access to it.

pub mod phase_timer;
pub mod snapshot;
pub mod app_state;

// Re-export main types
pub use phase_timer::{Configuration, Phase, PhaseTimer, TimerEvent};
pub use snapshot::TimerSnapshot;
pub use app_state::AppState;
