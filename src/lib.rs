//! Minimal Pomodoro - A work/rest phase timer served over HTTP
//!
//! This library provides the phase timer state machine, a tick source that
//! drives it once per second, and an HTTP surface for controlling and
//! observing it.

pub mod config;
pub mod error;
pub mod presets;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, TimerError};
pub use presets::Preset;
pub use state::{AppState, Configuration, Phase, PhaseTimer, TimerEvent, TimerSnapshot};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
