//! Observable timer state handed to the presentation layer

use serde::{Deserialize, Serialize};

use super::{Configuration, Phase};

/// Point-in-time view of the timer, with the remaining time already split
/// for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub running: bool,
    pub remaining_seconds: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// `MM:SS`, zero padded
    pub display: String,
    pub work_seconds: u64,
    pub rest_seconds: u64,
}

impl TimerSnapshot {
    pub fn new(phase: Phase, remaining_seconds: u64, running: bool, config: Configuration) -> Self {
        let minutes = remaining_seconds / 60;
        let seconds = remaining_seconds % 60;
        Self {
            phase,
            running,
            remaining_seconds,
            minutes,
            seconds,
            display: format!("{:02}:{:02}", minutes, seconds),
            work_seconds: config.work_seconds(),
            rest_seconds: config.rest_seconds(),
        }
    }

    /// Status word used by API responses
    pub fn status(&self) -> &'static str {
        if self.running {
            "running"
        } else {
            "paused"
        }
    }
}
