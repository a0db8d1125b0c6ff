//! Work/rest phase timer
//!
//! The timer is a plain state machine with no internal clock. The caller
//! delivers one `tick()` per second while it is running.
//!
//! ```text
//! (Paused, Work) <-> (Running, Work)
//!       |                  | remaining hits 0
//! (Paused, Rest) <-> (Running, Rest)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TimerSnapshot;
use crate::error::TimerError;

/// Which half of the cycle is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Rest,
}

impl Phase {
    /// The phase that follows this one
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Rest,
            Phase::Rest => Phase::Work,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Work and rest durations in whole seconds, both at least one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Configuration {
    work_seconds: u64,
    rest_seconds: u64,
}

impl Configuration {
    /// Validate a pair of durations given in seconds
    pub fn new(work_seconds: i64, rest_seconds: i64) -> Result<Self, TimerError> {
        Ok(Self {
            work_seconds: positive("work", work_seconds)?,
            rest_seconds: positive("rest", rest_seconds)?,
        })
    }

    /// Validate a pair of durations given in minutes
    pub fn from_minutes(work_minutes: u64, rest_minutes: u64) -> Result<Self, TimerError> {
        let to_seconds = |name: &str, minutes: u64| {
            minutes
                .checked_mul(60)
                .and_then(|s| i64::try_from(s).ok())
                .ok_or_else(|| {
                    TimerError::InvalidConfiguration(format!("{} duration is too large", name))
                })
        };
        Self::new(to_seconds("work", work_minutes)?, to_seconds("rest", rest_minutes)?)
    }

    pub fn work_seconds(&self) -> u64 {
        self.work_seconds
    }

    pub fn rest_seconds(&self) -> u64 {
        self.rest_seconds
    }

    /// Length of the given phase under this configuration
    pub fn duration(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_seconds,
            Phase::Rest => self.rest_seconds,
        }
    }
}

impl Default for Configuration {
    /// 25 minutes of work, 5 of rest
    fn default() -> Self {
        Self {
            work_seconds: 25 * 60,
            rest_seconds: 5 * 60,
        }
    }
}

fn positive(name: &str, seconds: i64) -> Result<u64, TimerError> {
    if seconds < 1 {
        return Err(TimerError::InvalidConfiguration(format!(
            "{} duration must be at least 1 second, got {}",
            name, seconds
        )));
    }
    Ok(seconds as u64)
}

/// Notifications for the presentation layer to render or announce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    RunningChanged { running: bool },
    PhaseChanged { phase: Phase },
}

impl TimerEvent {
    /// Short machine-friendly label: `started`, `paused`, `work` or `rest`
    pub fn label(&self) -> &'static str {
        match self {
            TimerEvent::RunningChanged { running: true } => "started",
            TimerEvent::RunningChanged { running: false } => "paused",
            TimerEvent::PhaseChanged { phase } => phase.as_str(),
        }
    }

    /// Phrase spoken to the user when the event fires
    pub fn announcement(&self) -> &'static str {
        match self {
            TimerEvent::RunningChanged { running: true } => "Start",
            TimerEvent::RunningChanged { running: false } => "Pause",
            TimerEvent::PhaseChanged { phase: Phase::Work } => "Work time",
            TimerEvent::PhaseChanged { phase: Phase::Rest } => "Rest time",
        }
    }
}

/// The timer itself. Every mutation goes through one of the four
/// operations below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTimer {
    phase: Phase,
    remaining_seconds: u64,
    running: bool,
    config: Configuration,
}

impl PhaseTimer {
    /// A paused timer at the start of a work phase
    pub fn new(config: Configuration) -> Self {
        Self {
            phase: Phase::Work,
            remaining_seconds: config.work_seconds(),
            running: false,
            config,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn configuration(&self) -> Configuration {
        self.config
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::new(self.phase, self.remaining_seconds, self.running, self.config)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a paused timer or pause a running one.
    pub fn toggle_running(&mut self) -> TimerEvent {
        self.running = !self.running;
        TimerEvent::RunningChanged {
            running: self.running,
        }
    }

    /// Return to the top of a work phase. Refused while running; a live
    /// countdown has to be paused first.
    pub fn reset(&mut self) -> Result<(), TimerError> {
        if self.running {
            return Err(TimerError::InvalidOperation("cannot reset while the timer is running"));
        }
        self.phase = Phase::Work;
        self.remaining_seconds = self.config.work_seconds();
        Ok(())
    }

    /// Validate and apply new durations, see [`PhaseTimer::apply_configuration`].
    pub fn set_configuration(
        &mut self,
        work_seconds: i64,
        rest_seconds: i64,
    ) -> Result<(), TimerError> {
        let config = Configuration::new(work_seconds, rest_seconds)?;
        self.apply_configuration(config);
        Ok(())
    }

    /// Replace the configuration. A paused timer jumps to the new length of
    /// its current phase; a running countdown keeps its remaining time and
    /// picks the new durations up at the next transition.
    pub fn apply_configuration(&mut self, config: Configuration) {
        self.config = config;
        if !self.running {
            self.remaining_seconds = config.duration(self.phase);
        }
    }

    /// Advance the countdown by one second. A tick while paused does nothing.
    ///
    /// Reaching zero switches phase within the same call, so `remaining`
    /// is never observed at zero between ticks.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if !self.running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return None;
        }
        self.phase = self.phase.next();
        self.remaining_seconds = self.config.duration(self.phase);
        Some(TimerEvent::PhaseChanged { phase: self.phase })
    }
}

impl Default for PhaseTimer {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}
