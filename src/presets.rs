//! Work/rest presets offered to the user
//!
//! Presets are written in minutes as `W / R`. The timer itself accepts any
//! positive pair; [`Preset::CATALOG`] is only the menu shown to clients.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{error::TimerError, state::Configuration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub work_minutes: u64,
    pub rest_minutes: u64,
}

impl Preset {
    pub const CATALOG: [Preset; 3] = [
        Preset::new(25, 5),
        Preset::new(50, 10),
        Preset::new(90, 20),
    ];

    pub const fn new(work_minutes: u64, rest_minutes: u64) -> Self {
        Self {
            work_minutes,
            rest_minutes,
        }
    }

    /// Display label, e.g. `25 / 5`
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn configuration(&self) -> Result<Configuration, TimerError> {
        Configuration::from_minutes(self.work_minutes, self.rest_minutes)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::CATALOG[0]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.work_minutes, self.rest_minutes)
    }
}

impl FromStr for Preset {
    type Err = String;

    /// Parse `W / R` or `W/R` in minutes. Both values must be positive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (work, rest) = s
            .split_once('/')
            .ok_or_else(|| format!("expected WORK/REST in minutes, got '{}'", s))?;

        let minutes = |value: &str, name: &str| -> Result<u64, String> {
            let value = value.trim();
            match value.parse::<u64>() {
                Ok(0) | Err(_) => Err(format!(
                    "{} minutes must be a positive whole number, got '{}'",
                    name, value
                )),
                Ok(n) => Ok(n),
            }
        };

        let preset = Preset::new(minutes(work, "work")?, minutes(rest, "rest")?);
        preset.configuration().map_err(|e| e.to_string())?;
        Ok(preset)
    }
}
