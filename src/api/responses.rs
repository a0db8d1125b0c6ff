//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::{presets::Preset, state::TimerSnapshot};

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: Option<TimerSnapshot>,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: Option<TimerSnapshot>) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create a response whose status follows the timer's running flag
    pub fn from_timer(message: String, timer: TimerSnapshot) -> Self {
        Self::new(timer.status().to_string(), message, Some(timer))
    }

    /// Create an error response
    pub fn error(message: String, timer: Option<TimerSnapshot>) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Body of `PUT /config`. Durations are taken as raw JSON numbers so that
/// negative or fractional values are reported as invalid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigRequest {
    pub work_seconds: Number,
    pub rest_seconds: Number,
}

/// Body of `POST /config/preset`
#[derive(Debug, Clone, Deserialize)]
pub struct PresetRequest {
    pub preset: String,
}

/// One entry of the preset catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetEntry {
    pub label: String,
    pub work_seconds: u64,
    pub rest_seconds: u64,
}

impl From<Preset> for PresetEntry {
    fn from(preset: Preset) -> Self {
        Self {
            label: preset.label(),
            work_seconds: preset.work_minutes * 60,
            rest_seconds: preset.rest_minutes * 60,
        }
    }
}

/// Status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
