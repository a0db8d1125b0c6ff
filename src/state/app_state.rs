//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use super::{Configuration, PhaseTimer, TimerEvent, TimerSnapshot};
use crate::error::AppError;

/// Shared application state. The phase timer sits behind a single mutex so
/// ticks and user operations apply one at a time, in arrival order.
#[derive(Debug)]
pub struct AppState {
    /// The timer itself, only reachable through the operations below
    timer: Arc<Mutex<PhaseTimer>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer events (running and phase changes)
    event_tx: broadcast::Sender<TimerEvent>,
    /// Running flag watched by the tick source
    running_tx: watch::Sender<bool>,
    /// Keep the receiver alive to prevent channel closure
    _running_rx: watch::Receiver<bool>,
}

impl AppState {
    /// Create a new AppState with a paused timer
    pub fn new(port: u16, host: String, config: Configuration) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (running_tx, running_rx) = watch::channel(false);

        Self {
            timer: Arc::new(Mutex::new(PhaseTimer::new(config))),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            running_tx,
            _running_rx: running_rx,
        }
    }

    fn lock_timer(&self) -> Result<MutexGuard<'_, PhaseTimer>, AppError> {
        self.timer
            .lock()
            .map_err(|e| AppError::StateLock(e.to_string()))
    }

    /// Apply an operation to the timer, then publish the running flag and
    /// any event while still holding the lock so observers see changes in
    /// the order they happened.
    fn update_timer<F>(&self, action: &str, operation: F) -> Result<TimerSnapshot, AppError>
    where
        F: FnOnce(&mut PhaseTimer) -> Result<Option<TimerEvent>, AppError>,
    {
        let mut timer = self.lock_timer()?;
        let event = operation(&mut *timer)?;
        let snapshot = timer.snapshot();

        self.running_tx.send_replace(snapshot.running);
        if let Some(event) = event {
            // No subscribers is fine; the announcer may not be running yet
            if self.event_tx.send(event).is_err() {
                debug!("No subscribers for timer event: {}", event.label());
            }
        }
        drop(timer);

        self.record_action(action);
        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Start or pause the countdown
    pub fn toggle_running(&self) -> Result<TimerSnapshot, AppError> {
        let snapshot = self.update_timer("toggle", |timer| Ok(Some(timer.toggle_running())))?;
        info!(
            "Timer {} with {} left in {} phase",
            snapshot.status(),
            snapshot.display,
            snapshot.phase
        );
        Ok(snapshot)
    }

    /// Reset to the top of the work phase; refused while running
    pub fn reset(&self) -> Result<TimerSnapshot, AppError> {
        let snapshot = self.update_timer("reset", |timer| {
            timer.reset()?;
            Ok(None)
        })?;
        info!("Timer reset to {} of work", snapshot.display);
        Ok(snapshot)
    }

    /// Validate and apply new phase durations in seconds
    pub fn set_configuration(
        &self,
        work_seconds: i64,
        rest_seconds: i64,
    ) -> Result<TimerSnapshot, AppError> {
        let snapshot = self.update_timer("configure", |timer| {
            timer.set_configuration(work_seconds, rest_seconds)?;
            Ok(None)
        })?;
        info!(
            "Configuration set to {}s work / {}s rest",
            snapshot.work_seconds, snapshot.rest_seconds
        );
        Ok(snapshot)
    }

    /// Apply an already validated configuration (e.g. a preset)
    pub fn apply_configuration(&self, config: Configuration) -> Result<TimerSnapshot, AppError> {
        let snapshot = self.update_timer("configure", |timer| {
            timer.apply_configuration(config);
            Ok(None)
        })?;
        info!(
            "Configuration set to {}s work / {}s rest",
            snapshot.work_seconds, snapshot.rest_seconds
        );
        Ok(snapshot)
    }

    /// Advance the countdown by one second (called by the tick source)
    pub fn tick(&self) -> Result<TimerSnapshot, AppError> {
        let mut timer = self.lock_timer()?;
        let event = timer.tick();
        let snapshot = timer.snapshot();

        if let Some(event) = event {
            info!("Phase changed to {} ({} left)", snapshot.phase, snapshot.display);
            if self.event_tx.send(event).is_err() {
                debug!("No subscribers for timer event: {}", event.label());
            }
        }
        Ok(snapshot)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerSnapshot, AppError> {
        self.lock_timer().map(|timer| timer.snapshot())
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the running flag
    pub fn watch_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
