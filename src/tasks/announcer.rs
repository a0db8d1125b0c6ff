//! Announcer background task

use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::state::{AppState, TimerEvent};

/// Background task that announces timer events as they happen
pub async fn announcer_task(state: Arc<AppState>) {
    info!("Starting announcer task");
    let announced = announce_events(state.subscribe()).await;
    info!("Event channel closed after {} announcements, stopping announcer", announced);
}

/// Announce every event received until the channel closes. Returns how many
/// events were announced; events dropped by lag are not counted.
pub async fn announce_events(mut event_rx: broadcast::Receiver<TimerEvent>) -> u64 {
    let mut announced = 0;

    loop {
        match event_rx.recv().await {
            Ok(event) => {
                info!(event = event.label(), "Announcement: {}", event.announcement());
                announced += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Announcer fell behind, skipped {} events", skipped);
            }
            Err(RecvError::Closed) => return announced,
        }
    }
}
