//! Tick source background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::state::AppState;

/// Background task that ticks the timer once per `period` while it runs.
///
/// The schedule follows the running flag: it starts one full period after
/// the timer is started and is dropped as soon as a pause is published, so
/// at most one tick is outstanding at any time.
pub async fn tick_source_task(state: Arc<AppState>, period: Duration) {
    info!("Starting tick source task");

    let mut running_rx = state.watch_running();

    loop {
        if !*running_rx.borrow_and_update() {
            // Wait for the timer to be started
            if running_rx.changed().await.is_err() {
                warn!("Running flag channel closed, stopping tick source");
                return;
            }
            continue;
        }

        debug!("Timer running, scheduling ticks every {:?}", period);
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                // Running flag changed - cancel the schedule on pause
                changed = running_rx.changed() => {
                    if changed.is_err() {
                        warn!("Running flag channel closed, stopping tick source");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Timer paused, cancelling tick schedule");
                        break;
                    }
                }

                _ = interval.tick() => {
                    match state.tick() {
                        Ok(snapshot) => debug!("Tick: {} {}", snapshot.phase, snapshot.display),
                        Err(e) => error!("Failed to tick timer: {}", e),
                    }
                }
            }
        }
    }
}
