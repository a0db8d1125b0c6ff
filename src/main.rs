//! Minimal Pomodoro - A work/rest phase timer served over HTTP
//!
//! This is the main entry point for the minimal-pomodoro application.

use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::info;

use minimal_pomodoro::{
    config::Config,
    state::AppState,
    api::create_router,
    tasks::{announcer_task, tick_source_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("minimal_pomodoro={},tower_http=info", config.log_level()))
        .init();

    info!("Starting minimal-pomodoro server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, preset={}",
          config.host, config.port, config.preset);

    // Create application state with a paused timer at the top of work
    let timer_config = config.preset.configuration()?;
    let state = Arc::new(AppState::new(config.port, config.host.clone(), timer_config));

    // Start the tick source and the announcer
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        tick_source_task(tick_state, Duration::from_secs(1)).await;
    });
    let announcer_state = Arc::clone(&state);
    tokio::spawn(async move {
        announcer_task(announcer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /toggle        - Start or pause the timer");
    info!("  POST /reset         - Reset a paused timer to the start of work");
    info!("  PUT  /config        - Set work/rest durations in seconds");
    info!("  POST /config/preset - Apply a \"W / R\" preset in minutes");
    info!("  GET  /presets       - List presets");
    info!("  GET  /status        - Check current phase and remaining time");
    info!("  GET  /events        - Stream timer events");
    info!("  GET  /health        - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
