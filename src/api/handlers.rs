//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde_json::Number;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    error::{AppError, TimerError},
    presets::Preset,
    state::AppState,
};
use super::responses::{
    ApiResponse, ConfigRequest, HealthResponse, PresetEntry, PresetRequest, StatusResponse,
};

type HandlerResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Map a failed operation to a status code and an error body carrying the
/// unchanged timer state
fn failure(state: &AppState, err: AppError) -> (StatusCode, Json<ApiResponse>) {
    let code = match &err {
        AppError::Timer(TimerError::InvalidConfiguration(_)) => StatusCode::BAD_REQUEST,
        AppError::Timer(TimerError::InvalidOperation(_)) => StatusCode::CONFLICT,
        AppError::StateLock(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if code.is_server_error() {
        error!("Timer operation failed: {}", err);
    } else {
        warn!("Timer operation rejected: {}", err);
    }

    (code, Json(ApiResponse::error(err.to_string(), state.get_timer_state().ok())))
}

/// Report a body the JSON extractor refused in the same shape as other errors
fn rejected(state: &AppState, rejection: JsonRejection) -> (StatusCode, Json<ApiResponse>) {
    warn!("Request body rejected: {}", rejection.body_text());
    (
        rejection.status(),
        Json(ApiResponse::error(rejection.body_text(), state.get_timer_state().ok())),
    )
}

/// Accept any JSON number holding a whole count of seconds, including
/// `60.0` and `1e3`
fn whole_seconds(name: &str, value: &Number) -> Result<i64, AppError> {
    let invalid = |reason: &str| -> AppError {
        TimerError::InvalidConfiguration(format!("{} duration {}, got {}", name, reason, value))
            .into()
    };

    if let Some(seconds) = value.as_i64() {
        return Ok(seconds);
    }
    if value.is_u64() {
        return Err(invalid("is too large"));
    }
    match value.as_f64() {
        Some(seconds) if seconds.fract() != 0.0 => {
            Err(invalid("must be a whole number of seconds"))
        }
        // i64::MAX as f64 rounds up to 2^63, which is already out of range
        Some(seconds) if seconds >= i64::MIN as f64 && seconds < i64::MAX as f64 => {
            Ok(seconds as i64)
        }
        _ => Err(invalid("is out of range")),
    }
}

/// Handle POST /toggle - Start or pause the timer
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    match state.toggle_running() {
        Ok(timer) => {
            let message = if timer.running { "Timer started" } else { "Timer paused" };
            Ok(Json(ApiResponse::from_timer(message.to_string(), timer)))
        }
        Err(e) => Err(failure(&state, e)),
    }
}

/// Handle POST /reset - Reset a paused timer to the start of work
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    match state.reset() {
        Ok(timer) => Ok(Json(ApiResponse::from_timer("Timer reset".to_string(), timer))),
        Err(e) => Err(failure(&state, e)),
    }
}

/// Handle PUT /config - Set work and rest durations in seconds
pub async fn config_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ConfigRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = payload.map_err(|rejection| rejected(&state, rejection))?;
    let result = whole_seconds("work", &request.work_seconds)
        .and_then(|work| Ok((work, whole_seconds("rest", &request.rest_seconds)?)))
        .and_then(|(work, rest)| state.set_configuration(work, rest));

    match result {
        Ok(timer) => {
            info!("Config endpoint called - {}s / {}s", timer.work_seconds, timer.rest_seconds);
            Ok(Json(ApiResponse::from_timer("Configuration updated".to_string(), timer)))
        }
        Err(e) => Err(failure(&state, e)),
    }
}

/// Handle POST /config/preset - Apply a preset given as "W / R" minutes
pub async fn preset_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PresetRequest>, JsonRejection>,
) -> HandlerResult {
    let Json(request) = payload.map_err(|rejection| rejected(&state, rejection))?;
    let result = request
        .preset
        .parse::<Preset>()
        .map_err(|e| AppError::from(TimerError::InvalidConfiguration(e)))
        .and_then(|preset| Ok((preset, preset.configuration()?)))
        .and_then(|(preset, config)| Ok((preset, state.apply_configuration(config)?)));

    match result {
        Ok((preset, timer)) => {
            info!("Preset endpoint called - {}", preset);
            Ok(Json(ApiResponse::from_timer(format!("Preset {} applied", preset), timer)))
        }
        Err(e) => Err(failure(&state, e)),
    }
}

/// Handle GET /presets - List the preset catalog
pub async fn presets_handler() -> Json<Vec<PresetEntry>> {
    Json(Preset::CATALOG.into_iter().map(PresetEntry::from).collect())
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream timer events as Server-Sent Events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream subscriber connected");

    let events = stream::unfold(state.subscribe(), |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let sse = Event::default()
                        .event(event.label())
                        .data(event.announcement());
                    return Some((Ok::<_, Infallible>(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
