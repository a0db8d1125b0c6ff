//! HTTP API tests driving the router in-process

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body, BodyDataStream},
    http::{header, Method, Request, StatusCode},
    Router,
};
use minimal_pomodoro::{create_router, AppState, Configuration, Phase, TimerSnapshot};
use futures::StreamExt;
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

fn setup(work: i64, rest: i64) -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(
        20525,
        "127.0.0.1".to_string(),
        Configuration::new(work, rest).unwrap(),
    ));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    send_text(router, method, uri, body.map(|b| b.to_string())).await
}

/// Send a raw JSON body, for number spellings `json!` would normalize
async fn send_text(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body)
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn next_frame(frames: &mut BodyDataStream) -> String {
    let frame = timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("no event within 5s")
        .expect("event stream ended")
        .unwrap();
    String::from_utf8(frame.to_vec()).unwrap()
}

fn timer(body: &Value) -> TimerSnapshot {
    serde_json::from_value(body["timer"].clone()).unwrap()
}

#[tokio::test]
async fn status_reports_initial_state() {
    let (_, router) = setup(25 * 60, 5 * 60);
    let (status, body) = send(&router, Method::GET, "/status", None).await;

    assert_eq!(status, StatusCode::OK);
    let snapshot = timer(&body);
    assert_eq!(snapshot.phase, Phase::Work);
    assert_eq!(snapshot.display, "25:00");
    assert!(!snapshot.running);
    assert_eq!(body["last_action"], Value::Null);
}

#[tokio::test]
async fn toggle_starts_and_pauses() {
    let (_, router) = setup(60, 30);

    let (status, body) = send(&router, Method::POST, "/toggle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["message"], "Timer started");

    let (_, body) = send(&router, Method::POST, "/toggle", None).await;
    assert_eq!(body["status"], "paused");
    assert_eq!(timer(&body).remaining_seconds, 60);
}

#[tokio::test]
async fn reset_conflicts_while_running() {
    let (state, router) = setup(10, 5);
    state.toggle_running().unwrap();
    state.tick().unwrap();

    let (status, body) = send(&router, Method::POST, "/reset", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    assert_eq!(timer(&body).remaining_seconds, 9);

    state.toggle_running().unwrap();
    let (status, body) = send(&router, Method::POST, "/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer(&body).remaining_seconds, 10);
}

#[tokio::test]
async fn config_applies_immediately_while_paused() {
    let (_, router) = setup(10, 5);
    let (status, body) = send(
        &router,
        Method::PUT,
        "/config",
        Some(json!({ "work_seconds": 3000, "rest_seconds": 600 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let snapshot = timer(&body);
    assert_eq!(snapshot.remaining_seconds, 3000);
    assert_eq!(snapshot.display, "50:00");
}

#[tokio::test]
async fn invalid_config_is_bad_request() {
    let (_, router) = setup(10, 5);

    for body in [
        json!({ "work_seconds": 0, "rest_seconds": 5 }),
        json!({ "work_seconds": -1, "rest_seconds": 5 }),
        json!({ "work_seconds": 10, "rest_seconds": 2.5 }),
    ] {
        let (status, body) = send(&router, Method::PUT, "/config", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let snapshot = timer(&body);
        assert_eq!((snapshot.work_seconds, snapshot.rest_seconds), (10, 5));
    }
}

#[tokio::test]
async fn config_accepts_whole_numbers_in_any_spelling() {
    let (_, router) = setup(10, 5);

    for (body, expected) in [
        (r#"{"work_seconds": 60.0, "rest_seconds": 60}"#, (60, 60)),
        (r#"{"work_seconds": 1e3, "rest_seconds": 3e2}"#, (1000, 300)),
        (r#"{"work_seconds": 1500, "rest_seconds": 3.0e2}"#, (1500, 300)),
    ] {
        let (status, body) = send_text(&router, Method::PUT, "/config", Some(body.into())).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        let snapshot = timer(&body);
        assert_eq!((snapshot.work_seconds, snapshot.rest_seconds), expected);
    }
}

#[tokio::test]
async fn config_reports_out_of_range_values() {
    let (_, router) = setup(10, 5);

    let (status, body) = send_text(
        &router,
        Method::PUT,
        "/config",
        Some(r#"{"work_seconds": 18446744073709551615, "rest_seconds": 5}"#.into()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("too large"), "{}", message);
    assert!(!message.contains("whole number"), "{}", message);

    let (status, body) = send_text(
        &router,
        Method::PUT,
        "/config",
        Some(r#"{"work_seconds": 1e30, "rest_seconds": 5}"#.into()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("out of range"));
    assert_eq!(timer(&body).work_seconds, 10);
}

#[tokio::test]
async fn malformed_bodies_get_error_shape() {
    let (_, router) = setup(10, 5);

    for (uri, method, body) in [
        ("/config", Method::PUT, json!({ "work_seconds": "60", "rest_seconds": 5 })),
        ("/config", Method::PUT, json!({ "work_seconds": 60 })),
        ("/config/preset", Method::POST, json!({ "name": "25 / 5" })),
    ] {
        let (status, body) = send(&router, method, uri, Some(body)).await;
        assert!(status.is_client_error(), "{} gave {}", uri, status);
        assert_eq!(body["status"], "error");
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert_eq!(timer(&body).work_seconds, 10);
    }
}

#[tokio::test]
async fn preset_endpoint_accepts_labels() {
    let (_, router) = setup(10, 5);

    let (status, body) =
        send(&router, Method::POST, "/config/preset", Some(json!({ "preset": "90 / 20" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(timer(&body).remaining_seconds, 90 * 60);

    let (status, _) =
        send(&router, Method::POST, "/config/preset", Some(json!({ "preset": "0 / 5" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn presets_lists_catalog() {
    let (_, router) = setup(10, 5);
    let (status, body) = send(&router, Method::GET, "/presets", None).await;

    assert_eq!(status, StatusCode::OK);
    let labels: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, ["25 / 5", "50 / 10", "90 / 20"]);
    assert_eq!(body[1]["work_seconds"], 3000);
}

#[tokio::test]
async fn running_reconfiguration_lands_on_next_phase() {
    let (state, router) = setup(3, 5);
    state.toggle_running().unwrap();
    state.tick().unwrap();

    let (_, body) = send(
        &router,
        Method::PUT,
        "/config",
        Some(json!({ "work_seconds": 100, "rest_seconds": 7 })),
    )
    .await;
    assert_eq!(timer(&body).remaining_seconds, 2);

    state.tick().unwrap();
    let snapshot = state.tick().unwrap();
    assert_eq!((snapshot.phase, snapshot.remaining_seconds), (Phase::Rest, 7));
}

#[tokio::test]
async fn events_endpoint_streams() {
    let (state, router) = setup(1, 5);
    let response = router
        .oneshot(Request::get("/events").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );

    let mut frames = response.into_body().into_data_stream();

    state.toggle_running().unwrap();
    assert_eq!(next_frame(&mut frames).await, "event: started\ndata: Start\n\n");

    state.tick().unwrap();
    assert_eq!(next_frame(&mut frames).await, "event: rest\ndata: Rest time\n\n");
}

#[tokio::test]
async fn health_reports_version() {
    let (_, router) = setup(10, 5);
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}
