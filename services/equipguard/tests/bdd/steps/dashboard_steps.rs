//! BDD step definitions for dashboard feature

use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use cucumber::{given, then, when};
use tower::ServiceExt;

use equipguard::dashboard::build_router;
use equipguard::prediction::{HealthStatus, PredictionResult};
use equipguard::reading::Reading;
use equipguard::state::new_state_handle;

use crate::world::EquipGuardWorld;

async fn record(world: &mut EquipGuardWorld, status: String, is_anomaly: bool, temperature: f64) {
    let handle = world.state.get_or_insert_with(new_state_handle);
    handle.write().await.apply(
        &Reading {
            temperature,
            vibration: 12.0,
            voltage: 221.0,
        },
        &PredictionResult {
            status: HealthStatus::from(status),
            is_anomaly,
        },
        "12:00:00".to_string(),
    );
}

#[given("a dashboard with no telemetry yet")]
fn dashboard_empty(world: &mut EquipGuardWorld) {
    world.state = Some(new_state_handle());
}

#[given(expr = "the prediction service last answered {string} with anomaly at {float} degrees")]
async fn last_answer_with_anomaly(world: &mut EquipGuardWorld, status: String, temperature: f64) {
    record(world, status, true, temperature).await;
}

#[given(expr = "the prediction service last answered {string} without anomaly at {float} degrees")]
async fn last_answer_without_anomaly(
    world: &mut EquipGuardWorld,
    status: String,
    temperature: f64,
) {
    record(world, status, false, temperature).await;
}

#[when(expr = "the dashboard {string} is requested")]
async fn request_path(world: &mut EquipGuardWorld, path: String) {
    let state = world.state.as_ref().expect("state not set").clone();
    let app = build_router(state, Duration::from_millis(2000));
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    world.response_body = Some(String::from_utf8(body.to_vec()).unwrap());
}

#[then(expr = "the response should contain {string}")]
fn response_contains(world: &mut EquipGuardWorld, expected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        body.contains(&expected),
        "Expected response to contain '{}', but it didn't.\nResponse body:\n{}",
        expected,
        body
    );
}

#[then(expr = "the response should not contain {string}")]
fn response_not_contains(world: &mut EquipGuardWorld, unexpected: String) {
    let body = world.response_body.as_ref().expect("no response body");
    assert!(
        !body.contains(&unexpected),
        "Expected response not to contain '{}'.\nResponse body:\n{}",
        unexpected,
        body
    );
}
