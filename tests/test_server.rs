//! Integration test: Server API endpoints

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use startup_profit::server::{create_router, AppState};
use startup_profit::utils::DATA_FILENAME;
use tower::ServiceExt;

fn app(state: &Arc<AppState>) -> Router {
    create_router(Arc::clone(state))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::from(body))
        .unwrap()
}

async fn retrain(state: &Arc<AppState>) -> (StatusCode, Value) {
    send(app(state), post_raw("/retrain", "")).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = send(app(&state), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "message": "Startup Profit Prediction API"})
    );
}

#[tokio::test]
async fn test_model_info_missing_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = send(app(&state), get("/model-info")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "model metadata not found"}));
}

#[tokio::test]
async fn test_model_info_corrupt_is_500() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("model_meta.json"), "{ broken").unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = send(app(&state), get("/model-info")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_predict_without_model_is_503() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));
    assert!(!state.model.is_ready());

    let (status, body) = send(app(&state), post_json("/predict", json!({"rd_spend": 1000}))).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Model not available. Train model first.");
}

#[tokio::test]
async fn test_malformed_input_is_400_even_without_model() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = send(app(&state), post_json("/predict", json!({"rd_spend": "lots"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rd_spend"));

    let (status, _) = send(app(&state), post_raw("/predict", "not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_retrain_then_predict() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(&dir.path().join(DATA_FILENAME), 50);
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = retrain(&state).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body, json!({"status": "retrained"}));
    assert!(state.model.is_ready());

    let request = json!({
        "rd_spend": 120000,
        "administration": "95000",
        "marketing_spend": 300000.5,
        "state": "Florida"
    });
    let (status, body) = send(app(&state), post_json("/predict", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_predict_defaults_and_unseen_state() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(&dir.path().join(DATA_FILENAME), 50);
    let state = Arc::new(common::app_state(dir.path()));
    retrain(&state).await;

    let (status, empty) = send(app(&state), post_json("/predict", json!({}))).await;
    assert_eq!(status, StatusCode::OK);

    let explicit = json!({
        "rd_spend": 0,
        "administration": 0,
        "marketing_spend": 0,
        "state": "New York"
    });
    let (_, explicit) = send(app(&state), post_json("/predict", explicit)).await;
    assert_eq!(empty["prediction"], explicit["prediction"]);

    let (status, body) = send(app(&state), post_json("/predict", json!({"state": "Texas"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["prediction"].as_f64().unwrap().is_finite());
}

#[tokio::test]
async fn test_model_info_after_retrain() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(&dir.path().join(DATA_FILENAME), 50);
    let state = Arc::new(common::app_state(dir.path()));
    retrain(&state).await;

    let (status, first) = send(app(&state), get("/model-info")).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(app(&state), get("/model-info")).await;
    assert_eq!(first, second);

    let importances = first["importances"].as_object().unwrap();
    assert_eq!(importances.len(), 4);
    for key in ["R&D Spend", "Administration", "Marketing Spend", "State"] {
        assert!(importances.contains_key(key), "missing {}", key);
    }
    assert!(first["trained_at"].as_str().unwrap().ends_with('Z'));
    assert!(first["train_r2"].as_f64().is_some());
}

#[tokio::test]
async fn test_retrain_replaces_model() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join(DATA_FILENAME);
    common::write_dataset(&data, 50);
    let state = Arc::new(common::app_state(dir.path()));
    retrain(&state).await;

    let request = json!({"rd_spend": 80000, "state": "California"});
    let (_, before) = send(app(&state), post_json("/predict", request.clone())).await;

    common::write_scaled_dataset(&data, 50, 10.0);
    let (status, _) = retrain(&state).await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = send(app(&state), post_json("/predict", request)).await;
    let before = before["prediction"].as_f64().unwrap();
    let after = after["prediction"].as_f64().unwrap();
    assert!(after > before * 5.0, "before {} after {}", before, after);
}

#[tokio::test]
async fn test_retrain_without_dataset_is_500() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = retrain(&state).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["error"],
        "Neither 50_Startups.csv nor startup_data.csv were found."
    );
    assert!(!state.model.is_ready());
}

#[tokio::test]
async fn test_failed_retrain_keeps_previous_model() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join(DATA_FILENAME);
    common::write_dataset(&data, 50);
    let state = Arc::new(common::app_state(dir.path()));
    retrain(&state).await;
    let previous = state.model.current().unwrap();

    std::fs::remove_file(&data).unwrap();
    let (status, _) = retrain(&state).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let current = state.model.current().unwrap();
    assert!(Arc::ptr_eq(&previous, &current));
}

#[tokio::test]
async fn test_startup_loads_existing_artifact() {
    let dir = tempfile::tempdir().unwrap();
    common::write_dataset(&dir.path().join(DATA_FILENAME), 50);
    let trained = Arc::new(common::app_state(dir.path()));
    retrain(&trained).await;

    let restarted = common::app_state(dir.path());
    assert!(restarted.model.is_ready());
}

#[tokio::test]
async fn test_startup_with_corrupt_artifact_is_unready() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("model.bin"), b"garbage").unwrap();

    let state = common::app_state(dir.path());
    assert!(!state.model.is_ready());
}

#[tokio::test]
async fn test_unknown_route_and_wrong_method() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let (status, body) = send(app(&state), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, body) = send(app(&state), get("/predict")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(common::app_state(dir.path()));

    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();
    let response = app(&state).oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
