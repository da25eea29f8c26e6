//! HTTP request handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::schema::PredictRequest;
use crate::training::{read_metadata_value, Trainer};

use super::error::{Result, ServerError};
use super::state::AppState;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "Startup Profit Prediction API",
    }))
}

/// Return the metadata file as written by the last training run
pub async fn model_info(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let path = &state.config.training.artifacts.metadata_path;

    match read_metadata_value(path)? {
        Some(meta) => Ok(Json(meta)),
        None => Err(ServerError::NotFound("model metadata not found".to_string())),
    }
}

pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<Value>> {
    let request = PredictRequest::from_slice(&body)?;

    let model = state.model.current().ok_or(ServerError::ModelUnavailable)?;

    let state_name = request.state.clone();
    let prediction = tokio::task::spawn_blocking(move || model.predict_one(&request))
        .await
        .map_err(|e| ServerError::Internal(format!("prediction task failed: {}", e)))?
        .map_err(ServerError::from_request_error)?;

    debug!(state = %state_name, prediction, "Prediction served");
    Ok(Json(json!({ "prediction": prediction })))
}

/// Retrain on the currently discoverable dataset and reload the artifact.
///
/// Not meant for production: it blocks the caller for the whole run and
/// trusts whatever dataset is found on disk.
pub async fn retrain(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    let _guard = state.retrain_lock.lock().await;
    info!("Retrain requested");

    let trainer = Trainer::new(state.config.training.clone());
    let report = tokio::task::spawn_blocking(move || trainer.train_and_save())
        .await
        .map_err(|e| ServerError::Internal(format!("training task failed: {}", e)))?
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    state
        .reload_model()
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    info!(
        dataset = %report.dataset.display(),
        train_r2 = report.train_r2,
        test_r2 = report.test_r2,
        "Retrain complete"
    );
    Ok(Json(json!({ "status": "retrained" })))
}
