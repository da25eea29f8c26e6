//! Error types for the server

use crate::error::ProfitError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Model not available. Train model first.")]
    ModelUnavailable,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify a pipeline error raised while serving a request
    pub fn from_request_error(err: ProfitError) -> Self {
        match err {
            ProfitError::InvalidInput(_)
            | ProfitError::InferenceError(_)
            | ProfitError::FeatureNotFound(_)
            | ProfitError::DataError(_)
            | ProfitError::PreprocessingError(_)
            | ProfitError::ShapeError { .. } => ServerError::BadRequest(err.to_string()),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl From<ProfitError> for ServerError {
    fn from(err: ProfitError) -> Self {
        match err {
            ProfitError::InvalidInput(msg) => ServerError::BadRequest(msg),
            other => ServerError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match &self {
            ServerError::Internal(detail) => {
                tracing::error!(detail = %detail, "Internal server error");
            }
            ServerError::ModelUnavailable => {
                tracing::warn!("Request rejected, no model loaded");
            }
            _ => {}
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
