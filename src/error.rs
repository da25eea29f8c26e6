//! Error types for the startup profit pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, ProfitError>;

/// Main error type for training, loading and inference
#[derive(Error, Debug)]
pub enum ProfitError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Neither {preferred} nor {legacy} were found.")]
    DatasetNotFound { preferred: String, legacy: String },

    #[error("Model artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<polars::error::PolarsError> for ProfitError {
    fn from(err: polars::error::PolarsError) -> Self {
        ProfitError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for ProfitError {
    fn from(err: serde_json::Error) -> Self {
        ProfitError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for ProfitError {
    fn from(err: bincode::Error) -> Self {
        ProfitError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for ProfitError {
    fn from(err: ndarray::ShapeError) -> Self {
        ProfitError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
