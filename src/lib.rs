//! Startup Profit - profit prediction service
//!
//! Trains a random-forest regressor on startup spend data and serves
//! predictions over HTTP:
//! - Dataset discovery and CSV loading
//! - Standard scaling and one-hot encoding
//! - Random forest training, scoring and persistence
//! - Web server and CLI interfaces
//!
//! # Modules
//!
//! - [`schema`] - Column names and the typed prediction request
//! - [`utils`] - Dataset discovery and loading
//! - [`preprocessing`] - Scaling, encoding and the feature pipeline
//! - [`training`] - Trees, forest, split, metrics, artifacts and the trainer
//! - [`server`] - HTTP server with REST API
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;
pub mod schema;

// Data and ML
pub mod utils;
pub mod preprocessing;
pub mod training;

// Services
pub mod server;
pub mod cli;

pub use error::{ProfitError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ProfitError, Result};
    pub use crate::schema::PredictRequest;
    pub use crate::utils::{DataLoader, DatasetLocator, DatasetSource};
    pub use crate::preprocessing::{FeaturePipeline, OneHotEncoder, StandardScaler};
    pub use crate::training::{
        ArtifactPaths, ModelMetadata, ProfitModel, RandomForest, Trainer, TrainingConfig,
        TrainingReport,
    };
    pub use crate::server::{create_router, AppState, ServerConfig, ServerError};
}
