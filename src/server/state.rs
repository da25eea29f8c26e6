//! Application state management

use crate::error::{ProfitError, Result};
use crate::training::ProfitModel;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::ServerConfig;

/// The model currently used for predictions, if any.
///
/// Readers clone the inner `Arc`; a reload swaps in a new one and never
/// mutates a model in place.
#[derive(Debug, Default)]
pub struct ModelHandle {
    inner: RwLock<Option<Arc<ProfitModel>>>,
}

impl ModelHandle {
    pub fn new(model: Option<ProfitModel>) -> Self {
        Self {
            inner: RwLock::new(model.map(Arc::new)),
        }
    }

    pub fn current(&self) -> Option<Arc<ProfitModel>> {
        self.inner.read().clone()
    }

    pub fn replace(&self, model: ProfitModel) {
        *self.inner.write() = Some(Arc::new(model));
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }
}

/// Application state shared across handlers
pub struct AppState {
    pub config: ServerConfig,
    pub model: ModelHandle,
    /// Held across a whole retrain so runs never overlap
    pub retrain_lock: Mutex<()>,
}

impl AppState {
    /// State with no model loaded
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            model: ModelHandle::default(),
            retrain_lock: Mutex::new(()),
        }
    }

    /// State with the artifact loaded if it exists and is readable.
    ///
    /// A missing or unreadable artifact leaves the server running without a
    /// model.
    pub fn load_at_startup(config: ServerConfig) -> Self {
        let state = Self::new(config);
        let path = &state.config.training.artifacts.model_path;

        match ProfitModel::load(path) {
            Ok(model) => {
                info!(path = %path.display(), trees = model.forest().n_trees(), "Model loaded");
                state.model.replace(model);
            }
            Err(ProfitError::ArtifactNotFound(_)) => {
                warn!(path = %path.display(), "No model artifact found, predictions unavailable until retrain");
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to load model artifact");
            }
        }

        state
    }

    /// Load the artifact from disk and swap it in; the current model is
    /// kept if loading fails
    pub fn reload_model(&self) -> Result<()> {
        let path = &self.config.training.artifacts.model_path;
        let model = ProfitModel::load(path)?;
        self.model.replace(model);
        info!(path = %path.display(), "Model reloaded");
        Ok(())
    }
}
