//! Training configuration

use crate::utils::DatasetLocator;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "model.bin";
pub const DEFAULT_META_PATH: &str = "model_meta.json";

/// Where the fitted model and its metadata are written
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub model_path: PathBuf,
    pub metadata_path: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model_path: std::env::var_os("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            metadata_path: std::env::var_os("MODEL_META_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_META_PATH)),
        }
    }
}

impl ArtifactPaths {
    /// Both artifacts under `dir` with their default file names
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            model_path: dir.join(DEFAULT_MODEL_PATH),
            metadata_path: dir.join(DEFAULT_META_PATH),
        }
    }
}

/// Dataset, artifacts and hyperparameters of a training run
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    pub locator: DatasetLocator,
    pub artifacts: ArtifactPaths,
    pub n_estimators: usize,
    pub test_size: f64,
    pub random_seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            locator: DatasetLocator::default(),
            artifacts: ArtifactPaths::default(),
            n_estimators: 200,
            test_size: 0.12,
            random_seed: 42,
        }
    }
}

impl TrainingConfig {
    pub fn with_locator(mut self, locator: DatasetLocator) -> Self {
        self.locator = locator;
        self
    }

    /// Train on `path` instead of searching for the dataset
    pub fn with_dataset(mut self, path: impl Into<PathBuf>) -> Self {
        self.locator = self.locator.with_explicit(path);
        self
    }

    pub fn with_artifacts(mut self, artifacts: ArtifactPaths) -> Self {
        self.artifacts = artifacts;
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts.model_path = path.into();
        self
    }

    pub fn with_metadata_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts.metadata_path = path.into();
        self
    }

    /// Set number of trees
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    /// Seed for both the split and the forest
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = TrainingConfig::default()
            .with_n_estimators(5)
            .with_dataset("/tmp/data.csv")
            .with_artifacts(ArtifactPaths::in_dir("/tmp/out"));

        assert_eq!(config.n_estimators, 5);
        assert_eq!(config.test_size, 0.12);
        assert_eq!(config.random_seed, 42);
        assert_eq!(config.locator.explicit, Some(PathBuf::from("/tmp/data.csv")));
        assert_eq!(config.artifacts.model_path, PathBuf::from("/tmp/out/model.bin"));
    }
}
