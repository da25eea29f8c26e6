//! End-to-end training run: load, split, fit, score, persist

use crate::error::{ProfitError, Result};
use crate::schema::{FEATURE_COLUMNS, TARGET_COLUMN};
use crate::training::config::TrainingConfig;
use crate::training::importance::aggregate_importances;
use crate::training::metadata::ModelMetadata;
use crate::training::model::ProfitModel;
use crate::training::random_forest::RandomForest;
use crate::training::split::train_test_split;
use crate::utils::{DataLoader, DatasetSource};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{error, info, warn};

/// Outcome of a successful training run
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub dataset: PathBuf,
    pub source: DatasetSource,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_r2: f64,
    pub test_r2: f64,
    pub model_path: PathBuf,
    /// `None` when the metadata file could not be written
    pub metadata: Option<ModelMetadata>,
}

/// A fitted model with its scores, before anything is persisted
pub struct FitOutcome {
    pub model: ProfitModel,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_r2: f64,
    pub test_r2: f64,
}

/// Computes the per-column importances recorded in the metadata
pub type ImportanceFn = fn(&ProfitModel) -> Result<BTreeMap<String, f64>>;

pub struct Trainer {
    config: TrainingConfig,
    importances: ImportanceFn,
}

impl Trainer {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            importances: aggregate_importances,
        }
    }

    /// Replace the importance step
    pub fn with_importance_fn(mut self, importances: ImportanceFn) -> Self {
        self.importances = importances;
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Split `df`, fit on the train rows and score both partitions
    pub fn fit(&self, df: &DataFrame) -> Result<FitOutcome> {
        let mut columns: Vec<&str> = FEATURE_COLUMNS.to_vec();
        columns.push(TARGET_COLUMN);
        let data = select_columns(df, &columns)?;

        let split = train_test_split(&data, self.config.test_size, self.config.random_seed)?;

        let forest = RandomForest::new(self.config.n_estimators)
            .with_random_state(self.config.random_seed);
        let mut model = ProfitModel::new(forest);
        model.fit(&split.train)?;

        let train_r2 = model.score(&split.train)?;
        let test_r2 = model.score(&split.test)?;

        Ok(FitOutcome {
            model,
            train_rows: split.train.height(),
            test_rows: split.test.height(),
            train_r2,
            test_r2,
        })
    }

    /// Locate the dataset, fit, then write the model artifact and metadata.
    ///
    /// Importance and metadata failures are logged and do not fail the run.
    pub fn train_and_save(&self) -> Result<TrainingReport> {
        let start = Instant::now();
        let dataset = DataLoader::new(self.config.locator.clone()).load()?;

        let outcome = self.fit(&dataset.frame)?;
        info!(
            train_rows = outcome.train_rows,
            test_rows = outcome.test_rows,
            train_r2 = outcome.train_r2,
            test_r2 = outcome.test_r2,
            "Model trained"
        );

        let model_path = self.config.artifacts.model_path.clone();
        outcome.model.save(&model_path)?;
        info!(path = %model_path.display(), "Saved model");

        let importances = (self.importances)(&outcome.model).unwrap_or_else(|e| {
            warn!(error = %e, "Could not compute feature importances");
            Default::default()
        });

        let dataset_path = dataset.absolute_path();
        let metadata = ModelMetadata::new(
            &dataset_path,
            outcome.train_r2,
            outcome.test_r2,
            importances,
        );

        let metadata_path = &self.config.artifacts.metadata_path;
        let metadata = match metadata.write(metadata_path) {
            Ok(()) => {
                info!(path = %metadata_path.display(), "Saved metadata");
                Some(metadata)
            }
            Err(e) => {
                error!(path = %metadata_path.display(), error = %e, "Failed to write metadata");
                None
            }
        };

        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Training run complete");

        Ok(TrainingReport {
            dataset: dataset_path,
            source: dataset.source,
            train_rows: outcome.train_rows,
            test_rows: outcome.test_rows,
            train_r2: outcome.train_r2,
            test_r2: outcome.test_r2,
            model_path,
            metadata,
        })
    }
}

/// Keep only `columns`, failing with the first one that is missing
fn select_columns(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let selected: Vec<Column> = columns
        .iter()
        .map(|&name| {
            df.column(name)
                .cloned()
                .map_err(|_| ProfitError::FeatureNotFound(name.to_string()))
        })
        .collect::<Result<_>>()?;

    Ok(DataFrame::new(selected)?)
}
