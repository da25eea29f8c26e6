//! Fitted profit model: feature pipeline followed by a random forest

use crate::error::{ProfitError, Result};
use crate::preprocessing::{numeric_values, FeaturePipeline};
use crate::schema::{PredictRequest, CATEGORICAL_FEATURES, NUMERIC_FEATURES, TARGET_COLUMN};
use crate::training::metrics::r2_score;
use crate::training::random_forest::RandomForest;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Preprocess-then-regress pipeline persisted as a single artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitModel {
    features: FeaturePipeline,
    forest: RandomForest,
}

impl ProfitModel {
    /// Unfitted model over the standard feature columns
    pub fn new(forest: RandomForest) -> Self {
        Self {
            features: FeaturePipeline::new(&NUMERIC_FEATURES, &CATEGORICAL_FEATURES),
            forest,
        }
    }

    /// Fit preprocessing and forest on `df`, which must hold the feature
    /// columns and the target
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let y = target(df)?;
        let x = self.features.fit_transform(df)?;
        self.forest.fit(&x, &y)?;

        debug!(
            rows = x.nrows(),
            features = x.ncols(),
            trees = self.forest.n_trees(),
            "Profit model fitted"
        );
        Ok(self)
    }

    /// Predict profit for every row of `df`
    pub fn predict(&self, df: &DataFrame) -> Result<Array1<f64>> {
        let x = self.features.transform(df)?;
        self.predict_matrix(&x)
    }

    /// Predict profit for one request
    pub fn predict_one(&self, request: &PredictRequest) -> Result<f64> {
        let frame = request.to_frame()?;
        let predictions = self.predict(&frame)?;

        let value = predictions
            .get(0)
            .copied()
            .ok_or_else(|| ProfitError::InferenceError("empty prediction".to_string()))?;

        if !value.is_finite() {
            return Err(ProfitError::InferenceError(format!(
                "non-finite prediction: {}",
                value
            )));
        }
        Ok(value)
    }

    /// R² of the model on `df`
    pub fn score(&self, df: &DataFrame) -> Result<f64> {
        let y = target(df)?;
        let predictions = self.predict(df)?;
        r2_score(&y, &predictions)
    }

    fn predict_matrix(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        self.forest.predict(x)
    }

    pub fn features(&self) -> &FeaturePipeline {
        &self.features
    }

    pub fn forest(&self) -> &RandomForest {
        &self.forest
    }

    /// Write the model to `path`, replacing any previous file
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = bincode::serialize(self)?;

        let file = File::create(path).map_err(|e| {
            ProfitError::IoError(std::io::Error::new(
                e.kind(),
                format!("failed to create {}: {}", path.display(), e),
            ))
        })?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Read a model written by [`save`](Self::save)
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ProfitError::ArtifactNotFound(path.to_path_buf()));
        }

        let reader = BufReader::new(File::open(path)?);
        let model: Self = bincode::deserialize_from(reader)?;

        if !model.features.is_fitted() || model.forest.n_trees() == 0 {
            return Err(ProfitError::ModelNotFitted);
        }
        Ok(model)
    }
}

fn target(df: &DataFrame) -> Result<Array1<f64>> {
    Ok(Array1::from_vec(numeric_values(df, TARGET_COLUMN)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df!(
            "R&D Spend" => &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0],
            "Administration" => &[5.0, 5.0, 6.0, 6.0, 7.0, 7.0],
            "Marketing Spend" => &[1.0, 3.0, 2.0, 5.0, 4.0, 6.0],
            "State" => &["New York", "California", "Florida", "New York", "California", "Florida"],
            "Profit" => &[100.0, 200.0, 300.0, 400.0, 500.0, 600.0],
        )
        .unwrap()
    }

    fn fitted() -> ProfitModel {
        let mut model = ProfitModel::new(RandomForest::new(10).with_random_state(42));
        model.fit(&frame()).unwrap();
        model
    }

    #[test]
    fn test_predict_one_defaults() {
        let model = fitted();
        let value = model.predict_one(&PredictRequest::default()).unwrap();
        assert!(value.is_finite());
        assert!((100.0..=600.0).contains(&value));
    }

    #[test]
    fn test_fits_training_data() {
        let model = fitted();
        assert!(model.score(&frame()).unwrap() > 0.5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let model = fitted();
        model.save(&path).unwrap();

        let loaded = ProfitModel::load(&path).unwrap();
        let request = PredictRequest::new(35.0, 6.0, 3.0, "Florida");
        assert_eq!(
            loaded.predict_one(&request).unwrap(),
            model.predict_one(&request).unwrap()
        );
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProfitModel::load(&dir.path().join("nope.bin")).unwrap_err();
        assert!(matches!(err, ProfitError::ArtifactNotFound(_)));
    }

    #[test]
    fn test_load_corrupt_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"not a model").unwrap();
        assert!(ProfitModel::load(&path).is_err());
    }

    #[test]
    fn test_missing_target() {
        let df = frame().drop("Profit").unwrap();
        let mut model = ProfitModel::new(RandomForest::new(2));
        assert!(matches!(model.fit(&df), Err(ProfitError::FeatureNotFound(ref c)) if c == "Profit"));
    }
}
