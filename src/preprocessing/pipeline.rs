//! Column transformer: scales numeric columns, one-hot encodes categoricals
//! and lays the result out as a dense feature matrix

use crate::error::{ProfitError, Result};
use super::encoder::OneHotEncoder;
use super::scaler::{numeric_values, StandardScaler};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// Fitted preprocessing stage of the profit model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePipeline {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    is_fitted: bool,
}

impl FeaturePipeline {
    pub fn new<S: AsRef<str>>(numeric_columns: &[S], categorical_columns: &[S]) -> Self {
        Self {
            numeric_columns: numeric_columns.iter().map(|c| c.as_ref().to_string()).collect(),
            categorical_columns: categorical_columns.iter().map(|c| c.as_ref().to_string()).collect(),
            scaler: StandardScaler::new(),
            encoder: OneHotEncoder::new(),
            is_fitted: false,
        }
    }

    /// Fit scaler and encoder on `df`
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let start = Instant::now();

        let numeric: Vec<&str> = self.numeric_columns.iter().map(String::as_str).collect();
        let categorical: Vec<&str> = self.categorical_columns.iter().map(String::as_str).collect();

        self.scaler.fit(df, &numeric)?;
        self.encoder.fit(df, &categorical)?;
        self.is_fitted = true;

        debug!(
            rows = df.height(),
            n_outputs = self.n_outputs(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Feature pipeline fitted"
        );
        Ok(self)
    }

    /// Transform `df` into a row-major feature matrix
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(ProfitError::ModelNotFitted);
        }

        let scaled = self.scaler.transform(df)?;
        let encoded = self.encoder.transform(&scaled)?;

        Self::columns_to_array2(&encoded, &self.feature_names())
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Output column names: numeric columns first, then indicators
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .cloned()
            .chain(self.encoder.output_columns().into_iter().map(|(name, _)| name))
            .collect()
    }

    /// Raw input column each output column was derived from, aligned with
    /// [`feature_names`](Self::feature_names)
    pub fn feature_origins(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .cloned()
            .chain(
                self.encoder
                    .output_columns()
                    .into_iter()
                    .map(|(_, source)| source.to_string()),
            )
            .collect()
    }

    /// Raw input columns in order
    pub fn input_columns(&self) -> Vec<&str> {
        self.numeric_columns
            .iter()
            .chain(self.categorical_columns.iter())
            .map(String::as_str)
            .collect()
    }

    pub fn n_outputs(&self) -> usize {
        self.numeric_columns.len() + self.encoder.output_columns().len()
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }

    /// Extract named columns from a DataFrame into a row-major `Array2<f64>`
    fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
        let n_rows = df.height();

        let col_data: Vec<Vec<f64>> = col_names
            .iter()
            .map(|name| numeric_values(df, name))
            .collect::<Result<_>>()?;

        Ok(Array2::from_shape_fn((n_rows, col_names.len()), |(r, c)| col_data[c][r]))
    }
}
