//! Standard (z-score) scaling of numeric columns

use crate::error::{ProfitError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fitted parameters for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub name: String,
    pub mean: f64,
    /// Population standard deviation, or 1.0 for a constant column
    pub scale: f64,
}

/// Scales numeric columns to zero mean and unit variance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<ColumnScale>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit mean and standard deviation for each of `columns`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        let mut params = Vec::with_capacity(columns.len());

        for &col_name in columns {
            let values = numeric_values(df, col_name)?;
            if values.is_empty() {
                return Err(ProfitError::PreprocessingError(format!(
                    "cannot fit scaler on empty column '{}'",
                    col_name
                )));
            }

            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            let std = variance.sqrt();

            params.push(ColumnScale {
                name: col_name.to_string(),
                mean,
                scale: if std == 0.0 { 1.0 } else { std },
            });
        }

        self.params = params;
        self.is_fitted = true;
        Ok(self)
    }

    /// Replace every fitted column with its scaled values
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ProfitError::ModelNotFitted);
        }

        // Build all scaled columns first, then apply them to a single copy
        let replacements: Vec<Series> = self
            .params
            .iter()
            .map(|p| {
                let scaled: Vec<f64> = numeric_values(df, &p.name)?
                    .into_iter()
                    .map(|v| (v - p.mean) / p.scale)
                    .collect();
                Ok(Series::new(p.name.as_str().into(), scaled))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut result = df.clone();
        for scaled in replacements {
            result
                .with_column(scaled)
                .map_err(|e| ProfitError::PreprocessingError(e.to_string()))?;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    pub fn params(&self) -> &[ColumnScale] {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

/// Read a column as `f64`, failing on nulls or non-numeric data
pub(crate) fn numeric_values(df: &DataFrame, col_name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(col_name)
        .map_err(|_| ProfitError::FeatureNotFound(col_name.to_string()))?;

    let casted = column
        .cast(&DataType::Float64)
        .map_err(|e| ProfitError::DataError(format!("column '{}': {}", col_name, e)))?;

    // a strict cast would fail; a lenient one turns unparsable strings into nulls
    if casted.null_count() > column.null_count() {
        return Err(ProfitError::DataError(format!(
            "column '{}' contains non-numeric values",
            col_name
        )));
    }

    casted
        .f64()
        .map_err(|e| ProfitError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| {
            v.ok_or_else(|| {
                ProfitError::DataError(format!("column '{}' contains missing values", col_name))
            })
        })
        .collect()
}
