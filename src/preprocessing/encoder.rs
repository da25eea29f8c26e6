//! One-hot encoding of categorical columns

use crate::error::{ProfitError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Categories learned for one column, sorted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnCategories {
    pub name: String,
    pub categories: Vec<String>,
}

impl ColumnCategories {
    /// Name of the indicator column for `category`
    pub fn indicator_name(&self, category: &str) -> String {
        format!("{}_{}", self.name, category)
    }
}

/// One-hot encoder.
///
/// A value not seen during `fit` encodes to all zeros instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    columns: Vec<ColumnCategories>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn the category vocabulary of each of `columns`
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        let mut learned = Vec::with_capacity(columns.len());

        for &col_name in columns {
            let values = string_values(df, col_name)?;
            let categories: BTreeSet<String> = values.into_iter().collect();
            learned.push(ColumnCategories {
                name: col_name.to_string(),
                categories: categories.into_iter().collect(),
            });
        }

        self.columns = learned;
        self.is_fitted = true;
        Ok(self)
    }

    /// Replace each encoded column with one indicator column per category
    pub fn transform(&self, df: &DataFrame) -> Result<DataFrame> {
        if !self.is_fitted {
            return Err(ProfitError::ModelNotFitted);
        }

        let mut result = df.clone();

        for column in &self.columns {
            let values = string_values(df, &column.name)?;

            for category in &column.categories {
                let indicator: Vec<f64> = values
                    .iter()
                    .map(|v| if v == category { 1.0 } else { 0.0 })
                    .collect();

                let series = Series::new(column.indicator_name(category).into(), indicator);
                result
                    .with_column(series)
                    .map_err(|e| ProfitError::PreprocessingError(e.to_string()))?;
            }

            result = result
                .drop(&column.name)
                .map_err(|e| ProfitError::PreprocessingError(e.to_string()))?;
        }

        Ok(result)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Indicator column names in output order, paired with their source column
    pub fn output_columns(&self) -> Vec<(String, &str)> {
        self.columns
            .iter()
            .flat_map(|column| {
                column
                    .categories
                    .iter()
                    .map(move |category| (column.indicator_name(category), column.name.as_str()))
            })
            .collect()
    }

    pub fn categories(&self) -> &[ColumnCategories] {
        &self.columns
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}

/// Read a column as strings, failing on nulls
pub(crate) fn string_values(df: &DataFrame, col_name: &str) -> Result<Vec<String>> {
    let column = df
        .column(col_name)
        .map_err(|_| ProfitError::FeatureNotFound(col_name.to_string()))?;

    let casted = column
        .cast(&DataType::String)
        .map_err(|e| ProfitError::DataError(format!("column '{}': {}", col_name, e)))?;

    casted
        .str()
        .map_err(|e| ProfitError::DataError(e.to_string()))?
        .into_iter()
        .map(|v| {
            v.map(str::to_string).ok_or_else(|| {
                ProfitError::DataError(format!("column '{}' contains missing values", col_name))
            })
        })
        .collect()
}
