//! Importances of the raw input features

use crate::error::{ProfitError, Result};
use crate::training::model::ProfitModel;
use std::collections::BTreeMap;

/// Sum the forest's per-column importances back onto the raw column each
/// model input was derived from.
///
/// Every raw input column gets a key, so indicator columns of a categorical
/// field collapse onto that field.
pub fn aggregate_importances(model: &ProfitModel) -> Result<BTreeMap<String, f64>> {
    let importances = model
        .forest()
        .feature_importances()
        .ok_or(ProfitError::ModelNotFitted)?;

    let origins = model.features().feature_origins();
    if origins.len() != importances.len() {
        return Err(ProfitError::ShapeError {
            expected: format!("{} importances", origins.len()),
            actual: format!("{} importances", importances.len()),
        });
    }

    let mut aggregated: BTreeMap<String, f64> = model
        .features()
        .input_columns()
        .into_iter()
        .map(|name| (name.to_string(), 0.0))
        .collect();

    for (origin, &value) in origins.iter().zip(importances.iter()) {
        *aggregated.entry(origin.clone()).or_insert(0.0) += value;
    }

    Ok(aggregated)
}
