//! Fixed dataset schema and the typed prediction request
//!
//! Training and inference agree on column names and order through the
//! constants here; the server never builds a frame any other way.

use crate::error::{ProfitError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const RD_SPEND: &str = "R&D Spend";
pub const ADMINISTRATION: &str = "Administration";
pub const MARKETING_SPEND: &str = "Marketing Spend";
pub const STATE: &str = "State";
pub const PROFIT: &str = "Profit";

/// Numeric feature columns, in model order
pub const NUMERIC_FEATURES: [&str; 3] = [RD_SPEND, ADMINISTRATION, MARKETING_SPEND];

/// Categorical feature columns, in model order
pub const CATEGORICAL_FEATURES: [&str; 1] = [STATE];

/// All raw feature columns, in the order the trainer selects them
pub const FEATURE_COLUMNS: [&str; 4] = [RD_SPEND, ADMINISTRATION, MARKETING_SPEND, STATE];

/// Target column
pub const TARGET_COLUMN: &str = PROFIT;

pub const DEFAULT_STATE: &str = "New York";

/// A single prediction request with per-field defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub rd_spend: f64,
    pub administration: f64,
    pub marketing_spend: f64,
    pub state: String,
}

impl Default for PredictRequest {
    fn default() -> Self {
        Self {
            rd_spend: 0.0,
            administration: 0.0,
            marketing_spend: 0.0,
            state: DEFAULT_STATE.to_string(),
        }
    }
}

impl PredictRequest {
    pub fn new(rd_spend: f64, administration: f64, marketing_spend: f64, state: impl Into<String>) -> Self {
        Self {
            rd_spend,
            administration,
            marketing_spend,
            state: state.into(),
        }
    }

    /// Parse a raw request body.
    ///
    /// Absent numeric fields default to 0 and an absent `state` to
    /// `"New York"`. Anything that cannot be coerced is an
    /// [`ProfitError::InvalidInput`].
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ProfitError::InvalidInput(format!("request body is not valid JSON: {}", e)))?;
        Self::from_json(&value)
    }

    /// Build a request from an already-decoded JSON value
    pub fn from_json(value: &Value) -> Result<Self> {
        let fields = value.as_object().ok_or_else(|| {
            ProfitError::InvalidInput("request body must be a JSON object".to_string())
        })?;

        let defaults = Self::default();
        let numeric = |key: &str, default: f64| -> Result<f64> {
            match fields.get(key) {
                None => Ok(default),
                Some(v) => coerce_f64(key, v),
            }
        };

        let state = match fields.get("state") {
            None => defaults.state,
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(ProfitError::InvalidInput(format!(
                    "field 'state' must be a string, got {}",
                    json_type_name(other)
                )))
            }
        };

        Ok(Self {
            rd_spend: numeric("rd_spend", defaults.rd_spend)?,
            administration: numeric("administration", defaults.administration)?,
            marketing_spend: numeric("marketing_spend", defaults.marketing_spend)?,
            state,
        })
    }

    /// One-row frame with the exact training column names and order
    pub fn to_frame(&self) -> Result<DataFrame> {
        let df = df!(
            RD_SPEND => &[self.rd_spend],
            ADMINISTRATION => &[self.administration],
            MARKETING_SPEND => &[self.marketing_spend],
            STATE => &[self.state.as_str()],
        )?;
        Ok(df)
    }
}

fn coerce_f64(key: &str, value: &Value) -> Result<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(ProfitError::InvalidInput(format!(
            "field '{}' must be a finite number, got {}",
            key, v
        ))),
        None => Err(ProfitError::InvalidInput(format!(
            "could not convert field '{}' to a number: {}",
            key, value
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_uses_defaults() {
        let req = PredictRequest::from_json(&json!({})).unwrap();
        assert_eq!(req, PredictRequest::default());
        assert_eq!(req.state, "New York");
    }

    #[test]
    fn test_partial_request() {
        let req = PredictRequest::from_json(&json!({
            "rd_spend": 1000.5,
            "state": "Florida"
        }))
        .unwrap();
        assert_eq!(req.rd_spend, 1000.5);
        assert_eq!(req.administration, 0.0);
        assert_eq!(req.marketing_spend, 0.0);
        assert_eq!(req.state, "Florida");
    }

    #[test]
    fn test_numeric_strings_are_coerced() {
        let req = PredictRequest::from_json(&json!({
            "rd_spend": " 1500 ",
            "administration": "2.5e3",
            "marketing_spend": 7
        }))
        .unwrap();
        assert_eq!(req.rd_spend, 1500.0);
        assert_eq!(req.administration, 2500.0);
        assert_eq!(req.marketing_spend, 7.0);
    }

    #[test]
    fn test_uncoercible_field_is_input_error() {
        let err = PredictRequest::from_json(&json!({"rd_spend": "lots"})).unwrap_err();
        assert!(matches!(err, ProfitError::InvalidInput(_)));
        assert!(err.to_string().contains("rd_spend"));

        let err = PredictRequest::from_json(&json!({"administration": null})).unwrap_err();
        assert!(matches!(err, ProfitError::InvalidInput(_)));

        let err = PredictRequest::from_json(&json!({"marketing_spend": "nan"})).unwrap_err();
        assert!(matches!(err, ProfitError::InvalidInput(_)));
    }

    #[test]
    fn test_non_string_state_rejected() {
        let err = PredictRequest::from_json(&json!({"state": 3})).unwrap_err();
        assert!(err.to_string().contains("state"));
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(PredictRequest::from_json(&json!([1, 2, 3])).is_err());
        assert!(PredictRequest::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_to_frame_column_order() {
        let frame = PredictRequest::new(1.0, 2.0, 3.0, "California").to_frame().unwrap();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, FEATURE_COLUMNS.to_vec());
        assert_eq!(frame.height(), 1);
    }
}
