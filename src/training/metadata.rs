//! JSON sidecar describing the last training run

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

/// Timestamp layout of `trained_at`, microsecond precision with a `Z` suffix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Layout used when the sub-second part is zero
const WHOLE_SECOND_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Summary of a training run written next to the model artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Absolute path of the dataset the model was fitted on
    pub trained_on: String,
    pub train_r2: f64,
    pub test_r2: f64,
    pub trained_at: String,
    /// Importance per raw input column; empty if it could not be computed
    pub importances: BTreeMap<String, f64>,
}

impl ModelMetadata {
    pub fn new(
        trained_on: &Path,
        train_r2: f64,
        test_r2: f64,
        importances: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            trained_on: trained_on.display().to_string(),
            train_r2,
            test_r2,
            trained_at: format_timestamp(Utc::now()),
            importances,
        }
    }

    /// Write as pretty JSON, replacing any previous file
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Render `at` as ISO 8601 in UTC. Microseconds are dropped entirely when
/// they are zero.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    let layout = if at.timestamp_subsec_micros() == 0 {
        WHOLE_SECOND_FORMAT
    } else {
        TIMESTAMP_FORMAT
    };
    at.format(layout).to_string()
}

/// Read the metadata file as untyped JSON.
///
/// `Ok(None)` means the file does not exist; unreadable or malformed
/// content is an error.
pub fn read_metadata_value(path: &Path) -> Result<Option<Value>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&json)?))
}
