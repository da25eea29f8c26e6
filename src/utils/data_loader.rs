//! Dataset discovery and CSV loading

use crate::error::{ProfitError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Preferred dataset file name, searched for upward from the search root
pub const DATA_FILENAME: &str = "50_Startups.csv";

/// Legacy dataset file name, resolved against the working directory
pub const LEGACY_DATA: &str = "startup_data.csv";

/// Maximum number of directories inspected by the upward search
pub const MAX_SEARCH_LEVELS: usize = 6;

/// Where a located dataset came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSource {
    Explicit,
    Discovered,
    Legacy,
}

/// Resolves which dataset file to train on
#[derive(Debug, Clone)]
pub struct DatasetLocator {
    /// Path given by the caller; bypasses discovery when set
    pub explicit: Option<PathBuf>,
    /// First directory of the upward search
    pub search_root: PathBuf,
    /// Number of directories inspected, the search root included
    pub max_levels: usize,
    pub file_name: String,
    pub legacy_path: PathBuf,
}

impl Default for DatasetLocator {
    fn default() -> Self {
        Self {
            explicit: std::env::var_os("DATASET_PATH").map(PathBuf::from),
            search_root: Self::default_search_root(),
            max_levels: MAX_SEARCH_LEVELS,
            file_name: DATA_FILENAME.to_string(),
            legacy_path: PathBuf::from(LEGACY_DATA),
        }
    }
}

impl DatasetLocator {
    /// Locator that only searches upward from `root`, with the legacy file
    /// expected directly inside `root`
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            explicit: None,
            legacy_path: root.join(LEGACY_DATA),
            search_root: root,
            max_levels: MAX_SEARCH_LEVELS,
            file_name: DATA_FILENAME.to_string(),
        }
    }

    /// Use an explicit dataset path
    pub fn with_explicit(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit = Some(path.into());
        self
    }

    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = root.into();
        self
    }

    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    pub fn with_legacy_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_path = path.into();
        self
    }

    /// `DATASET_SEARCH_DIR`, else the directory holding the running binary,
    /// else the working directory.
    fn default_search_root() -> PathBuf {
        if let Some(dir) = std::env::var_os("DATASET_SEARCH_DIR") {
            return PathBuf::from(dir);
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Search upward for the preferred file name.
    ///
    /// Inspects at most `max_levels` directories and stops at the filesystem
    /// root.
    pub fn find_upward(&self) -> Option<PathBuf> {
        let mut current = Some(self.search_root.as_path());

        for _ in 0..self.max_levels {
            let Some(dir) = current else { break };

            let candidate = dir.join(&self.file_name);
            debug!(candidate = %candidate.display(), "Checking for dataset");
            if candidate.is_file() {
                return Some(candidate);
            }

            current = match dir.parent() {
                // `Path::new("a").parent()` is `Some("")`; treat it as the top
                Some(parent) if parent.as_os_str().is_empty() => None,
                other => other,
            };
        }

        None
    }

    /// Resolve the dataset path or fail naming both candidate files
    pub fn locate(&self) -> Result<(PathBuf, DatasetSource)> {
        if let Some(path) = &self.explicit {
            return Ok((path.clone(), DatasetSource::Explicit));
        }

        if let Some(found) = self.find_upward() {
            return Ok((found, DatasetSource::Discovered));
        }

        if self.legacy_path.is_file() {
            return Ok((self.legacy_path.clone(), DatasetSource::Legacy));
        }

        Err(ProfitError::DatasetNotFound {
            preferred: self.file_name.clone(),
            legacy: self
                .legacy_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| LEGACY_DATA.to_string()),
        })
    }
}

/// A dataset read into memory together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub path: PathBuf,
    pub source: DatasetSource,
    pub frame: DataFrame,
}

impl LoadedDataset {
    /// Absolute form of the dataset path
    pub fn absolute_path(&self) -> PathBuf {
        std::fs::canonicalize(&self.path)
            .or_else(|_| std::path::absolute(&self.path))
            .unwrap_or_else(|_| self.path.clone())
    }
}

/// Loads the training dataset
#[derive(Debug, Clone, Default)]
pub struct DataLoader {
    locator: DatasetLocator,
}

impl DataLoader {
    pub fn new(locator: DatasetLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &DatasetLocator {
        &self.locator
    }

    /// Locate and read the dataset
    pub fn load(&self) -> Result<LoadedDataset> {
        let (path, source) = self.locator.locate()?;
        match source {
            DatasetSource::Legacy => info!(path = %path.display(), "Using legacy dataset"),
            _ => info!(path = %path.display(), "Found dataset"),
        }

        let frame = Self::load_csv(&path)?;
        Ok(LoadedDataset { path, source, frame })
    }

    /// Read a CSV file and trim whitespace around every column name
    pub fn load_csv(path: &Path) -> Result<DataFrame> {
        let file = File::open(path)
            .map_err(|e| ProfitError::DataError(format!("{}: {}", path.display(), e)))?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| ProfitError::DataError(e.to_string()))?;

        Self::strip_column_names(df)
    }

    fn strip_column_names(df: DataFrame) -> Result<DataFrame> {
        let columns: Vec<Column> = df
            .get_columns()
            .iter()
            .map(|column| {
                let trimmed: PlSmallStr = column.name().trim().into();
                let mut column = column.clone();
                column.rename(trimmed);
                column
            })
            .collect();

        DataFrame::new(columns).map_err(|e| ProfitError::DataError(e.to_string()))
    }
}
