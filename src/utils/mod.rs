//! Utility functions and types

pub mod data_loader;

pub use data_loader::{
    DataLoader, DatasetLocator, DatasetSource, LoadedDataset, DATA_FILENAME, LEGACY_DATA,
    MAX_SEARCH_LEVELS,
};
