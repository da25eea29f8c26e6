//! Model training
//!
//! - Regression trees and a bagged random forest
//! - Shuffled train/test split and R² scoring
//! - The persisted [`ProfitModel`] with its metadata sidecar
//! - [`Trainer`], which runs the whole pipeline end to end

mod config;
pub mod decision_tree;
pub mod importance;
pub mod metadata;
pub mod metrics;
mod model;
pub mod random_forest;
pub mod split;
mod trainer;

pub use config::{ArtifactPaths, TrainingConfig, DEFAULT_META_PATH, DEFAULT_MODEL_PATH};
pub use decision_tree::{DecisionTree, TreeNode};
pub use importance::aggregate_importances;
pub use metadata::{read_metadata_value, ModelMetadata};
pub use metrics::r2_score;
pub use model::ProfitModel;
pub use random_forest::{MaxFeatures, RandomForest};
pub use split::{train_test_split, TrainTestSplit};
pub use trainer::{FitOutcome, ImportanceFn, Trainer, TrainingReport};
