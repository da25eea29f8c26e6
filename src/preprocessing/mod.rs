//! Feature preprocessing
//!
//! - Standard scaling of numeric columns, fitted on the training split
//! - One-hot encoding of categorical columns with unknown-category tolerance
//! - [`FeaturePipeline`] composing both into a dense feature matrix

mod encoder;
mod pipeline;
mod scaler;

pub use encoder::{ColumnCategories, OneHotEncoder};
pub use pipeline::FeaturePipeline;
pub use scaler::{ColumnScale, StandardScaler};

pub(crate) use scaler::numeric_values;
