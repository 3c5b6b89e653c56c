//! Shared model interface and result tables

use ndarray::Array1;

use glm_core::data::DataFrame;

pub use coefficient::Coefficient;
pub use statistics::ModelStatistics;
pub use summary::{ModelSummary, ModelType};

pub use crate::error::ModelError;

pub mod coefficient;
pub mod statistics;
pub mod summary;

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Base trait for fitted and fittable models
pub trait StatisticalModel: Send + Sync {
    /// Predict the mean response for `data`
    fn predict(&self, data: &DataFrame) -> Result<Array1<f64>>;

    /// Generate model summary
    fn summary(&self) -> Result<ModelSummary>;

    /// Check if model is fitted
    fn is_fitted(&self) -> bool;
}
