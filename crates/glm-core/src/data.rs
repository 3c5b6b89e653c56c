//! Tabular data for model fitting
//!
//! A [`DataFrame`] is an ordered set of equally long [`Series`]. Categorical
//! columns carry a [`Factor`]: level codes, the ordered level set and the
//! reference level used for reduced-rank (contrast) coding.

mod builder;
mod dataframe;
mod series;

#[cfg(test)]
mod tests;

// Re-exports
pub use builder::DataFrameBuilder;
pub use dataframe::DataFrame;
pub use series::{Factor, Series};

// Type aliases for common use cases
pub type FloatArray = ndarray::Array1<f64>;
pub type IntArray = ndarray::Array1<i64>;
pub type BoolArray = ndarray::Array1<bool>;
pub type StringArray = Vec<String>;
pub type Matrix = ndarray::Array2<f64>;

/// Error types specific to data operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Invalid column type: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("Operation requires numeric data, got {0}")]
    NonNumericData(&'static str),

    #[error("Unknown level '{level}' in categorical column '{column}'")]
    UnknownLevel { column: String, level: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl DataError {
    /// Attach a column name to a level error raised by a bare [`Factor`]
    pub(crate) fn in_column(self, name: &str) -> Self {
        match self {
            DataError::UnknownLevel { level, .. } => DataError::UnknownLevel {
                column: name.to_string(),
                level,
            },
            other => other,
        }
    }
}

/// Result type for data operations
pub type Result<T> = std::result::Result<T, DataError>;
