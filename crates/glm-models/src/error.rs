//! Model-related error types

use thiserror::Error;

use glm_core::data::DataError;
use glm_core::formula::FormulaError;

/// Model-related errors
#[derive(Debug, Error)]
pub enum ModelError {
    /// Formula parsing or evaluation error
    #[error("Formula error: {0}")]
    Formula(#[from] FormulaError),

    /// Data-related error
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// The Hessian could not be inverted
    #[error("Singular Hessian at iteration {iteration}")]
    SingularHessian {
        /// Iteration at which the inversion failed
        iteration: usize,
    },

    /// Numerical computation error
    #[error("Numerical error: {message} (operation: {operation})")]
    NumericalError {
        /// Error message
        message: String,
        /// Operation that failed
        operation: String,
    },

    /// Insufficient data for model fitting
    #[error("Not enough data: {n_samples} samples for {n_predictors} predictors")]
    InsufficientData {
        /// Number of samples
        n_samples: usize,
        /// Number of predictors
        n_predictors: usize,
    },

    /// Invalid model configuration
    #[error("Invalid model configuration: {message}")]
    InvalidConfig {
        /// Configuration error message
        message: String,
    },

    /// Model not fitted yet
    #[error("Model not fitted yet")]
    NotFitted,

    /// New data does not match the layout the model was fitted with
    #[error("Prediction error: {message}")]
    PredictionError {
        /// Prediction error message
        message: String,
    },
}

/// Coarse classification of [`ModelError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unsupported formula
    Parse,
    /// Data that does not fit the formula or the fitted model
    Schema,
    /// Singular or non-finite linear algebra
    Numeric,
    /// Unsupported family and algorithm combination, or bad settings
    Config,
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Formula(
                FormulaError::Syntax { .. } | FormulaError::UnsupportedInteraction { .. },
            ) => ErrorKind::Parse,
            ModelError::Formula(_)
            | ModelError::Data(_)
            | ModelError::InsufficientData { .. }
            | ModelError::PredictionError { .. } => ErrorKind::Schema,
            ModelError::SingularHessian { .. } | ModelError::NumericalError { .. } => {
                ErrorKind::Numeric
            }
            ModelError::InvalidConfig { .. } | ModelError::NotFitted => ErrorKind::Config,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        ModelError::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn prediction(message: impl Into<String>) -> Self {
        ModelError::PredictionError {
            message: message.into(),
        }
    }
}
