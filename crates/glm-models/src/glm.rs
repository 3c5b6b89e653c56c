//! Generalized linear models
//!
//! A fit is described by a [`Family`] (the mean function and, for
//! Newton-Raphson, the log-likelihood) and a [`GlmConfig`], which is resolved
//! into an [`Estimator`] before any numeric work. Logistic and Poisson models
//! can be fitted by IRLS; logistic, probit and normal models by
//! Newton-Raphson maximum likelihood.

use ndarray::{Array1, Array2};

use glm_core::data::{DataError, DataFrame};
use glm_core::formula::CONSTANT_COLUMN;

use crate::base::Result;

pub mod config;
pub mod family;
mod irls;
mod mle;
pub mod model;
pub mod regression;
pub mod result;
mod solve;


pub use config::{Algorithm, Estimator, GlmConfig, StopCriterion};
pub use family::Family;
pub use model::GlmModel;
pub use regression::Regression;
pub use result::{GlmFit, ModelSnapshot};

/// Matrix type alias for 2D arrays
pub type Matrix = Array2<f64>;

/// Vector type alias for 1D arrays
pub type Vector = Array1<f64>;

/// Fit `response` on every other column of `df`
///
/// All predictors must be numeric. When the configuration asks for a
/// constant (the normal family always does), a [`CONSTANT_COLUMN`] holding
/// that value is appended after the predictors.
pub fn fit(df: &DataFrame, response: &str, family: Family, config: &GlmConfig) -> Result<GlmModel> {
    let estimator = config.resolve(family)?;
    let y = df.float_column(response)?;

    let mut names: Vec<String> = df
        .column_names()
        .into_iter()
        .filter(|name| *name != response)
        .map(str::to_string)
        .collect();

    let constant = config.constant_for(family);
    if constant.is_some() {
        if names.iter().any(|name| name == CONSTANT_COLUMN) {
            return Err(DataError::DuplicateColumn(CONSTANT_COLUMN.to_string()).into());
        }
        names.push(CONSTANT_COLUMN.to_string());
    }

    let x = model::predictor_matrix(df, &names, constant)?;
    GlmModel::estimate(&x, &y, names, estimator, config, constant, response)
}

/// Parse `formula` against `data` and fit it
pub fn regression(
    formula: &str,
    data: &DataFrame,
    family: Family,
    config: GlmConfig,
) -> Result<Regression> {
    Regression::new(formula, data, family, config)?.fit()
}
