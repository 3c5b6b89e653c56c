//! Fitted values and their serialized form

use serde::{Deserialize, Serialize};

use glm_core::data::DataError;

use super::Vector;
use crate::base::Result;

/// Output of a fitting engine
#[derive(Debug, Clone, PartialEq)]
pub struct GlmFit {
    /// Coefficients, one per design column
    pub coefficients: Vector,
    /// Standard errors of the coefficients
    pub standard_errors: Vector,
    /// Iterations actually run
    pub iterations: usize,
    /// Whether the stopping rule was met before the iteration cap
    pub converged: bool,
    /// Log-likelihood at the estimates (Newton-Raphson only)
    pub log_likelihood: Option<f64>,
    /// Mean response at the estimates
    pub fitted_values: Vector,
    /// Response minus fitted values
    pub residuals: Vector,
    /// Rows minus design columns
    pub df_residual: usize,
}

impl GlmFit {
    pub(crate) fn new(
        coefficients: Vector,
        standard_errors: Vector,
        iterations: usize,
        converged: bool,
        log_likelihood: Option<f64>,
        fitted_values: Vector,
        y: &Vector,
    ) -> Self {
        let residuals = y - &fitted_values;
        let df_residual = y.len().saturating_sub(coefficients.len());

        Self {
            coefficients,
            standard_errors,
            iterations,
            converged,
            log_likelihood,
            fitted_values,
            residuals,
            df_residual,
        }
    }

    /// Flat serializable record of the fit
    pub fn snapshot(&self, column_names: &[String]) -> ModelSnapshot {
        ModelSnapshot {
            coefficients: self.coefficients.to_vec(),
            iterations: self.iterations,
            standard_errors: self.standard_errors.to_vec(),
            fitted_mean_values: self.fitted_values.to_vec(),
            residuals: self.residuals.to_vec(),
            degrees_of_freedom: self.df_residual,
            log_likelihood: self.log_likelihood,
            converged: Some(self.converged),
            column_names: column_names.to_vec(),
        }
    }

    /// Rebuild a fit from a snapshot without refitting
    pub fn from_snapshot(snapshot: &ModelSnapshot) -> Result<Self> {
        if snapshot.standard_errors.len() != snapshot.coefficients.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} standard errors", snapshot.coefficients.len()),
                actual: snapshot.standard_errors.len().to_string(),
            }
            .into());
        }
        if snapshot.residuals.len() != snapshot.fitted_mean_values.len() {
            return Err(DataError::DimensionMismatch {
                expected: format!("{} residuals", snapshot.fitted_mean_values.len()),
                actual: snapshot.residuals.len().to_string(),
            }
            .into());
        }

        Ok(Self {
            coefficients: Vector::from(snapshot.coefficients.clone()),
            standard_errors: Vector::from(snapshot.standard_errors.clone()),
            iterations: snapshot.iterations,
            converged: snapshot.converged.unwrap_or(true),
            log_likelihood: snapshot.log_likelihood,
            fitted_values: Vector::from(snapshot.fitted_mean_values.clone()),
            residuals: Vector::from(snapshot.residuals.clone()),
            df_residual: snapshot.degrees_of_freedom,
        })
    }
}

/// Persisted form of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub coefficients: Vec<f64>,
    pub iterations: usize,
    pub standard_errors: Vec<f64>,
    pub fitted_mean_values: Vec<f64>,
    pub residuals: Vec<f64>,
    pub degrees_of_freedom: usize,
    #[serde(default)]
    pub log_likelihood: Option<f64>,
    #[serde(default)]
    pub converged: Option<bool>,
    /// Design column names; empty in snapshots written without them
    #[serde(default)]
    pub column_names: Vec<String>,
}
