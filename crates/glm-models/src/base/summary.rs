//! Model summary structures

use super::coefficient::Coefficient;
use super::statistics::ModelStatistics;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Printable overview of a fitted model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Model type
    pub model_type: ModelType,
    /// Fitting method, `IRLS` or `Newton-Raphson`
    pub method: String,
    /// Model formula, or the response name for matrix fits
    pub formula: String,
    /// Number of observations
    pub n_obs: usize,
    /// Number of design columns (including the constant)
    pub n_predictors: usize,
    /// Coefficients table
    pub coefficients: Vec<Coefficient>,
    /// Model statistics
    pub model_statistics: ModelStatistics,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Summary")?;
        writeln!(f, "=============")?;
        writeln!(f, "Model Type: {}", self.model_type)?;
        writeln!(f, "Method: {}", self.method)?;
        writeln!(f, "Formula: {}", self.formula)?;
        writeln!(f, "Observations: {}", self.n_obs)?;
        writeln!(f, "Predictors: {}", self.n_predictors)?;
        writeln!(f)?;

        // Coefficients
        writeln!(f, "Coefficients:")?;
        writeln!(
            f,
            "{:<20} {:>12} {:>12} {:>12} {:>12}",
            "Term", "Estimate", "Std Error", "z-value", "p-value"
        )?;
        writeln!(
            f,
            "{:-<20} {:-<12} {:-<12} {:-<12} {:-<12}",
            "", "", "", "", ""
        )?;

        for coeff in &self.coefficients {
            writeln!(
                f,
                "{:<20} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
                coeff.name,
                coeff.estimate,
                coeff.std_error.unwrap_or(f64::NAN),
                coeff.z_stat.unwrap_or(f64::NAN),
                coeff.p_value.unwrap_or(f64::NAN)
            )?;
        }
        writeln!(f)?;

        // Model statistics
        let stats = &self.model_statistics;
        writeln!(f, "Model Statistics:")?;
        if let Some(log_lik) = stats.log_likelihood {
            writeln!(f, "  Log-likelihood: {:.4}", log_lik)?;
        }
        if let Some(aic) = stats.aic {
            writeln!(f, "  AIC: {:.4}", aic)?;
        }
        if let Some(bic) = stats.bic {
            writeln!(f, "  BIC: {:.4}", bic)?;
        }
        if let Some(df_resid) = stats.df_residual {
            writeln!(f, "  Residual DF: {}", df_resid)?;
        }
        if let Some(df_model) = stats.df_model {
            writeln!(f, "  Model DF: {}", df_model)?;
        }
        if let Some(iterations) = stats.iterations {
            let status = match stats.converged {
                Some(false) => " (not converged)",
                _ => "",
            };
            writeln!(f, "  Iterations: {}{}", iterations, status)?;
        }

        Ok(())
    }
}

/// Model type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelType {
    /// Logit link, Bernoulli response
    LogisticRegression,
    /// Probit link, Bernoulli response
    ProbitRegression,
    /// Log link, count response
    PoissonRegression,
    /// Identity link, Gaussian response
    NormalRegression,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelType::LogisticRegression => write!(f, "Logistic Regression"),
            ModelType::ProbitRegression => write!(f, "Probit Regression"),
            ModelType::PoissonRegression => write!(f, "Poisson Regression"),
            ModelType::NormalRegression => write!(f, "Normal Regression"),
        }
    }
}
