//! Fit statistics

use serde::{Deserialize, Serialize};

/// Model statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStatistics {
    /// Log-likelihood at the estimates, when the engine computes one
    pub log_likelihood: Option<f64>,
    /// AIC
    pub aic: Option<f64>,
    /// BIC
    pub bic: Option<f64>,
    /// Residual degrees of freedom
    pub df_residual: Option<usize>,
    /// Model degrees of freedom
    pub df_model: Option<usize>,
    /// Number of iterations
    pub iterations: Option<usize>,
    /// Convergence status
    pub converged: Option<bool>,
}

impl ModelStatistics {
    /// Information criteria from a log-likelihood over `n_obs` rows and `n_params` parameters
    pub fn information_criteria(log_likelihood: f64, n_obs: usize, n_params: usize) -> (f64, f64) {
        let k = n_params as f64;
        let aic = 2.0 * k - 2.0 * log_likelihood;
        let bic = k * (n_obs as f64).ln() - 2.0 * log_likelihood;
        (aic, bic)
    }
}
