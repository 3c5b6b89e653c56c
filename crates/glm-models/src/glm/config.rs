//! Fitting configuration
//!
//! [`GlmConfig`] is a plain value with defaults. [`GlmConfig::resolve`]
//! checks it against a [`Family`] and returns the [`Estimator`] that runs the
//! fit, so an unsupported combination fails before any numeric work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::family::Family;
use super::mle::{LogisticLikelihood, NormalLikelihood, ProbitLikelihood};
use super::{GlmFit, Matrix, Vector, irls, mle};
use crate::base::{ModelError, Result};

/// Fitting algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Iteratively reweighted least squares
    #[default]
    Irls,
    /// Newton-Raphson maximum likelihood
    Mle,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Irls => f.write_str("irls"),
            Algorithm::Mle => f.write_str("mle"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "irls" => Ok(Algorithm::Irls),
            "mle" => Ok(Algorithm::Mle),
            _ => Err(ModelError::config(format!("unknown algorithm '{}'", s))),
        }
    }
}

/// When Newton-Raphson stops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCriterion {
    /// Every parameter moved by less than 1% of its value
    #[default]
    Parameters,
    /// The log-likelihood fell, or rose by less than `epsilon` relative to itself
    ///
    /// Newton steps are halved until the log-likelihood does not fall, so in
    /// practice this stops on the relative rise.
    LogLikelihood,
}

impl FromStr for StopCriterion {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "parameters" => Ok(StopCriterion::Parameters),
            "log_likelihood" | "mle" => Ok(StopCriterion::LogLikelihood),
            _ => Err(ModelError::config(format!("unknown stop criterion '{}'", s))),
        }
    }
}

/// GLM configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlmConfig {
    /// Fitting algorithm
    pub algorithm: Algorithm,
    /// Iteration cap
    pub iterations: usize,
    /// Convergence tolerance
    pub epsilon: f64,
    /// Value of the constant column appended by [`fit`](super::fit)
    pub constant: Option<f64>,
    /// Newton-Raphson stopping rule
    pub stop_criterion: StopCriterion,
}

impl Default for GlmConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::Irls,
            iterations: 100,
            epsilon: 1e-7,
            constant: Some(1.0),
            stop_criterion: StopCriterion::Parameters,
        }
    }
}

impl GlmConfig {
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = Some(constant);
        self
    }

    /// Do not append a constant column (ignored by the normal family)
    pub fn no_constant(mut self) -> Self {
        self.constant = None;
        self
    }

    pub fn with_stop_criterion(mut self, stop_criterion: StopCriterion) -> Self {
        self.stop_criterion = stop_criterion;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ModelError::config("iterations must be at least 1"));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(ModelError::config(format!(
                "epsilon must be a positive number, got {}",
                self.epsilon
            )));
        }
        if let Some(constant) = self.constant {
            if !constant.is_finite() || constant == 0.0 {
                return Err(ModelError::config(format!(
                    "constant must be finite and non-zero, got {}",
                    constant
                )));
            }
        }
        Ok(())
    }

    /// Check the settings and pick the estimator for `family`
    pub fn resolve(&self, family: Family) -> Result<Estimator> {
        self.validate()?;

        match (self.algorithm, family) {
            (Algorithm::Irls, Family::Logistic) => Ok(Estimator::IrlsLogistic),
            (Algorithm::Irls, Family::Poisson) => Ok(Estimator::IrlsPoisson),
            (Algorithm::Mle, Family::Logistic) => Ok(Estimator::MleLogistic),
            (Algorithm::Mle, Family::Probit) => Ok(Estimator::MleProbit),
            (Algorithm::Mle, Family::Normal) => Ok(Estimator::MleNormal),
            (algorithm, family) => Err(ModelError::config(format!(
                "the {} family cannot be fitted with {}",
                family, algorithm
            ))),
        }
    }

    /// Constant column value used for `family`
    pub fn constant_for(&self, family: Family) -> Option<f64> {
        match (self.constant, family) {
            (None, Family::Normal) => Some(1.0),
            (constant, _) => constant,
        }
    }
}

/// A supported family and algorithm pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Estimator {
    IrlsLogistic,
    IrlsPoisson,
    MleLogistic,
    MleProbit,
    MleNormal,
}

impl Estimator {
    pub fn family(self) -> Family {
        match self {
            Estimator::IrlsLogistic | Estimator::MleLogistic => Family::Logistic,
            Estimator::IrlsPoisson => Family::Poisson,
            Estimator::MleProbit => Family::Probit,
            Estimator::MleNormal => Family::Normal,
        }
    }

    pub fn algorithm(self) -> Algorithm {
        match self {
            Estimator::IrlsLogistic | Estimator::IrlsPoisson => Algorithm::Irls,
            _ => Algorithm::Mle,
        }
    }

    pub fn method_name(self) -> &'static str {
        match self.algorithm() {
            Algorithm::Irls => "IRLS",
            Algorithm::Mle => "Newton-Raphson",
        }
    }

    /// Run the fit on a design matrix and response
    pub fn fit(self, x: &Matrix, y: &Vector, config: &GlmConfig) -> Result<GlmFit> {
        match self {
            Estimator::IrlsLogistic | Estimator::IrlsPoisson => {
                irls::fit(x, y, self.family(), config)
            }
            Estimator::MleLogistic => mle::fit(&LogisticLikelihood, x, y, config),
            Estimator::MleProbit => mle::fit(&ProbitLikelihood, x, y, config),
            Estimator::MleNormal => mle::fit(&NormalLikelihood, x, y, config),
        }
    }
}
