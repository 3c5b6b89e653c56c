//! Response families and their mean functions

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal as Gaussian};
use std::fmt;
use std::str::FromStr;

use super::{Matrix, Vector};
use crate::base::{ModelError, ModelType};

/// Distribution of the response and its link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Bernoulli response, logit link
    Logistic,
    /// Bernoulli response, probit link
    Probit,
    /// Count response, log link
    Poisson,
    /// Gaussian response, identity link
    Normal,
}

impl Family {
    pub const ALL: [Family; 4] = [
        Family::Logistic,
        Family::Probit,
        Family::Poisson,
        Family::Normal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Family::Logistic => "logistic",
            Family::Probit => "probit",
            Family::Poisson => "poisson",
            Family::Normal => "normal",
        }
    }

    /// Inverse link: expected response for a linear predictor
    pub fn mean(self, eta: f64) -> f64 {
        match self {
            Family::Logistic => sigmoid(eta),
            Family::Probit => Gaussian::standard().cdf(eta),
            Family::Poisson => eta.exp(),
            Family::Normal => eta,
        }
    }

    /// Variance of the response as a function of its mean
    pub fn variance(self, mu: f64) -> f64 {
        match self {
            Family::Logistic | Family::Probit => mu * (1.0 - mu),
            Family::Poisson => mu,
            Family::Normal => 1.0,
        }
    }

    /// Mean response for each row of `x`
    pub fn measurement(self, x: &Matrix, coefficients: &Vector) -> Vector {
        x.dot(coefficients).mapv(|eta| self.mean(eta))
    }

    pub fn model_type(self) -> ModelType {
        match self {
            Family::Logistic => ModelType::LogisticRegression,
            Family::Probit => ModelType::ProbitRegression,
            Family::Poisson => ModelType::PoissonRegression,
            Family::Normal => ModelType::NormalRegression,
        }
    }

    /// Parameters estimated beyond the coefficients
    pub(crate) fn extra_parameters(self) -> usize {
        match self {
            Family::Normal => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Family {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::config(format!("unknown family '{}'", s)))
    }
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
