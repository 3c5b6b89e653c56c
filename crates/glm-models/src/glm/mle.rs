//! Newton-Raphson maximum likelihood
//!
//! Each family supplies its log-likelihood, score and observed Hessian over
//! its own parameter vector; the normal family appends the variance to the
//! coefficients. The Newton step is halved while the candidate leaves the
//! parameter domain or lowers the log-likelihood.

use ndarray::s;
use statrs::distribution::{Continuous, ContinuousCDF, Normal as Gaussian};
use std::f64::consts::PI;

use super::family::{Family, sigmoid};
use super::solve::{invert_hessian, standard_errors, weighted_gram};
use super::{GlmConfig, GlmFit, Matrix, StopCriterion, Vector};
use crate::base::{ModelError, Result};

/// Step halvings tried before giving up on an iteration
const MAX_HALVINGS: usize = 40;

/// Relative parameter change accepted by [`StopCriterion::Parameters`]
const PARAMETER_TOLERANCE: f64 = 1e-2;

/// Log-likelihood of a family in its own parameterisation
pub(crate) trait Likelihood {
    fn family(&self) -> Family;

    /// Starting parameters for `k` design columns
    fn initial(&self, k: usize) -> Vector {
        Vector::zeros(k + self.family().extra_parameters())
    }

    fn is_valid(&self, _params: &Vector) -> bool {
        true
    }

    fn log_likelihood(&self, x: &Matrix, y: &Vector, params: &Vector) -> f64;

    fn score(&self, x: &Matrix, y: &Vector, params: &Vector) -> Vector;

    fn hessian(&self, x: &Matrix, y: &Vector, params: &Vector) -> Matrix;
}

pub(crate) struct LogisticLikelihood;

impl Likelihood for LogisticLikelihood {
    fn family(&self) -> Family {
        Family::Logistic
    }

    fn log_likelihood(&self, x: &Matrix, y: &Vector, params: &Vector) -> f64 {
        let eta = x.dot(params);
        eta.iter()
            .zip(y)
            .map(|(&e, &yi)| yi * e - softplus(e))
            .sum()
    }

    fn score(&self, x: &Matrix, y: &Vector, params: &Vector) -> Vector {
        let mu = x.dot(params).mapv(sigmoid);
        x.t().dot(&(y - &mu))
    }

    fn hessian(&self, x: &Matrix, _y: &Vector, params: &Vector) -> Matrix {
        let weights = x.dot(params).mapv(|e| {
            let p = sigmoid(e);
            p * (1.0 - p)
        });
        -weighted_gram(x, &weights)
    }
}

pub(crate) struct ProbitLikelihood;

impl Likelihood for ProbitLikelihood {
    fn family(&self) -> Family {
        Family::Probit
    }

    fn log_likelihood(&self, x: &Matrix, y: &Vector, params: &Vector) -> f64 {
        let normal = Gaussian::standard();
        x.dot(params)
            .iter()
            .zip(y)
            .map(|(&z, &yi)| yi * normal.cdf(z).ln() + (1.0 - yi) * normal.sf(z).ln())
            .sum()
    }

    fn score(&self, x: &Matrix, y: &Vector, params: &Vector) -> Vector {
        let normal = Gaussian::standard();
        let weights: Vector = x
            .dot(params)
            .iter()
            .zip(y)
            .map(|(&z, &yi)| {
                let (cdf, sf) = (normal.cdf(z), normal.sf(z));
                normal.pdf(z) * (yi - cdf) / (cdf * sf)
            })
            .collect();
        x.t().dot(&weights)
    }

    fn hessian(&self, x: &Matrix, y: &Vector, params: &Vector) -> Matrix {
        let normal = Gaussian::standard();
        let weights: Vector = x
            .dot(params)
            .iter()
            .zip(y)
            .map(|(&z, &yi)| {
                let (cdf, sf, density) = (normal.cdf(z), normal.sf(z), normal.pdf(z));
                -density
                    * (yi * (density + z * cdf) / cdf.powi(2)
                        + (1.0 - yi) * (density - z * sf) / sf.powi(2))
            })
            .collect();
        weighted_gram(x, &weights)
    }
}

/// Gaussian likelihood over `[coefficients..., variance]`
pub(crate) struct NormalLikelihood;

impl NormalLikelihood {
    const INITIAL_VARIANCE: f64 = 0.1;

    fn residuals(x: &Matrix, y: &Vector, params: &Vector) -> Vector {
        let k = x.ncols();
        y - &x.dot(&params.slice(s![..k]))
    }
}

impl Likelihood for NormalLikelihood {
    fn family(&self) -> Family {
        Family::Normal
    }

    fn initial(&self, k: usize) -> Vector {
        let mut params = Vector::zeros(k + 1);
        params[k] = Self::INITIAL_VARIANCE;
        params
    }

    fn is_valid(&self, params: &Vector) -> bool {
        params
            .last()
            .is_some_and(|&variance| variance.is_finite() && variance > 0.0)
    }

    fn log_likelihood(&self, x: &Matrix, y: &Vector, params: &Vector) -> f64 {
        let variance = params[x.ncols()];
        let rss = Self::residuals(x, y, params).mapv(|e| e * e).sum();
        -0.5 * y.len() as f64 * (2.0 * PI * variance).ln() - rss / (2.0 * variance)
    }

    fn score(&self, x: &Matrix, y: &Vector, params: &Vector) -> Vector {
        let k = x.ncols();
        let variance = params[k];
        let residuals = Self::residuals(x, y, params);
        let rss = residuals.mapv(|e| e * e).sum();

        let mut score = Vector::zeros(k + 1);
        score
            .slice_mut(s![..k])
            .assign(&(x.t().dot(&residuals) / variance));
        score[k] = -0.5 * y.len() as f64 / variance + rss / (2.0 * variance.powi(2));
        score
    }

    fn hessian(&self, x: &Matrix, y: &Vector, params: &Vector) -> Matrix {
        let k = x.ncols();
        let variance = params[k];
        let residuals = Self::residuals(x, y, params);
        let rss = residuals.mapv(|e| e * e).sum();
        let cross = -x.t().dot(&residuals) / variance.powi(2);

        let mut hessian = Matrix::zeros((k + 1, k + 1));
        hessian
            .slice_mut(s![..k, ..k])
            .assign(&(-x.t().dot(x) / variance));
        hessian.slice_mut(s![..k, k]).assign(&cross);
        hessian.slice_mut(s![k, ..k]).assign(&cross);
        hessian[[k, k]] = 0.5 * y.len() as f64 / variance.powi(2) - rss / variance.powi(3);
        hessian
    }
}

/// Maximize `likelihood` and package the public coefficients as a fit
pub(crate) fn fit<L: Likelihood>(
    likelihood: &L,
    x: &Matrix,
    y: &Vector,
    config: &GlmConfig,
) -> Result<GlmFit> {
    let k = x.ncols();
    let family = likelihood.family();

    let mut params = likelihood.initial(k);
    let mut current = likelihood.log_likelihood(x, y, &params);
    let mut reference = params.clone();
    let mut inverse = None;
    let mut iterations = 0;
    let mut converged = false;

    for iteration in 1..=config.iterations {
        iterations = iteration;

        let h_inv = invert_hessian(&likelihood.hessian(x, y, &params), iteration)?;
        let step = h_inv.dot(&likelihood.score(x, y, &params));
        inverse = Some(h_inv);

        let Some((candidate, candidate_ll)) = guarded_step(likelihood, x, y, &params, &step, current)
        else {
            log::warn!(
                "Newton-Raphson ({}) found no improving step within {} halvings at iteration {}",
                family,
                MAX_HALVINGS,
                iteration
            );
            break;
        };

        let previous = current;
        params = candidate;
        current = candidate_ll;
        log::debug!(
            "Newton-Raphson iteration {}: log-likelihood {:.10}",
            iteration,
            current
        );

        let stop = match config.stop_criterion {
            StopCriterion::Parameters => {
                params
                    .iter()
                    .zip(&reference)
                    .all(|(&new, &old)| settled(new, old, PARAMETER_TOLERANCE))
            }
            StopCriterion::LogLikelihood => {
                current < previous || settled(current, previous, config.epsilon)
            }
        };
        if stop {
            converged = true;
            break;
        }
        reference.assign(&params);
    }

    if converged {
        log::info!(
            "Newton-Raphson ({}) converged after {} iterations, log-likelihood {:.6}",
            family,
            iterations,
            current
        );
    } else {
        log::warn!(
            "Newton-Raphson ({}) stopped after {} iterations without converging",
            family,
            iterations
        );
    }

    let inverse = inverse.ok_or_else(|| ModelError::NumericalError {
        message: "no iteration was run".to_string(),
        operation: "newton-raphson".to_string(),
    })?;

    let coefficients = params.slice(s![..k]).to_owned();
    let standard_errors = standard_errors(&inverse, k);
    let fitted = family.measurement(x, &coefficients);

    Ok(GlmFit::new(
        coefficients,
        standard_errors,
        iterations,
        converged,
        Some(likelihood.log_likelihood(x, y, &params)),
        fitted,
        y,
    ))
}

/// Largest step `t · step`, `t = 1, 1/2, 1/4, ...`, that stays valid and does
/// not lower the log-likelihood
fn guarded_step<L: Likelihood>(
    likelihood: &L,
    x: &Matrix,
    y: &Vector,
    params: &Vector,
    step: &Vector,
    current: f64,
) -> Option<(Vector, f64)> {
    let floor = current - 1e-12 * current.abs();
    let mut scale = 1.0;

    for halvings in 0..MAX_HALVINGS {
        let candidate = params - &(step * scale);
        if likelihood.is_valid(&candidate) {
            let ll = likelihood.log_likelihood(x, y, &candidate);
            if ll.is_finite() && ll >= floor {
                if halvings > 0 {
                    log::debug!("step accepted after {} halvings", halvings);
                }
                return Some((candidate, ll));
            }
        }
        scale *= 0.5;
    }

    None
}

/// `new` moved by less than `tolerance` relative to itself; an unchanged
/// value counts as settled, zero included
fn settled(new: f64, old: f64, tolerance: f64) -> bool {
    new == old || ((new - old) / new).abs() < tolerance
}

fn softplus(z: f64) -> f64 {
    z.max(0.0) + (-z.abs()).exp().ln_1p()
}
