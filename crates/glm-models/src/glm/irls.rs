//! Iteratively reweighted least squares
//!
//! For a canonical link the Newton step on the log-likelihood is
//! `b - H⁻¹ Xᵗ(y - μ)` with `H = -Xᵗ W X` and `W = diag(Var(μ))`. Iteration
//! starts at zero and stops once the summed absolute change of the
//! coefficients falls below `epsilon`. Standard errors come from the Hessian
//! at the final coefficients.

use super::family::Family;
use super::solve::{invert_hessian, standard_errors, weighted_gram};
use super::{GlmConfig, GlmFit, Matrix, Vector};
use crate::base::{ModelError, Result};

pub(crate) fn fit(x: &Matrix, y: &Vector, family: Family, config: &GlmConfig) -> Result<GlmFit> {
    let mut beta = Vector::zeros(x.ncols());
    let mut iterations = 0;
    let mut converged = false;

    for iteration in 1..=config.iterations {
        iterations = iteration;

        let mu = family.measurement(x, &beta);
        let jacobian = x.t().dot(&(y - &mu));
        let step = invert_hessian(&hessian(x, &mu, family), iteration)?.dot(&jacobian);
        let updated = &beta - &step;

        let change: f64 = (&updated - &beta).mapv(f64::abs).sum();
        if !change.is_finite() {
            return Err(ModelError::NumericalError {
                message: format!("non-finite coefficients at iteration {}", iteration),
                operation: "irls".to_string(),
            });
        }
        log::debug!("IRLS iteration {}: coefficient change {:.3e}", iteration, change);

        beta = updated;
        if change < config.epsilon {
            converged = true;
            break;
        }
    }

    if converged {
        log::info!("IRLS ({}) converged after {} iterations", family, iterations);
    } else {
        log::warn!(
            "IRLS ({}) did not converge within {} iterations",
            family,
            iterations
        );
    }

    let mu = family.measurement(x, &beta);
    let inverse = invert_hessian(&hessian(x, &mu, family), iterations)?;
    let standard_errors = standard_errors(&inverse, beta.len());

    Ok(GlmFit::new(
        beta,
        standard_errors,
        iterations,
        converged,
        None,
        mu,
        y,
    ))
}

fn hessian(x: &Matrix, mu: &Vector, family: Family) -> Matrix {
    let weights = mu.mapv(|m| family.variance(m));
    -weighted_gram(x, &weights)
}
