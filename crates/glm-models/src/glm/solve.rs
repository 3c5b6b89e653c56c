//! Hessian inversion shared by both engines

use ndarray::Axis;
use ndarray_linalg::{Inverse, SVD};

use super::{Matrix, Vector};
use crate::base::{ModelError, Result};

/// Reciprocal condition number below which a Hessian counts as singular
const MIN_RCOND: f64 = 1e-12;

/// `Xᵗ diag(w) X`
pub(crate) fn weighted_gram(x: &Matrix, weights: &Vector) -> Matrix {
    let weighted = x * &weights.view().insert_axis(Axis(1));
    x.t().dot(&weighted)
}

/// Invert `hessian`, failing on (numerically) singular matrices
///
/// The condition number is taken after scaling rows and columns by the
/// inverse square root of the diagonal magnitudes, so badly scaled but
/// well-posed problems are not rejected.
pub(crate) fn invert_hessian(hessian: &Matrix, iteration: usize) -> Result<Matrix> {
    if hessian.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NumericalError {
            message: format!("non-finite Hessian at iteration {}", iteration),
            operation: "hessian".to_string(),
        });
    }

    let scale = hessian.diag().mapv(|d| {
        let magnitude = d.abs();
        if magnitude > 0.0 {
            magnitude.sqrt().recip()
        } else {
            1.0
        }
    });
    let scaled = Matrix::from_shape_fn(hessian.raw_dim(), |(i, j)| {
        hessian[[i, j]] * scale[i] * scale[j]
    });

    let (_, singular_values, _) =
        scaled
            .svd(false, false)
            .map_err(|e| ModelError::NumericalError {
                message: format!("SVD failed: {}", e),
                operation: "svd".to_string(),
            })?;

    let largest = singular_values.fold(0.0_f64, |a, &b| a.max(b));
    let smallest = singular_values.fold(f64::INFINITY, |a, &b| a.min(b));
    if largest <= 0.0 || smallest / largest < MIN_RCOND {
        log::debug!(
            "Hessian rejected at iteration {}: rcond {:.3e}",
            iteration,
            smallest / largest
        );
        return Err(ModelError::SingularHessian { iteration });
    }

    let inverse = hessian
        .inv()
        .map_err(|_| ModelError::SingularHessian { iteration })?;
    if inverse.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::SingularHessian { iteration });
    }

    Ok(inverse)
}

/// Square roots of the negated diagonal of an inverse Hessian
pub(crate) fn standard_errors(inverse_hessian: &Matrix, count: usize) -> Vector {
    inverse_hessian
        .diag()
        .iter()
        .take(count)
        .map(|&v| (-v).sqrt())
        .collect()
}
