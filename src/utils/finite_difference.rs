//! Finite difference methods for the chi-square objective.
//!
//! This module provides the per-parameter step sizes, the normalized descent
//! direction used by the optimizer, and the curvature matrix used by the
//! uncertainty estimator. All of them work on any [`Problem`].

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::problem::Problem;

/// Default step size, as a fraction of each parameter's magnitude.
pub const DEFAULT_STEP_FRACTION: f64 = 0.01;

/// Default perturbation used for the descent direction, as a fraction of the step size.
pub const DEFAULT_GRADIENT_FRACTION: f64 = 0.01;

/// Compute the per-parameter step sizes `|a_i| * fraction + f64::EPSILON`.
///
/// The epsilon keeps the step non-zero when a parameter is exactly zero.
pub fn step_sizes(params: &Array1<f64>, fraction: f64) -> Array1<f64> {
    params.mapv(|a| a.abs() * fraction + f64::EPSILON)
}

/// Compute the normalized descent direction at `params`.
///
/// Each parameter is perturbed on its own by `da_i = fraction * step_sizes[i]`
/// and `g_i = chi2(a) - chi2(a + da_i)` is recorded, so positive entries point
/// downhill. The vector is then scaled to `g_i * step_sizes[i] / |g|`, which
/// expresses the direction in units of each parameter's natural magnitude
/// rather than in units of the gradient.
///
/// # Arguments
///
/// * `problem` - The problem to evaluate
/// * `params` - The parameter values at which to evaluate the direction
/// * `chi_square` - The chi-square at `params`
/// * `step_sizes` - The per-parameter step sizes
/// * `fraction` - The perturbation as a fraction of the step sizes
///
/// # Returns
///
/// * `Ok(Some(direction))` in the usual case
/// * `Ok(None)` if no perturbation changes the chi-square
///
/// # Errors
///
/// * `FitError::NumericalError` if a perturbed chi-square is not finite
pub fn descent_direction<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    chi_square: f64,
    step_sizes: &Array1<f64>,
    fraction: f64,
) -> Result<Option<Array1<f64>>> {
    let n_params = params.len();
    if step_sizes.len() != n_params {
        return Err(FitError::DimensionMismatch(format!(
            "Expected {} step sizes, got {}",
            n_params,
            step_sizes.len()
        )));
    }

    let mut direction = Array1::zeros(n_params);
    for i in 0..n_params {
        let mut perturbed = params.clone();
        perturbed[i] += fraction * step_sizes[i];
        direction[i] = chi_square - problem.chi_square(&perturbed)?;
    }

    let norm_sq: f64 = direction.iter().map(|g| g * g).sum();
    if !norm_sq.is_finite() {
        return Err(FitError::NumericalError(format!(
            "Non-finite chi-square difference while estimating the gradient at {:?}",
            params
        )));
    }
    if norm_sq == 0.0 {
        return Ok(None);
    }

    let norm = norm_sq.sqrt();
    for i in 0..n_params {
        direction[i] *= step_sizes[i] / norm;
    }

    Ok(Some(direction))
}

/// Compute the curvature matrix of the chi-square using forward differences.
///
/// The entries are half the second partial derivatives of the chi-square:
///
/// ```text
/// H[i,j] = 0.5 * (chi2(a) - chi2(a+da_i) - chi2(a+da_j) + chi2(a+da_i+da_j)) / (da_i * da_j)
/// ```
///
/// with `da = step_sizes`. Its inverse is the parameter covariance matrix.
/// The evaluations at `a` and `a + da_i` are shared, and only the upper
/// triangle is computed, so the result is exactly symmetric.
pub fn curvature_matrix<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    step_sizes: &Array1<f64>,
) -> Result<Array2<f64>> {
    let n_params = params.len();
    if step_sizes.len() != n_params {
        return Err(FitError::DimensionMismatch(format!(
            "Expected {} step sizes, got {}",
            n_params,
            step_sizes.len()
        )));
    }

    let f0 = problem.chi_square(params)?;

    let mut f_single = Array1::zeros(n_params);
    for i in 0..n_params {
        let mut shifted = params.clone();
        shifted[i] += step_sizes[i];
        f_single[i] = problem.chi_square(&shifted)?;
    }

    let mut curvature = Array2::zeros((n_params, n_params));
    for i in 0..n_params {
        for j in i..n_params {
            let mut shifted = params.clone();
            shifted[i] += step_sizes[i];
            shifted[j] += step_sizes[j];
            let f_both = problem.chi_square(&shifted)?;

            let value =
                0.5 * (f0 - f_single[i] - f_single[j] + f_both) / (step_sizes[i] * step_sizes[j]);
            curvature[[i, j]] = value;
            curvature[[j, i]] = value;
        }
    }

    Ok(curvature)
}
