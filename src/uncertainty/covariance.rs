//! # Covariance Matrix Calculations
//!
//! This module inverts the chi-square curvature matrix into the parameter
//! covariance matrix and derives standard errors and correlations from it.

use ndarray::{Array1, Array2};

use crate::error::{FitError, Result};
use crate::utils::matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};

/// Invert a curvature matrix into a covariance matrix.
///
/// The matrix is checked with a singular value decomposition first: it is
/// rejected when its smallest singular value is zero or its condition number
/// exceeds `max_condition`. The inverse is symmetrized by averaging each
/// off-diagonal pair, which removes the rounding asymmetry of the inversion.
///
/// # Errors
///
/// * `FitError::DimensionMismatch` if the matrix is not square
/// * `FitError::SingularMatrix` if the matrix is singular, ill-conditioned,
///   or has non-finite entries
pub fn invert_curvature(curvature: &Array2<f64>, max_condition: f64) -> Result<Array2<f64>> {
    if curvature.nrows() != curvature.ncols() {
        return Err(FitError::DimensionMismatch(format!(
            "Curvature matrix must be square, got {}x{}",
            curvature.nrows(),
            curvature.ncols()
        )));
    }
    if curvature.iter().any(|v| !v.is_finite()) {
        return Err(FitError::SingularMatrix(
            "curvature matrix has non-finite entries".to_string(),
        ));
    }
    if curvature.is_empty() {
        return Ok(Array2::zeros((0, 0)));
    }

    let matrix = ndarray_to_nalgebra(curvature)?;

    let singular_values = matrix.clone().svd(false, false).singular_values;
    let largest = singular_values.iter().copied().fold(0.0, f64::max);
    let smallest = singular_values.iter().copied().fold(f64::INFINITY, f64::min);
    if !(smallest > 0.0) {
        return Err(FitError::SingularMatrix(
            "curvature matrix has a zero singular value".to_string(),
        ));
    }
    let condition = largest / smallest;
    if !(condition <= max_condition) {
        return Err(FitError::SingularMatrix(format!(
            "curvature matrix condition number {:.3e} exceeds {:.3e}",
            condition, max_condition
        )));
    }

    let inverse = matrix
        .try_inverse()
        .ok_or_else(|| FitError::SingularMatrix("curvature matrix is not invertible".to_string()))?;

    let symmetric = (&inverse + inverse.transpose()) * 0.5;
    Ok(nalgebra_to_ndarray(&symmetric))
}

/// Calculate correlation matrix from covariance matrix.
///
/// The correlation matrix is calculated as:
///   correl[i,j] = covar[i,j] / sqrt(covar[i,i] * covar[j,j])
///
/// This normalizes the covariance matrix so that diagonal elements are 1.0,
/// and off-diagonal elements represent correlation coefficients between -1 and 1.
pub fn calculate_correlation(covar: &Array2<f64>) -> Array2<f64> {
    let n = covar.nrows();
    let mut correl = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..n {
            if i == j {
                correl[[i, j]] = 1.0;
            } else {
                let denom = (covar[[i, i]] * covar[[j, j]]).sqrt();
                if denom > 0.0 {
                    correl[[i, j]] = covar[[i, j]] / denom;
                }
            }
        }
    }

    correl
}

/// Extract standard errors from the covariance matrix.
///
/// The errors are `sqrt(|covar[i,i]|)`; a negative diagonal entry only occurs
/// when the parameters are not at a minimum, and still yields a usable scale.
pub fn standard_errors_from_covariance(covar: &Array2<f64>) -> Array1<f64> {
    covar.diag().mapv(|v| v.abs().sqrt())
}
