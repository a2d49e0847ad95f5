//! # Uncertainty Calculation
//!
//! Parameter uncertainties are estimated by treating the chi-square as a
//! paraboloid around the fitted parameters:
//!
//! - the curvature matrix (half the Hessian of the chi-square) is computed by
//!   forward differences with the fit's step sizes;
//! - its inverse is the covariance matrix;
//! - the square roots of the covariance diagonal are the standard errors.
//!
//! This runs once, after the minimization has finished.

mod covariance;

pub use covariance::{calculate_correlation, invert_curvature, standard_errors_from_covariance};
pub use crate::utils::finite_difference::curvature_matrix;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::problem::Problem;

/// Uncertainty of fitted parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterUncertainty {
    /// Covariance matrix for the parameters
    pub covariance: Array2<f64>,
    /// Standard errors for each parameter
    pub standard_errors: Array1<f64>,
    /// Correlation matrix derived from covariance
    pub correlation: Array2<f64>,
}

/// Estimate parameter uncertainties at `params`.
///
/// # Arguments
///
/// * `problem` - The fitted problem
/// * `params` - The fitted parameters
/// * `step_sizes` - Finite difference steps, normally those of the minimization
/// * `max_condition` - Largest accepted condition number of the curvature matrix
///
/// # Errors
///
/// * `FitError::SingularMatrix` if the curvature matrix cannot be inverted reliably
pub fn estimate_uncertainty<P: Problem + ?Sized>(
    problem: &P,
    params: &Array1<f64>,
    step_sizes: &Array1<f64>,
    max_condition: f64,
) -> Result<ParameterUncertainty> {
    let curvature = curvature_matrix(problem, params, step_sizes)?;
    let covariance = invert_curvature(&curvature, max_condition)?;
    let standard_errors = standard_errors_from_covariance(&covariance);
    let correlation = calculate_correlation(&covariance);

    Ok(ParameterUncertainty {
        covariance,
        standard_errors,
        correlation,
    })
}
