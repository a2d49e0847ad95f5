//! Chi-square objective with uncertainties on both axes.
//!
//! Each point contributes
//!
//! ```text
//! (y_i - f(x_i))^2 / (dy_i^2 + ((f(x_i + dx_i) - f(x_i - dx_i)) / 2)^2)
//! ```
//!
//! The second variance term propagates the x uncertainty through the local
//! slope of the model, so steep regions and points with a large `dx` weigh
//! less. This is the effective variance method, not plain weighted least
//! squares.

use ndarray::{Array1, ArrayView1};

use crate::data::DataSet;
use crate::error::{FitError, Result};
use crate::models::ModelFunction;

/// Effective variance of a single point.
#[inline]
fn effective_variance(model: &ModelFunction, x: f64, dx: f64, dy: f64, a: ArrayView1<'_, f64>) -> f64 {
    let half_rise = (model.eval(x + dx, a) - model.eval(x - dx, a)) / 2.0;
    dy * dy + half_rise * half_rise
}

/// Calculate the chi-square of `params` against `data`.
///
/// A non-finite total (the model left its domain or overflowed) is reported as
/// `f64::INFINITY`.
///
/// # Errors
///
/// * `FitError::DimensionMismatch` if `params` does not fit the model
/// * `FitError::DegenerateVariance` if an effective variance is exactly zero
pub fn chi_square(model: &ModelFunction, data: &DataSet, params: &Array1<f64>) -> Result<f64> {
    model.check_parameters(params)?;
    let a = params.view();
    let (x, dx, y, dy) = (data.x(), data.dx(), data.y(), data.dy());

    let mut chi2 = 0.0;
    for i in 0..data.len() {
        let variance = effective_variance(model, x[i], dx[i], dy[i], a);
        if variance == 0.0 {
            return Err(FitError::DegenerateVariance { index: i });
        }
        let residual = y[i] - model.eval(x[i], a);
        chi2 += residual * residual / variance;
    }

    if chi2.is_finite() {
        Ok(chi2)
    } else {
        Ok(f64::INFINITY)
    }
}

/// Effective variance of every point.
///
/// # Panics
///
/// Panics if `params` is shorter than the model's parameter count.
pub fn effective_variances(model: &ModelFunction, data: &DataSet, params: &Array1<f64>) -> Array1<f64> {
    let a = params.view();
    (0..data.len())
        .map(|i| effective_variance(model, data.x()[i], data.dx()[i], data.dy()[i], a))
        .collect()
}

/// Residuals `y - f(x)` of every point.
///
/// # Panics
///
/// Panics if `params` is shorter than the model's parameter count.
pub fn residuals(model: &ModelFunction, data: &DataSet, params: &Array1<f64>) -> Array1<f64> {
    data.y() - &model.eval_many(data.x(), params.view())
}
