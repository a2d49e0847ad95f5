//! Logarithmic model shapes.
//!
//! Both shapes are only defined for `a1 * x > 0`. Outside that domain they
//! return NaN, which the chi-square evaluator scores as an infinitely bad fit.

use ndarray::ArrayView1;

/// Base 10 logarithm: `a0 * log10(a1 * x)`.
pub fn log10(x: f64, a: ArrayView1<'_, f64>) -> f64 {
    a[0] * (a[1] * x).log10()
}

/// Natural logarithm: `a0 * ln(a1 * x)`.
pub fn natural_log(x: f64, a: ArrayView1<'_, f64>) -> f64 {
    a[0] * (a[1] * x).ln()
}
