//! Exponential model shape.

use ndarray::ArrayView1;

/// Exponential growth or decay: `a0 * exp(a1 * x)`.
pub fn exponential(x: f64, a: ArrayView1<'_, f64>) -> f64 {
    a[0] * (a[1] * x).exp()
}
