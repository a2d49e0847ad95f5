//! Polynomial model shapes.
//!
//! The polynomial function is defined as:
//!
//! f(x) = a[0] + a[1]*x + a[2]*x^2 + ... + a[n]*x^n
//!
//! with the degree given by the length of the parameter vector.

use ndarray::ArrayView1;

/// Straight line: `a0 + a1 * x`.
pub fn linear(x: f64, a: ArrayView1<'_, f64>) -> f64 {
    a[0] + a[1] * x
}

/// Polynomial `sum(a_i * x^i)` for i in `[0, a.len())`.
///
/// Evaluated with Horner's scheme, so an empty parameter vector gives zero.
pub fn polynomial(x: f64, a: ArrayView1<'_, f64>) -> f64 {
    a.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}
