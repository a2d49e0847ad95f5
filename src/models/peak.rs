//! Peak model shapes.

use ndarray::ArrayView1;

/// A Gaussian peak.
///
/// f(x) = amplitude * exp(-(x - center)² / (2 * sigma²))
///
/// with `a = [amplitude, center, sigma]`. The Full Width at Half Maximum is
/// FWHM = 2 * sqrt(2 * ln(2)) * sigma ≈ 2.3548 * sigma.
pub fn gaussian(x: f64, a: ArrayView1<'_, f64>) -> f64 {
    let dx = x - a[1];
    a[0] * (-dx * dx / (2.0 * a[2] * a[2])).exp()
}
