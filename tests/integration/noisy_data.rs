//! Fits to data with random errors on both axes.
//!
//! The noise is drawn from a seeded ChaCha generator, so each test sees the
//! same data on every run.

use ndarray::array;
use xyfit_rs::{CurveFit, ModelFunction};

use crate::test_helpers;

#[test]
fn test_noisy_line_is_statistically_consistent() {
    let truth = array![2.0, 3.0];
    let data = test_helpers::noisy_data(ModelFunction::Linear, &truth, -2.0, 2.0, 41, 0.05, 0.1, 42);
    let grid = data.display_grid(200);

    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid)
        .unwrap();
    assert!(result.is_converged());

    // Every parameter within four standard errors of the truth
    let errors = result.standard_errors().unwrap();
    for i in 0..2 {
        let pull = (result.params[i] - truth[i]) / errors[i];
        assert!(pull.abs() < 4.0, "a{} pull {}", i, pull);
    }

    let reduced = result.reduced_chi_square.unwrap();
    assert!(reduced > 0.3 && reduced < 2.5, "reduced chi-square {}", reduced);
    assert!(result.p_value.unwrap() > 1e-4);
}

#[test]
fn test_noisy_gaussian_peak() {
    let truth = array![5.0, 1.0, 0.8];
    let data = test_helpers::noisy_data(ModelFunction::Gaussian, &truth, -3.0, 5.0, 81, 0.01, 0.05, 7);
    let grid = data.display_grid(500);

    let result = CurveFit::new()
        .fit(ModelFunction::Gaussian, &data, &array![4.5, 1.2, 1.0], &grid)
        .unwrap();
    assert!(result.is_converged());

    let errors = result.standard_errors().unwrap();
    for i in 0..3 {
        let pull = (result.params[i].abs() - truth[i]) / errors[i];
        assert!(pull.abs() < 5.0, "a{} pull {}", i, pull);
    }

    // Residuals scatter around zero
    let residuals = result.residuals(&data);
    let mean = residuals.sum() / residuals.len() as f64;
    assert!(mean.abs() < 0.05);
}

#[test]
fn test_underestimated_errors_show_in_reduced_chi_square() {
    // Generated with dy = 0.3 but claimed to be 0.1
    let truth = array![2.0, 3.0];
    let noisy = test_helpers::noisy_data(ModelFunction::Linear, &truth, -2.0, 2.0, 41, 0.0, 0.3, 11);
    let data = xyfit_rs::DataSet::new(
        noisy.x().clone(),
        noisy.dx().clone(),
        noisy.y().clone(),
        ndarray::Array1::from_elem(noisy.len(), 0.1),
    )
    .unwrap();

    let grid = data.display_grid(10);
    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid)
        .unwrap();

    assert!(result.reduced_chi_square.unwrap() > 3.0);
    assert!(result.p_value.unwrap() < 1e-3);
}
