//! Fits of every built-in model to noiseless data.

use approx::assert_relative_eq;
use ndarray::{array, Array1};
use xyfit_rs::objective;
use xyfit_rs::{CurveFit, FitResult, ModelFunction};

use crate::test_helpers;

fn fit_exact(
    model: ModelFunction,
    truth: &Array1<f64>,
    initial: &Array1<f64>,
    range: (f64, f64),
    n: usize,
) -> FitResult {
    let data = test_helpers::exact_data(model, truth, range.0, range.1, n, 0.01, 0.05);
    let grid = data.display_grid(500);
    let result = CurveFit::new().fit(model, &data, initial, &grid).unwrap();

    // Shared properties of every converged fit
    assert!(result.is_converged(), "{} did not converge: {}", model, result.status);
    assert_eq!(result.degrees_of_freedom, n - model.parameter_count());
    assert!(result.chi_square <= result.initial_goodness.chi_square);
    assert_eq!(
        objective::chi_square(&model, &data, &result.params).unwrap(),
        result.chi_square
    );
    let p = result.p_value.unwrap();
    assert!((0.0..=1.0).contains(&p));
    assert_eq!(result.fitted_curve.len(), 500);
    assert_eq!(result.fitted_curve, result.evaluate(&grid));

    result
}

#[test]
fn test_linear() {
    let data = test_helpers::line();
    let grid = data.display_grid(5000);
    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid)
        .unwrap();

    assert!(result.is_converged());
    assert_relative_eq!(result.params[0], 2.0, epsilon = 1e-2);
    assert_relative_eq!(result.params[1], 3.0, epsilon = 1e-2);
    assert!(result.chi_square < 1e-3);
    assert_eq!(result.degrees_of_freedom, 19);
    assert_eq!(result.fitted_curve.len(), 5000);
}

#[test]
fn test_gaussian() {
    let result = fit_exact(
        ModelFunction::Gaussian,
        &array![5.0, 1.0, 0.8],
        &array![4.5, 1.2, 1.0],
        (-3.0, 5.0),
        41,
    );
    assert_relative_eq!(result.params[0], 5.0, epsilon = 0.05);
    assert_relative_eq!(result.params[1], 1.0, epsilon = 0.05);
    // Only the square of the width enters the model
    assert_relative_eq!(result.params[2].abs(), 0.8, epsilon = 0.05);
}

#[test]
fn test_polynomial() {
    let result = fit_exact(
        ModelFunction::polynomial(2),
        &array![1.0, -2.0, 0.5],
        &array![0.8, -1.8, 0.6],
        (-2.0, 2.0),
        21,
    );
    assert_relative_eq!(result.params[0], 1.0, epsilon = 0.05);
    assert_relative_eq!(result.params[1], -2.0, epsilon = 0.05);
    assert_relative_eq!(result.params[2], 0.5, epsilon = 0.05);
}

#[test]
fn test_exponential() {
    let result = fit_exact(
        ModelFunction::Exponential,
        &array![2.0, 0.5],
        &array![1.8, 0.45],
        (0.0, 3.0),
        16,
    );
    assert_relative_eq!(result.params[0], 2.0, max_relative = 0.05);
    assert_relative_eq!(result.params[1], 0.5, max_relative = 0.05);
}

#[test]
fn test_logarithms() {
    for model in [ModelFunction::Log10, ModelFunction::NaturalLog] {
        let result = fit_exact(model, &array![3.0, 2.0], &array![2.8, 1.8], (1.0, 5.0), 17);
        assert_relative_eq!(result.params[0], 3.0, max_relative = 0.05);
        assert_relative_eq!(result.params[1], 2.0, max_relative = 0.05);
    }
}

#[test]
fn test_saturated_fit_has_no_reduced_statistics() {
    // Two points, two parameters
    let data = test_helpers::exact_data(ModelFunction::Linear, &array![1.0, 1.0], -1.0, 1.0, 2, 0.0, 0.1);
    let grid = data.display_grid(10);
    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &data, &array![0.8, 1.2], &grid)
        .unwrap();

    assert_eq!(result.degrees_of_freedom, 0);
    assert!(result.reduced_chi_square.is_none());
    assert!(result.p_value.is_none());
    assert!(result.to_string().contains("chi^2_red = n/a"));
}

#[test]
fn test_model_names_round_trip_through_fit() {
    let model: ModelFunction = "poly:2".parse().unwrap();
    assert_eq!(model, ModelFunction::polynomial(2));

    let data = test_helpers::exact_data(model, &array![1.0, 0.0, 1.0], -1.0, 1.0, 9, 0.0, 0.1);
    let grid = data.display_grid(10);
    let result = CurveFit::new()
        .fit(model, &data, &array![1.1, 0.1, 0.9], &grid)
        .unwrap();

    let report = result.to_string();
    assert!(report.starts_with("Polynomial fit\ny = a0 + a1 * x + a2 * x^2\n"));
    assert!(report.contains("cov(a1, a2) = "));

    let json = serde_json::to_string(&result).unwrap();
    assert!(json.contains("\"polynomial\":{\"degree\":2}"));
}
