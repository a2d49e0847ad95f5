//! Convergence loop properties.

use std::time::Duration;

use ndarray::array;
use xyfit_rs::descent::{ConvergenceStatus, FitConfig, GradientDescent};
use xyfit_rs::problem::{Problem, XyProblem};
use xyfit_rs::{CancellationToken, CurveFit, FitError, ModelFunction};

use crate::test_helpers;

#[test]
fn test_history_is_non_increasing() {
    let data = test_helpers::gaussian_peak();
    let problem = XyProblem::new(ModelFunction::Gaussian, &data);

    let result = GradientDescent::new()
        .minimize(&problem, array![4.5, 1.2, 1.0])
        .unwrap();

    assert!(result.success);
    assert_eq!(result.history.len(), result.outer_iterations + 1);
    for pair in result.history.windows(2) {
        assert!(pair[1] <= pair[0]);
    }
    assert!(result.chi_square <= result.history[0]);
    assert_eq!(*result.history.last().unwrap(), result.chi_square);
}

#[test]
fn test_tiny_budget_keeps_best_parameters() {
    let data = test_helpers::gaussian_peak();
    let grid = data.display_grid(200);
    let initial = array![4.5, 1.2, 1.0];

    let result = CurveFit::new()
        .with_max_iterations(5)
        .fit(ModelFunction::Gaussian, &data, &initial, &grid)
        .unwrap();

    assert_eq!(result.status, ConvergenceStatus::MaxIterationsReached);
    assert!(!result.is_converged());
    assert_eq!(result.iterations, 5);
    assert!(result.params.iter().all(|p| p.is_finite()));
    assert!(result.chi_square <= result.initial_goodness.chi_square);
}

#[test]
fn test_cancellation_from_another_thread() {
    let data = test_helpers::gaussian_peak();
    let grid = data.display_grid(10);
    let token = CancellationToken::new();

    let remote = token.clone();
    std::thread::spawn(move || remote.cancel()).join().unwrap();

    let result = CurveFit::new()
        .with_cancellation(token)
        .fit(ModelFunction::Gaussian, &data, &array![4.5, 1.2, 1.0], &grid)
        .unwrap();

    assert_eq!(result.status, ConvergenceStatus::Cancelled);
    assert_eq!(result.outer_iterations, 0);
    assert_eq!(result.params, array![4.5, 1.2, 1.0]);
}

#[test]
fn test_zero_time_limit() {
    let data = test_helpers::line();
    let grid = data.display_grid(10);
    let result = CurveFit::new()
        .with_time_limit(Duration::ZERO)
        .fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid)
        .unwrap();
    assert_eq!(result.status, ConvergenceStatus::TimeLimitReached);
}

#[test]
fn test_config_from_json() {
    let config = FitConfig::from_json(r#"{ "tolerance": 1e-7, "initial_step": 0.05 }"#).unwrap();
    let fitter = CurveFit::with_config(config);
    assert_eq!(fitter.config().tolerance, 1e-7);
    assert_eq!(fitter.config().max_iterations, 1_000_000);

    let data = test_helpers::line();
    let grid = data.display_grid(10);
    let result = fitter
        .fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid)
        .unwrap();
    assert!(result.is_converged());

    let bad = CurveFit::with_config(FitConfig {
        tolerance: -1.0,
        ..FitConfig::default()
    });
    assert!(matches!(
        bad.fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid),
        Err(FitError::InvalidInput(_))
    ));
}

#[test]
fn test_chi_square_of_initial_guess_is_reported() {
    let data = test_helpers::line();
    let problem = XyProblem::new(ModelFunction::Linear, &data);
    let initial = array![1.5, 2.5];
    let grid = data.display_grid(10);

    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &data, &initial, &grid)
        .unwrap();

    assert_eq!(
        result.initial_goodness.chi_square,
        problem.chi_square(&initial).unwrap()
    );
    assert_eq!(result.history[0], result.initial_goodness.chi_square);
    assert_eq!(result.initial_curve, ModelFunction::Linear.eval_many(&grid, initial.view()));
}

#[test]
fn test_unresolvable_gradient_is_not_a_fit() {
    // From zero every step size is f64::EPSILON, too small to move the chi-square
    let data = test_helpers::exact_data(
        ModelFunction::Linear,
        &array![2.0, 3.0],
        -2.0,
        2.0,
        25,
        0.01,
        0.05,
    );
    let grid = data.display_grid(100);
    let initial = array![0.0, 0.0];

    let result = CurveFit::new()
        .fit(ModelFunction::Linear, &data, &initial, &grid)
        .unwrap();

    assert_eq!(result.status, ConvergenceStatus::FlatObjective);
    assert!(!result.is_converged());
    assert_eq!(result.params, initial);
    assert!(result.chi_square > 1e4);
    assert!(result.to_string().contains("Terminated"));
    assert!(matches!(
        result.into_converged(),
        Err(FitError::ConvergenceFailure(_))
    ));
}
