//! Line search behaviour on chi-square objectives built from data.

use ndarray::array;
use xyfit_rs::descent::{IterationBudget, LineSearch, LineSearchStatus};
use xyfit_rs::problem::{Problem, XyProblem};
use xyfit_rs::utils::{descent_direction, step_sizes};
use xyfit_rs::ModelFunction;

use crate::test_helpers;

#[test]
fn test_advance_profile_is_non_increasing() {
    let data = test_helpers::gaussian_peak();
    let problem = XyProblem::new(ModelFunction::Gaussian, &data);
    let params = array![4.5, 1.2, 1.0];
    let steps = step_sizes(&params, 0.01);
    let chi2 = problem.chi_square(&params).unwrap();

    let direction = descent_direction(&problem, &params, chi2, &steps, 0.01)
        .unwrap()
        .unwrap();

    let mut budget = IterationBudget::new(10_000);
    let outcome = LineSearch::step(&problem, &params, chi2, &direction, 0.1, &mut budget).unwrap();

    assert_eq!(outcome.status, LineSearchStatus::Advanced);
    assert!(outcome.chi_square < chi2);
    assert!(outcome.step_sum > 0.0);
    assert_eq!(outcome.evaluations, budget.used());

    let profile = &outcome.profile;
    assert!(profile.len() >= 3);
    assert_eq!(profile[0], chi2);
    for pair in profile[..profile.len() - 1].windows(2) {
        assert!(pair[1] < pair[0], "profile rose before the halting step: {:?}", profile);
    }
    // The halting step is the first that fails to decrease
    assert!(profile[profile.len() - 1] >= profile[profile.len() - 2]);

    // The refined point is at least as good as every sampled point
    let best_sampled = profile.iter().copied().fold(f64::INFINITY, f64::min);
    assert!(outcome.chi_square <= best_sampled);
}

#[test]
fn test_outside_domain_is_treated_as_uphill() {
    // A huge scale pushes the natural log argument negative; the search must
    // halve its way back instead of failing
    let data = test_helpers::exact_data(
        ModelFunction::NaturalLog,
        &array![2.0, 1.5],
        1.0,
        4.0,
        13,
        0.01,
        0.05,
    );
    let problem = XyProblem::new(ModelFunction::NaturalLog, &data);
    let params = array![1.8, 1.3];
    let steps = step_sizes(&params, 0.01);
    let chi2 = problem.chi_square(&params).unwrap();
    let direction = descent_direction(&problem, &params, chi2, &steps, 0.01)
        .unwrap()
        .unwrap();

    let mut budget = IterationBudget::new(10_000);
    let outcome = LineSearch::step(&problem, &params, chi2, &direction, 1e6, &mut budget).unwrap();

    assert!(outcome.chi_square.is_finite());
    assert!(outcome.chi_square < chi2);
    assert!(outcome.params.iter().all(|p| p.is_finite()));
}
