//! Adaptive line search along a fixed descent direction.
//!
//! A search runs in three phases:
//!
//! 1. **Bracket**: starting from the previous iteration's travel distance, the
//!    step scale is halved until a single step strictly lowers the chi-square.
//! 2. **Advance**: steps of that scale are repeated, accumulating the distance
//!    travelled, until a step no longer lowers the chi-square.
//! 3. **Refine**: the last three equally spaced samples are fitted with a
//!    parabola and the walk jumps back to its vertex.
//!
//! Every bracket or advance trial consumes one unit of the shared
//! [`IterationBudget`]. The refinement evaluation is free.

use ndarray::Array1;

use crate::descent::convergence::IterationBudget;
use crate::error::{FitError, Result};
use crate::problem::Problem;

/// How a line search ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchStatus {
    /// At least one step lowered the chi-square.
    Advanced,

    /// The scale became too small to move the parameters; they are returned unchanged.
    Stalled,

    /// The iteration budget ran out; the best point visited is returned.
    BudgetExhausted,
}

/// Result of a single line search.
#[derive(Debug, Clone)]
pub struct LineSearchOutcome {
    /// The parameters at the end of the search
    pub params: Array1<f64>,

    /// The chi-square at `params`
    pub chi_square: f64,

    /// Total distance travelled in units of the direction, used as the next
    /// iteration's starting scale
    pub step_sum: f64,

    /// Budget units consumed by this search
    pub evaluations: usize,

    /// How the search ended
    pub status: LineSearchStatus,

    /// Chi-square at the start point, at every accepted advance step, and at
    /// the halting step. Empty if the bracket phase never found a decrease.
    pub profile: Vec<f64>,
}

/// Line search following the descent direction.
pub struct LineSearch;

impl LineSearch {
    /// Walk from `params` along `direction` until the chi-square stops decreasing.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem to minimize
    /// * `params` - The start point
    /// * `chi_square` - The chi-square at `params`
    /// * `direction` - The descent direction; `params + s * direction` descends for small `s > 0`
    /// * `stepdown` - The step scale of the previous search
    /// * `budget` - The iteration budget shared with the caller
    ///
    /// # Returns
    ///
    /// * The end point of the search. Its chi-square never exceeds `chi_square`.
    pub fn step<P: Problem + ?Sized>(
        problem: &P,
        params: &Array1<f64>,
        chi_square: f64,
        direction: &Array1<f64>,
        stepdown: f64,
        budget: &mut IterationBudget,
    ) -> Result<LineSearchOutcome> {
        if direction.len() != params.len() {
            return Err(FitError::DimensionMismatch(format!(
                "Direction has {} components, expected {}",
                direction.len(),
                params.len()
            )));
        }
        if !(stepdown.is_finite() && stepdown > 0.0) {
            return Err(FitError::InvalidInput(format!(
                "Step scale must be finite and positive, got {}",
                stepdown
            )));
        }

        let start_used = budget.used();
        let unchanged = |status, budget: &IterationBudget| LineSearchOutcome {
            params: params.clone(),
            chi_square,
            step_sum: 0.0,
            evaluations: budget.used() - start_used,
            status,
            profile: Vec::new(),
        };

        // Bracket
        let mut scale = 2.0 * stepdown;
        let (trial, chi_trial) = loop {
            scale /= 2.0;
            let trial = params + &(direction * scale);
            if trial == *params {
                return Ok(unchanged(LineSearchStatus::Stalled, budget));
            }
            if !budget.try_consume() {
                return Ok(unchanged(LineSearchStatus::BudgetExhausted, budget));
            }
            let chi_trial = problem.chi_square(&trial)?;
            if chi_trial < chi_square {
                break (trial, chi_trial);
            }
        };

        // Advance
        let mut profile = vec![chi_square, chi_trial];
        let mut step_sum = 0.0;
        let mut chi1: f64;
        let mut chi2 = chi_square;
        let mut chi3 = chi_trial;
        let mut best: Array1<f64>;
        let mut last = trial;
        loop {
            step_sum += scale;
            chi1 = chi2;
            chi2 = chi3;

            if !budget.try_consume() {
                return Ok(LineSearchOutcome {
                    params: last,
                    chi_square: chi2,
                    step_sum,
                    evaluations: budget.used() - start_used,
                    status: LineSearchStatus::BudgetExhausted,
                    profile,
                });
            }

            let next = &last + &(direction * scale);
            chi3 = problem.chi_square(&next)?;
            profile.push(chi3);
            best = std::mem::replace(&mut last, next);

            if !(chi3 < chi2) {
                break;
            }
        }

        // Refine: `best` holds chi2, `last` holds chi3, chi1 lies one scale before `best`
        let mut params_out = best;
        let mut chi_out = chi2;

        let denominator = chi1 - 2.0 * chi2 + chi3;
        if denominator.is_finite() && denominator > f64::EPSILON * chi2.abs().max(f64::MIN_POSITIVE) {
            let step = scale * ((chi3 - chi2) / denominator + 0.5);
            let refined = &last - &(direction * step);
            let chi_refined = problem.chi_square(&refined)?;
            if chi_refined <= chi2 {
                params_out = refined;
                chi_out = chi_refined;
            }
        }

        Ok(LineSearchOutcome {
            params: params_out,
            chi_square: chi_out,
            step_sum,
            evaluations: budget.used() - start_used,
            status: LineSearchStatus::Advanced,
            profile,
        })
    }
}
