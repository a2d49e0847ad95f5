//! The gradient descent convergence loop.
//!
//! Each outer iteration estimates a descent direction by finite differences,
//! then hands it to the [`LineSearch`], whose travelled distance becomes the
//! starting scale of the next iteration. The loop ends when the chi-square
//! changes by no more than the tolerance between two iterations.

use std::fmt;
use std::time::{Duration, Instant};

use ndarray::Array1;
use tracing::{debug, trace, warn};

use crate::descent::config::{CancellationToken, FitConfig};
use crate::descent::convergence::{ConvergenceStatus, IterationBudget};
use crate::descent::line_search::{LineSearch, LineSearchStatus};
use crate::error::{FitError, Result};
use crate::problem::Problem;
use crate::utils::finite_difference::{descent_direction, step_sizes};

/// Result of a gradient descent minimization.
#[derive(Debug, Clone)]
pub struct DescentResult {
    /// Best parameter values found
    pub params: Array1<f64>,

    /// Chi-square at `params`
    pub chi_square: f64,

    /// How the minimization ended
    pub status: ConvergenceStatus,

    /// Iteration budget consumed by all line searches
    pub iterations: usize,

    /// Number of outer iterations (direction estimates followed by a line search)
    pub outer_iterations: usize,

    /// Chi-square at the start and after every outer iteration
    pub history: Vec<f64>,

    /// Step sizes derived from the initial parameters
    pub step_sizes: Array1<f64>,

    /// Whether the minimization converged
    pub success: bool,

    /// A message describing the result
    pub message: String,
}

impl fmt::Display for DescentResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Minimization Result:")?;
        writeln!(f, "  Success: {}", self.success)?;
        writeln!(f, "  Message: {}", self.message)?;
        writeln!(f, "  Chi-square: {:.6e}", self.chi_square)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Outer iterations: {}", self.outer_iterations)?;
        writeln!(f, "  Parameters: {:?}", self.params)?;
        Ok(())
    }
}

/// The gradient descent optimizer.
#[derive(Debug, Clone, Default)]
pub struct GradientDescent {
    config: FitConfig,
}

impl GradientDescent {
    /// Create a new optimizer with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new optimizer with the given configuration.
    pub fn with_config(config: FitConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &FitConfig {
        &self.config
    }

    /// Set the convergence tolerance on the chi-square change.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the line search scale of the first iteration.
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.config.initial_step = initial_step;
        self
    }

    /// Set the step sizes as a fraction of the initial parameter magnitudes.
    pub fn with_step_fraction(mut self, fraction: f64) -> Self {
        self.config.step_fraction = fraction;
        self
    }

    /// Set the gradient perturbation as a fraction of the step sizes.
    pub fn with_gradient_fraction(mut self, fraction: f64) -> Self {
        self.config.gradient_fraction = fraction;
        self
    }

    /// Stop after this much wall clock time.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.config.time_limit = Some(limit);
        self
    }

    /// Stop when this token is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.config.cancellation = Some(token);
        self
    }

    /// Minimize the chi-square of the given problem.
    ///
    /// Non-convergence is not an error: running out of budget or time, being
    /// cancelled, or meeting a non-finite chi-square all return the best
    /// parameters found so far with `success == false`.
    ///
    /// # Arguments
    ///
    /// * `problem` - The problem to solve
    /// * `initial_params` - Initial guess for the parameter values
    ///
    /// # Errors
    ///
    /// * `FitError::DimensionMismatch` if `initial_params` has the wrong length
    /// * `FitError::InvalidInput` if the configuration is out of range
    /// * any error of [`Problem::chi_square`], such as `FitError::DegenerateVariance`
    pub fn minimize<P: Problem + ?Sized>(
        &self,
        problem: &P,
        initial_params: Array1<f64>,
    ) -> Result<DescentResult> {
        let n_params = problem.parameter_count();
        if initial_params.len() != n_params {
            return Err(FitError::DimensionMismatch(format!(
                "Expected {} parameters, got {}",
                n_params,
                initial_params.len()
            )));
        }
        self.config.validate()?;

        let config = &self.config;
        let started = Instant::now();
        let steps = step_sizes(&initial_params, config.step_fraction);

        let mut budget = IterationBudget::new(config.max_iterations);
        let mut params = initial_params;
        let mut chi2 = problem.chi_square(&params)?;
        // Infinite so the first iteration always runs, whatever the chi-square magnitude
        let mut previous = f64::INFINITY;
        let mut stepdown = config.initial_step;
        let mut history = vec![chi2];
        let mut outer_iterations = 0;

        debug!(
            parameters = n_params,
            points = problem.point_count(),
            chi_square = chi2,
            "starting gradient descent"
        );

        let status = loop {
            if (chi2 - previous).abs() <= config.tolerance {
                break ConvergenceStatus::Converged;
            }
            if config.is_cancelled() {
                break ConvergenceStatus::Cancelled;
            }
            if config.time_limit.map_or(false, |limit| started.elapsed() >= limit) {
                break ConvergenceStatus::TimeLimitReached;
            }

            let direction = match descent_direction(
                problem,
                &params,
                chi2,
                &steps,
                config.gradient_fraction,
            ) {
                Ok(Some(direction)) => direction,
                Ok(None) => break ConvergenceStatus::FlatObjective,
                Err(FitError::NumericalError(message)) => {
                    warn!(%message, "stopping descent");
                    break ConvergenceStatus::NumericalError;
                }
                Err(e) => return Err(e),
            };

            let outcome =
                LineSearch::step(problem, &params, chi2, &direction, stepdown, &mut budget)?;
            outer_iterations += 1;

            params = outcome.params;
            previous = chi2;
            chi2 = outcome.chi_square;
            stepdown = if outcome.step_sum > 0.0 {
                outcome.step_sum
            } else {
                config.initial_step
            };
            history.push(chi2);

            trace!(
                iteration = outer_iterations,
                chi_square = chi2,
                step_sum = outcome.step_sum,
                evaluations = outcome.evaluations,
                "line search finished"
            );

            if outcome.status == LineSearchStatus::BudgetExhausted {
                break ConvergenceStatus::MaxIterationsReached;
            }
        };

        let success = status.is_converged();
        if success {
            debug!(
                chi_square = chi2,
                iterations = budget.used(),
                outer_iterations,
                "gradient descent converged"
            );
        } else {
            warn!(
                status = %status,
                chi_square = chi2,
                iterations = budget.used(),
                "gradient descent stopped before convergence"
            );
        }

        Ok(DescentResult {
            params,
            chi_square: chi2,
            status,
            iterations: budget.used(),
            outer_iterations,
            history,
            step_sizes: steps,
            success,
            message: status.description().to_string(),
        })
    }
}
