//! Curve fitting front end.
//!
//! [`CurveFit`] validates the inputs, runs the [`GradientDescent`] optimizer on
//! an [`XyProblem`], estimates the parameter uncertainties and packages
//! everything into a [`FitResult`]. The result's `Display` implementation
//! renders a plain text report.

#[cfg(feature = "parallel")]
pub mod parallel;

use std::fmt;
use std::time::Duration;

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, warn};

use crate::data::DataSet;
use crate::descent::{CancellationToken, ConvergenceStatus, FitConfig, GradientDescent};
use crate::error::{FitError, Result};
use crate::models::ModelFunction;
use crate::objective;
use crate::problem::{Problem, XyProblem};
use crate::uncertainty::{estimate_uncertainty, ParameterUncertainty};

/// How a fit ended.
pub type FitStatus = ConvergenceStatus;

/// Chi-square statistics of a parameter vector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoodnessOfFit {
    /// Chi-square
    pub chi_square: f64,
    /// Number of points minus number of parameters
    pub degrees_of_freedom: usize,
    /// Chi-square per degree of freedom, `None` when there are none
    pub reduced_chi_square: Option<f64>,
    /// Probability of a chi-square at least this large, `None` when there are
    /// no degrees of freedom
    pub p_value: Option<f64>,
}

impl GoodnessOfFit {
    /// Compute the statistics of a chi-square value.
    ///
    /// # Errors
    ///
    /// * `FitError::ComputationError` if the chi-square distribution cannot be built
    pub fn new(chi_square: f64, degrees_of_freedom: usize) -> Result<Self> {
        if degrees_of_freedom == 0 {
            return Ok(Self {
                chi_square,
                degrees_of_freedom,
                reduced_chi_square: None,
                p_value: None,
            });
        }

        let dof = degrees_of_freedom as f64;
        let distribution =
            ChiSquared::new(dof).map_err(|e| FitError::ComputationError(e.to_string()))?;
        let p_value = if chi_square.is_finite() {
            distribution.sf(chi_square).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Ok(Self {
            chi_square,
            degrees_of_freedom,
            reduced_chi_square: Some(chi_square / dof),
            p_value: Some(p_value),
        })
    }
}

/// The outcome of a curve fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitResult {
    /// The fitted model
    pub model: ModelFunction,
    /// How the minimization ended
    pub status: FitStatus,
    /// Iteration budget consumed
    pub iterations: usize,
    /// Number of direction estimates
    pub outer_iterations: usize,
    /// Fitted parameters
    pub params: Array1<f64>,
    /// Parameter uncertainties, `None` if the curvature matrix was singular
    pub uncertainty: Option<ParameterUncertainty>,
    /// Chi-square at `params`
    pub chi_square: f64,
    /// Number of points minus number of parameters
    pub degrees_of_freedom: usize,
    /// Chi-square per degree of freedom
    pub reduced_chi_square: Option<f64>,
    /// Upper tail probability of `chi_square`
    pub p_value: Option<f64>,
    /// The x values the curves were evaluated at
    pub grid: Array1<f64>,
    /// The fitted model evaluated over `grid`
    pub fitted_curve: Array1<f64>,
    /// The initial parameter guess
    pub initial_params: Array1<f64>,
    /// Statistics of the initial guess
    pub initial_goodness: GoodnessOfFit,
    /// The initial guess evaluated over `grid`
    pub initial_curve: Array1<f64>,
    /// Chi-square at the start and after each outer iteration
    pub history: Vec<f64>,
}

impl FitResult {
    /// Whether the minimization converged.
    pub fn is_converged(&self) -> bool {
        self.status.is_converged()
    }

    /// Statistics of the fitted parameters.
    pub fn goodness(&self) -> GoodnessOfFit {
        GoodnessOfFit {
            chi_square: self.chi_square,
            degrees_of_freedom: self.degrees_of_freedom,
            reduced_chi_square: self.reduced_chi_square,
            p_value: self.p_value,
        }
    }

    /// Standard errors of the fitted parameters, if available.
    pub fn standard_errors(&self) -> Option<&Array1<f64>> {
        self.uncertainty.as_ref().map(|u| &u.standard_errors)
    }

    /// Residuals `y - f(x)` of `data` under the fitted parameters.
    pub fn residuals(&self, data: &DataSet) -> Array1<f64> {
        objective::residuals(&self.model, data, &self.params)
    }

    /// Evaluate the fitted model at `xs`.
    pub fn evaluate(&self, xs: &Array1<f64>) -> Array1<f64> {
        self.model.eval_many(xs, self.params.view())
    }

    /// Turn a non-converged result into `FitError::ConvergenceFailure`.
    pub fn into_converged(self) -> Result<Self> {
        if self.is_converged() {
            Ok(self)
        } else {
            Err(FitError::ConvergenceFailure(format!(
                "{} after {} iterations (chi^2 = {})",
                self.status, self.iterations, self.chi_square
            )))
        }
    }
}

fn fmt_option(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.6}", v))
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.model.name())?;
        writeln!(f, "{}", self.model.formula())?;
        writeln!(f)?;
        writeln!(f, "Status: {}", self.status)?;
        writeln!(f, "Iteration no. {}", self.iterations)?;

        writeln!(f, "Initial parameters' values:")?;
        for (i, a) in self.initial_params.iter().enumerate() {
            writeln!(f, "a{} = {:.6}", i, a)?;
        }
        writeln!(f, "chi^2 = {:.6}", self.initial_goodness.chi_square)?;
        writeln!(f, "chi^2_red = {}", fmt_option(self.initial_goodness.reduced_chi_square))?;
        writeln!(f, "p_prob = {}", fmt_option(self.initial_goodness.p_value))?;
        writeln!(f)?;

        writeln!(f, "Fitted parameters' values:")?;
        let errors = self.standard_errors();
        for (i, a) in self.params.iter().enumerate() {
            let error = errors.map(|e| e[i]);
            writeln!(f, "a{} = {:.6} ± {}", i, a, fmt_option(error))?;
        }
        if let Some(uncertainty) = &self.uncertainty {
            let n = self.params.len();
            for i in 0..n {
                for j in (i + 1)..n {
                    writeln!(f, "cov(a{}, a{}) = {:.6}", i, j, uncertainty.covariance[[i, j]])?;
                }
            }
        }
        writeln!(f, "chi^2 = {:.6}", self.chi_square)?;
        writeln!(f, "ndf = {}", self.degrees_of_freedom)?;
        writeln!(f, "chi^2_red = {}", fmt_option(self.reduced_chi_square))?;
        write!(f, "p_prob = {}", fmt_option(self.p_value))
    }
}

/// Fits a [`ModelFunction`] to a [`DataSet`].
#[derive(Debug, Clone, Default)]
pub struct CurveFit {
    optimizer: GradientDescent,
}

impl CurveFit {
    /// Create a fitter with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fitter with the given configuration.
    pub fn with_config(config: FitConfig) -> Self {
        Self {
            optimizer: GradientDescent::with_config(config),
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &FitConfig {
        self.optimizer.config()
    }

    /// Set the convergence tolerance on the chi-square change.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.optimizer = self.optimizer.with_tolerance(tolerance);
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.optimizer = self.optimizer.with_max_iterations(max_iterations);
        self
    }

    /// Set the line search scale of the first iteration.
    pub fn with_initial_step(mut self, initial_step: f64) -> Self {
        self.optimizer = self.optimizer.with_initial_step(initial_step);
        self
    }

    /// Set the largest condition number accepted when inverting the curvature matrix.
    pub fn with_max_condition_number(mut self, max_condition: f64) -> Self {
        let mut config = self.optimizer.config().clone();
        config.max_condition_number = max_condition;
        self.optimizer = GradientDescent::with_config(config);
        self
    }

    /// Stop after this much wall clock time.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.optimizer = self.optimizer.with_time_limit(limit);
        self
    }

    /// Stop when this token is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.optimizer = self.optimizer.with_cancellation(token);
        self
    }

    /// Fit `model` to `data` starting from `initial`, and evaluate the curves over `grid`.
    ///
    /// # Arguments
    ///
    /// * `model` - The model to fit
    /// * `data` - The data to fit
    /// * `initial` - Initial guess, one value per model parameter
    /// * `grid` - x values for the fitted and initial curves, for example
    ///   [`DataSet::display_grid`]
    ///
    /// # Errors
    ///
    /// * `FitError::DimensionMismatch` if `initial` does not match the model arity
    /// * `FitError::InvalidInput` if `initial` is not finite, the model has more
    ///   parameters than there are points, or a logarithmic model meets x <= 0
    pub fn fit(
        &self,
        model: ModelFunction,
        data: &DataSet,
        initial: &Array1<f64>,
        grid: &Array1<f64>,
    ) -> Result<FitResult> {
        model.check_parameters(initial)?;
        if initial.iter().any(|a| !a.is_finite()) {
            return Err(FitError::InvalidInput(format!(
                "Initial parameters must be finite, got {}",
                initial
            )));
        }

        let problem = XyProblem::new(model, data);
        let degrees_of_freedom = problem.degrees_of_freedom().ok_or_else(|| {
            FitError::InvalidInput(format!(
                "{} has {} parameters but only {} data points were given",
                model.name(),
                model.parameter_count(),
                data.len()
            ))
        })?;

        if model.requires_positive_x() {
            if data.has_non_positive_x() {
                return Err(FitError::InvalidInput(format!(
                    "{} requires x > 0 for every data point",
                    model.name()
                )));
            }
            if grid.iter().any(|&x| x <= 0.0) {
                return Err(FitError::InvalidInput(format!(
                    "{} requires x > 0 for every grid point",
                    model.name()
                )));
            }
        }

        debug!(model = %model, points = data.len(), "fitting");

        let descent = self.optimizer.minimize(&problem, initial.clone())?;

        let chi_square = problem.chi_square(&descent.params)?;
        let goodness = GoodnessOfFit::new(chi_square, degrees_of_freedom)?;
        let initial_goodness =
            GoodnessOfFit::new(problem.chi_square(initial)?, degrees_of_freedom)?;

        let uncertainty = match estimate_uncertainty(
            &problem,
            &descent.params,
            &descent.step_sizes,
            self.config().max_condition_number,
        ) {
            Ok(uncertainty) => Some(uncertainty),
            Err(FitError::SingularMatrix(message)) => {
                warn!(%message, "parameter uncertainties unavailable");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(FitResult {
            model,
            status: descent.status,
            iterations: descent.iterations,
            outer_iterations: descent.outer_iterations,
            fitted_curve: model.eval_many(grid, descent.params.view()),
            initial_curve: model.eval_many(grid, initial.view()),
            grid: grid.clone(),
            params: descent.params,
            uncertainty,
            chi_square,
            degrees_of_freedom,
            reduced_chi_square: goodness.reduced_chi_square,
            p_value: goodness.p_value,
            initial_params: initial.clone(),
            initial_goodness,
            history: descent.history,
        })
    }
}
