//! Problem definition trait and the data-fitting implementation.
//!
//! This module defines the `Problem` trait, which represents a chi-square
//! objective over a parameter vector. The optimizer and the uncertainty
//! estimator only talk to this trait, so they can be exercised with synthetic
//! objectives as well as with [`XyProblem`].

use ndarray::Array1;

use crate::data::DataSet;
use crate::error::Result;
use crate::models::ModelFunction;
use crate::objective;

/// A trait representing a chi-square minimization problem.
pub trait Problem {
    /// Evaluate the chi-square at the given parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - The parameter values at which to evaluate the objective
    ///
    /// # Returns
    ///
    /// * The chi-square value, or an error if the evaluation fails. Parameter
    ///   vectors outside the model's domain should score `f64::INFINITY`
    ///   rather than fail.
    fn chi_square(&self, params: &Array1<f64>) -> Result<f64>;

    /// Get the number of parameters in the problem.
    fn parameter_count(&self) -> usize;

    /// Get the number of data points contributing to the chi-square.
    fn point_count(&self) -> usize;

    /// Degrees of freedom, or `None` when there are more parameters than points.
    fn degrees_of_freedom(&self) -> Option<usize> {
        self.point_count().checked_sub(self.parameter_count())
    }
}

/// A model bound to the data it is fitted to.
///
/// This is the context object of a single fit: it borrows the data for the
/// duration of the call and owns nothing else.
#[derive(Debug, Clone, Copy)]
pub struct XyProblem<'a> {
    model: ModelFunction,
    data: &'a DataSet,
}

impl<'a> XyProblem<'a> {
    /// Bind a model to a data set.
    pub fn new(model: ModelFunction, data: &'a DataSet) -> Self {
        Self { model, data }
    }

    /// The model being fitted.
    pub fn model(&self) -> ModelFunction {
        self.model
    }

    /// The data being fitted.
    pub fn data(&self) -> &'a DataSet {
        self.data
    }
}

impl Problem for XyProblem<'_> {
    fn chi_square(&self, params: &Array1<f64>) -> Result<f64> {
        objective::chi_square(&self.model, self.data, params)
    }

    fn parameter_count(&self) -> usize {
        self.model.parameter_count()
    }

    fn point_count(&self) -> usize {
        self.data.len()
    }
}
