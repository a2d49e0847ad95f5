//! Parallel execution of independent fits.
//!
//! Each fit owns all of its state, so many of them can run on the rayon
//! thread pool at once and produce exactly the results of running them one
//! after another.

use ndarray::Array1;
use rayon::prelude::*;

use super::{CurveFit, FitResult};
use crate::data::DataSet;
use crate::error::Result;
use crate::models::ModelFunction;

/// One fit of a batch.
#[derive(Debug, Clone)]
pub struct FitJob<'a> {
    /// The model to fit
    pub model: ModelFunction,
    /// The data to fit
    pub data: &'a DataSet,
    /// Initial parameter guess
    pub initial: Array1<f64>,
    /// x values for the fitted curve
    pub grid: Array1<f64>,
}

impl<'a> FitJob<'a> {
    /// Create a job.
    pub fn new(model: ModelFunction, data: &'a DataSet, initial: Array1<f64>, grid: Array1<f64>) -> Self {
        Self {
            model,
            data,
            initial,
            grid,
        }
    }
}

/// Run every job with `fitter` in parallel.
///
/// The results are in the order of `jobs`; a failing job does not affect the others.
pub fn fit_batch(fitter: &CurveFit, jobs: &[FitJob<'_>]) -> Vec<Result<FitResult>> {
    jobs.par_iter()
        .map(|job| fitter.fit(job.model, job.data, &job.initial, &job.grid))
        .collect()
}
