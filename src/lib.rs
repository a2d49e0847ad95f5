//! # xyfit-rs
//!
//! `xyfit-rs` fits one-dimensional models to measurements that carry
//! uncertainties on both axes.
//!
//! The library provides:
//! - A chi-square objective that propagates x uncertainties through the local
//!   slope of the model (effective variance method)
//! - A gradient descent optimizer with an adaptive line search and parabolic
//!   refinement, started from a caller supplied guess
//! - Parameter standard errors and covariances from the curvature of the chi-square
//! - Goodness-of-fit statistics (reduced chi-square, p-value) and a text report
//! - A four column table reader and parallel batch fitting
//!
//! ## Basic Usage
//!
//! ```
//! use ndarray::array;
//! use xyfit_rs::{CurveFit, DataSet, ModelFunction};
//!
//! # fn main() -> xyfit_rs::Result<()> {
//! let data = DataSet::from_rows(&[
//!     [-1.0, 0.05, -1.0, 0.1],
//!     [0.0, 0.05, 2.0, 0.1],
//!     [1.0, 0.05, 5.0, 0.1],
//!     [2.0, 0.05, 8.0, 0.1],
//! ])?;
//!
//! let grid = data.display_grid(100);
//! let result = CurveFit::new().fit(ModelFunction::Linear, &data, &array![1.5, 2.5], &grid)?;
//!
//! assert!(result.is_converged());
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

// Public modules
pub mod data;
pub mod descent;
pub mod error;
pub mod fit;
pub mod models;
pub mod objective;
pub mod problem;
pub mod uncertainty;
pub mod utils;

// Re-exports for convenience
pub use data::DataSet;
pub use descent::{CancellationToken, ConvergenceStatus, FitConfig, GradientDescent};
pub use error::{FitError, Result};
pub use fit::{CurveFit, FitResult, FitStatus, GoodnessOfFit};
pub use models::ModelFunction;
pub use problem::{Problem, XyProblem};
pub use uncertainty::ParameterUncertainty;

#[cfg(feature = "parallel")]
pub use fit::parallel::{fit_batch, FitJob};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
