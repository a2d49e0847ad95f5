//! Gradient descent minimization of the chi-square.
//!
//! The optimizer repeats two steps until the chi-square settles:
//!
//! - estimate a descent direction with one-sided finite differences, scaled by
//!   each parameter's step size (see [`crate::utils::finite_difference`]);
//! - walk along it with an adaptive [`LineSearch`] that halves its scale until
//!   the chi-square drops, keeps stepping while it drops, and finishes with a
//!   parabolic interpolation of the last three samples.
//!
//! The distance travelled by one line search seeds the next, so the step scale
//! adapts to the problem without any tuning.

pub mod algorithm;
pub mod config;
pub mod convergence;
pub mod line_search;

pub use algorithm::{DescentResult, GradientDescent};
pub use config::{CancellationToken, FitConfig};
pub use convergence::{ConvergenceStatus, IterationBudget};
pub use line_search::{LineSearch, LineSearchOutcome, LineSearchStatus};
