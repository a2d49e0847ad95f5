//! Utility functions and helpers for the xyfit-rs library.

pub mod finite_difference;
pub mod matrix_convert;

// Re-export commonly used utilities
pub use finite_difference::{curvature_matrix, descent_direction, step_sizes};
pub use matrix_convert::{nalgebra_to_ndarray, ndarray_to_nalgebra};
