//! Matrix conversion between ndarray and nalgebra.
//!
//! The crate stores every vector and matrix as an `ndarray` type. Dense
//! decompositions (SVD, inversion) are done with `nalgebra`, so the
//! uncertainty estimator converts at that boundary only.

use nalgebra::DMatrix;
use ndarray::Array2;

use crate::error::{FitError, Result};

/// Convert an ndarray Array2 to a nalgebra DMatrix.
///
/// # Errors
///
/// * `FitError::NumericalError` if the matrix contains a non-finite entry
pub fn ndarray_to_nalgebra(arr: &Array2<f64>) -> Result<DMatrix<f64>> {
    if let Some(((i, j), v)) = arr.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(FitError::NumericalError(format!(
            "Non-finite matrix entry {} at ({}, {})",
            v, i, j
        )));
    }

    // ndarray indexes row-major, nalgebra stores column-major
    Ok(DMatrix::from_fn(arr.nrows(), arr.ncols(), |i, j| arr[[i, j]]))
}

/// Convert a nalgebra DMatrix to an ndarray Array2.
pub fn nalgebra_to_ndarray(mat: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((mat.nrows(), mat.ncols()), |(i, j)| mat[(i, j)])
}
