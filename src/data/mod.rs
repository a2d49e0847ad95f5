//! Measured data with uncertainties on both axes.
//!
//! A [`DataSet`] holds four parallel columns `x, dx, y, dy`. All validation
//! happens at construction, so the fitting code can assume equal lengths,
//! finite values, `dx >= 0` and `dy > 0`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

mod table;

pub use table::parse_table;

/// Points `(x ± dx, y ± dy)` to be fitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    x: Array1<f64>,
    dx: Array1<f64>,
    y: Array1<f64>,
    dy: Array1<f64>,
}

impl DataSet {
    /// Create a validated data set.
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidInput` if the columns differ in length, are empty,
    ///   contain non-finite values, or if any `dx < 0` or `dy <= 0`
    pub fn new(x: Array1<f64>, dx: Array1<f64>, y: Array1<f64>, dy: Array1<f64>) -> Result<Self> {
        let n = x.len();
        if dx.len() != n || y.len() != n || dy.len() != n {
            return Err(FitError::InvalidInput(format!(
                "Columns must have equal lengths, got x={}, dx={}, y={}, dy={}",
                n,
                dx.len(),
                y.len(),
                dy.len()
            )));
        }
        if n == 0 {
            return Err(FitError::InvalidInput("Data set is empty".to_string()));
        }

        for i in 0..n {
            if !(x[i].is_finite() && dx[i].is_finite() && y[i].is_finite() && dy[i].is_finite()) {
                return Err(FitError::InvalidInput(format!(
                    "Non-finite value in data point {}",
                    i
                )));
            }
            if dx[i] < 0.0 {
                return Err(FitError::InvalidInput(format!(
                    "Negative x uncertainty {} at data point {}",
                    dx[i], i
                )));
            }
            if dy[i] <= 0.0 {
                return Err(FitError::InvalidInput(format!(
                    "y uncertainty must be positive, got {} at data point {}",
                    dy[i], i
                )));
            }
        }

        Ok(Self { x, dx, y, dy })
    }

    /// Create a data set from `[x, dx, y, dy]` rows.
    pub fn from_rows(rows: &[[f64; 4]]) -> Result<Self> {
        let column = |k: usize| rows.iter().map(|r| r[k]).collect::<Array1<f64>>();
        Self::new(column(0), column(1), column(2), column(3))
    }

    /// Read a four column table (see [`parse_table`]).
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        parse_table(&text)
    }

    /// Read a four column table from a file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false for a constructed data set, provided for API completeness.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The x values.
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    /// The x uncertainties.
    pub fn dx(&self) -> &Array1<f64> {
        &self.dx
    }

    /// The y values.
    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    /// The y uncertainties.
    pub fn dy(&self) -> &Array1<f64> {
        &self.dy
    }

    /// Whether any x value is zero or negative.
    pub fn has_non_positive_x(&self) -> bool {
        self.x.iter().any(|&x| x <= 0.0)
    }

    /// Smallest and largest x value.
    pub fn x_range(&self) -> (f64, f64) {
        self.x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                (lo.min(x), hi.max(x))
            })
    }

    /// Keep only the points with `xmin <= x <= xmax`, preserving their order.
    ///
    /// # Errors
    ///
    /// * `FitError::InvalidInput` if `xmin >= xmax` or no point falls in the range
    pub fn select_range(&self, xmin: f64, xmax: f64) -> Result<Self> {
        if !(xmin < xmax) {
            return Err(FitError::InvalidInput(format!(
                "xmin ({}) must be smaller than xmax ({})",
                xmin, xmax
            )));
        }

        let keep: Vec<usize> = (0..self.len())
            .filter(|&i| self.x[i] >= xmin && self.x[i] <= xmax)
            .collect();
        if keep.is_empty() {
            return Err(FitError::InvalidInput(format!(
                "No data points in range [{}, {}]",
                xmin, xmax
            )));
        }

        let pick = |col: &Array1<f64>| keep.iter().map(|&i| col[i]).collect::<Array1<f64>>();
        Ok(Self {
            x: pick(&self.x),
            dx: pick(&self.dx),
            y: pick(&self.y),
            dy: pick(&self.dy),
        })
    }

    /// The x extent widened by 10% on each side, for plotting.
    ///
    /// Each end is scaled away from zero, so `[2, 8]` becomes `[1.8, 8.8]` and
    /// `[-4, -1]` becomes `[-4.4, -0.9]`.
    pub fn display_range(&self) -> (f64, f64) {
        let (xmin, xmax) = self.x_range();
        let lo = if xmin > 0.0 { xmin * 0.9 } else { xmin * 1.1 };
        let hi = if xmax > 0.0 { xmax * 1.1 } else { xmax * 0.9 };
        (lo, hi)
    }

    /// `points` evenly spaced x values across [`display_range`](Self::display_range).
    ///
    /// The grid starts at the lower end and uses a spacing of `(hi - lo) / points`,
    /// so the upper end itself is not included.
    pub fn display_grid(&self, points: usize) -> Array1<f64> {
        let (lo, hi) = self.display_range();
        let step = if points > 0 {
            (hi - lo) / points as f64
        } else {
            0.0
        };
        Array1::from_iter((0..points).map(|i| lo + i as f64 * step))
    }
}
