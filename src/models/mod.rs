//! Built-in model functions for one-dimensional fitting.
//!
//! Every model is a variant of the closed [`ModelFunction`] enum. The variant
//! carries everything needed to know its arity, so a parameter vector can be
//! checked against a model without any extra bookkeeping.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

mod exponential;
mod logarithmic;
mod peak;
mod polynomial;

pub use exponential::exponential;
pub use logarithmic::{log10, natural_log};
pub use peak::gaussian;
pub use polynomial::{linear, polynomial};

/// The model shapes that can be fitted.
///
/// Parameters are always indexed `a0, a1, ...` in the order given by the
/// formulas below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelFunction {
    /// y = a0 + a1 * x
    Linear,

    /// y = a0 * exp(a1 * x)
    Exponential,

    /// y = a0 + a1 * x + a2 * x^2 + ... + an * x^n
    Polynomial {
        /// Highest power of x
        degree: usize,
    },

    /// y = a0 * exp(-(x - a1)^2 / (2 * a2^2))
    Gaussian,

    /// y = a0 * log10(a1 * x)
    Log10,

    /// y = a0 * ln(a1 * x)
    NaturalLog,
}

impl ModelFunction {
    /// Create a polynomial model of the specified degree.
    pub fn polynomial(degree: usize) -> Self {
        ModelFunction::Polynomial { degree }
    }

    /// Number of parameters the model expects.
    pub fn parameter_count(&self) -> usize {
        match self {
            ModelFunction::Linear => 2,
            ModelFunction::Exponential => 2,
            ModelFunction::Polynomial { degree } => degree + 1,
            ModelFunction::Gaussian => 3,
            ModelFunction::Log10 => 2,
            ModelFunction::NaturalLog => 2,
        }
    }

    /// Whether the model is only defined for x > 0.
    pub fn requires_positive_x(&self) -> bool {
        matches!(self, ModelFunction::Log10 | ModelFunction::NaturalLog)
    }

    /// Evaluate the model at a single point.
    ///
    /// The caller guarantees that `params` has [`parameter_count`](Self::parameter_count)
    /// entries; extra entries are ignored by the fixed-arity models.
    pub fn eval(&self, x: f64, params: ArrayView1<'_, f64>) -> f64 {
        match self {
            ModelFunction::Linear => linear(x, params),
            ModelFunction::Exponential => exponential(x, params),
            ModelFunction::Polynomial { .. } => polynomial(x, params),
            ModelFunction::Gaussian => gaussian(x, params),
            ModelFunction::Log10 => log10(x, params),
            ModelFunction::NaturalLog => natural_log(x, params),
        }
    }

    /// Evaluate the model at every point of `xs`.
    pub fn eval_many(&self, xs: &Array1<f64>, params: ArrayView1<'_, f64>) -> Array1<f64> {
        xs.mapv(|x| self.eval(x, params))
    }

    /// Check that a parameter vector has the right length for this model.
    pub fn check_parameters(&self, params: &Array1<f64>) -> Result<()> {
        if params.len() != self.parameter_count() {
            return Err(FitError::DimensionMismatch(format!(
                "{} expects {} parameters, got {}",
                self.name(),
                self.parameter_count(),
                params.len()
            )));
        }
        Ok(())
    }

    /// Human readable name of the fit.
    pub fn name(&self) -> &'static str {
        match self {
            ModelFunction::Linear => "Linear fit",
            ModelFunction::Exponential => "Exponential fit",
            ModelFunction::Polynomial { .. } => "Polynomial fit",
            ModelFunction::Gaussian => "Gaussian fit",
            ModelFunction::Log10 => "Base 10 logarithm fit",
            ModelFunction::NaturalLog => "Natural logarithm fit",
        }
    }

    /// The model formula in terms of `a0, a1, ...`.
    pub fn formula(&self) -> String {
        match self {
            ModelFunction::Linear => "y = a0 + a1 * x".to_string(),
            ModelFunction::Exponential => "y = a0 * exp(a1 * x)".to_string(),
            ModelFunction::Polynomial { degree } => {
                let mut terms = vec!["a0".to_string()];
                for i in 1..=*degree {
                    if i == 1 {
                        terms.push("a1 * x".to_string());
                    } else {
                        terms.push(format!("a{} * x^{}", i, i));
                    }
                }
                format!("y = {}", terms.join(" + "))
            }
            ModelFunction::Gaussian => "y = a0 * exp(-(x - a1)^2 / (2 * a2^2))".to_string(),
            ModelFunction::Log10 => "y = a0 * log10(a1 * x)".to_string(),
            ModelFunction::NaturalLog => "y = a0 * ln(a1 * x)".to_string(),
        }
    }
}

impl fmt::Display for ModelFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelFunction {
    type Err = FitError;

    /// Parse a model name such as `linear`, `exp`, `poly:3`, `gauss`, `log10` or `ln`.
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();

        if let Some(degree) = name
            .strip_prefix("poly:")
            .or_else(|| name.strip_prefix("polynomial:"))
        {
            let degree = degree.trim().parse::<usize>().map_err(|_| {
                FitError::InvalidInput(format!("Invalid polynomial degree in '{}'", s))
            })?;
            return Ok(ModelFunction::Polynomial { degree });
        }

        match name.as_str() {
            "lin" | "linear" => Ok(ModelFunction::Linear),
            "exp" | "exponential" => Ok(ModelFunction::Exponential),
            "gauss" | "gaussian" => Ok(ModelFunction::Gaussian),
            "log" | "log10" => Ok(ModelFunction::Log10),
            "ln" | "natural_log" => Ok(ModelFunction::NaturalLog),
            _ => Err(FitError::InvalidInput(format!("Unknown model '{}'", s))),
        }
    }
}
