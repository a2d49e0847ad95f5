//! Configuration options for the gradient descent fit.
//!
//! `FitConfig` collects every tunable of a fit: the convergence tolerance,
//! the iteration budget, the finite difference fractions, the conditioning
//! limit of the covariance inversion, and the cooperative stop conditions.
//! It can be loaded from JSON; missing fields take their defaults.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

/// A shared flag that asks a running fit to stop.
///
/// Clones share the same flag, so one clone can be handed to the fit and
/// another kept by the caller (or another thread) to cancel it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Configuration options for the gradient descent fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConfig {
    /// Stop once the chi-square changes by at most this much. Default: 1e-5
    pub tolerance: f64,

    /// Chi-square trial evaluations allowed across all line searches. Default: 1_000_000
    pub max_iterations: usize,

    /// Line search scale of the first iteration, and the fallback when a
    /// line search makes no progress. Default: 0.1
    pub initial_step: f64,

    /// Step sizes as a fraction of the initial parameter magnitudes. Default: 0.01
    pub step_fraction: f64,

    /// Gradient perturbation as a fraction of the step sizes. Default: 0.01
    pub gradient_fraction: f64,

    /// Largest condition number of the curvature matrix that is still inverted. Default: 1e13
    pub max_condition_number: f64,

    /// Wall clock limit checked between iterations. Default: none
    pub time_limit: Option<Duration>,

    /// Token checked between iterations. Never serialized.
    #[serde(skip)]
    pub cancellation: Option<CancellationToken>,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 1_000_000,
            initial_step: 0.1,
            step_fraction: 0.01,
            gradient_fraction: 0.01,
            max_condition_number: 1e13,
            time_limit: None,
            cancellation: None,
        }
    }
}

impl FitConfig {
    /// Load a configuration from JSON.
    ///
    /// # Errors
    ///
    /// * `FitError::JsonError` if the text is not valid JSON for this type
    /// * `FitError::InvalidInput` if a value is out of range
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every numeric option is in range.
    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(FitError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }

        let positive = [
            ("initial_step", self.initial_step),
            ("step_fraction", self.step_fraction),
            ("gradient_fraction", self.gradient_fraction),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(FitError::InvalidInput(format!(
                    "{} must be finite and positive, got {}",
                    name, value
                )));
            }
        }

        if !(self.max_condition_number > 1.0) {
            return Err(FitError::InvalidInput(format!(
                "max_condition_number must exceed 1, got {}",
                self.max_condition_number
            )));
        }

        Ok(())
    }

    /// Whether the attached cancellation token was set.
    pub fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }
}
