//! Termination states and the iteration budget of the descent loop.

use serde::{Deserialize, Serialize};

/// How a minimization ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceStatus {
    /// The chi-square changed by no more than the tolerance between two iterations.
    Converged,

    /// No single-parameter perturbation changed the chi-square, so no
    /// direction could be estimated. This is not evidence of a minimum.
    FlatObjective,

    /// The iteration budget was used up before convergence.
    MaxIterationsReached,

    /// The cancellation token was set.
    Cancelled,

    /// The time limit elapsed.
    TimeLimitReached,

    /// The objective produced a non-finite value while estimating the direction.
    NumericalError,
}

impl ConvergenceStatus {
    /// Returns true if the minimization reached a minimum.
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceStatus::Converged)
    }

    /// Returns a description of the convergence status.
    pub fn description(&self) -> &'static str {
        match self {
            ConvergenceStatus::Converged => "Converged: chi-square change below tolerance",
            ConvergenceStatus::FlatObjective => {
                "Terminated: chi-square does not respond to parameter changes, try different initial parameters"
            },
            ConvergenceStatus::MaxIterationsReached => {
                "Terminated: maximum iterations reached, try different initial parameters"
            }
            ConvergenceStatus::Cancelled => "Terminated: cancelled",
            ConvergenceStatus::TimeLimitReached => "Terminated: time limit reached",
            ConvergenceStatus::NumericalError => "Terminated: numerical error",
        }
    }
}

impl std::fmt::Display for ConvergenceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

/// Number of chi-square trial evaluations a minimization may spend.
///
/// One budget is shared by all line searches of a minimization; every trial
/// point of a bracket or advance phase consumes one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationBudget {
    limit: usize,
    used: usize,
}

impl IterationBudget {
    /// Create a budget of `limit` units.
    pub fn new(limit: usize) -> Self {
        Self { limit, used: 0 }
    }

    /// Take one unit, returning false if none is left.
    pub fn try_consume(&mut self) -> bool {
        if self.used >= self.limit {
            return false;
        }
        self.used += 1;
        true
    }

    /// Units consumed so far.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Units still available.
    pub fn remaining(&self) -> usize {
        self.limit - self.used
    }

    /// Whether no unit is left.
    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }
}
