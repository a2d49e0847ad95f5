use thiserror::Error;

/// Error types for the xyfit-rs library.
#[derive(Error, Debug)]
pub enum FitError {
    /// Error indicating a mismatch in vector or matrix dimensions.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// Invalid input data or arguments, rejected before fitting starts.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An effective variance term of the chi-square sum was zero.
    #[error("Degenerate variance at data point {index}: dy and the local model slope are both zero")]
    DegenerateVariance {
        /// Index of the offending data point
        index: usize,
    },

    /// Error indicating a singular or ill-conditioned matrix was encountered.
    #[error("Singular matrix encountered: {0}")]
    SingularMatrix(String),

    /// Error indicating the optimizer failed to converge.
    #[error("Fit failed to converge: {0}")]
    ConvergenceFailure(String),

    /// A non-finite value appeared where a finite one is required.
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Error during a statistical or linear algebra computation.
    #[error("Computation error: {0}")]
    ComputationError(String),

    /// A row of a data table could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// One-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Generic error for cases that don't fit the other categories.
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for xyfit-rs operations.
pub type Result<T> = std::result::Result<T, FitError>;

impl From<String> for FitError {
    fn from(s: String) -> Self {
        FitError::Other(s)
    }
}

impl From<&str> for FitError {
    fn from(s: &str) -> Self {
        FitError::Other(s.to_string())
    }
}
