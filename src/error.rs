use thiserror::Error;

/// Result type for solver operations
pub type Result<T> = std::result::Result<T, SolverError>;

/// Main error type for the value-function engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The model discount cannot seed the pessimistic value function
    #[error("Invalid discount {discount}: the solver requires a discount strictly below 1")]
    InvalidDiscount { discount: f64 },

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Invalid dimensions for operations
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: String, actual: String },

    /// Malformed model tensors
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    /// Numerical computation errors
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// A pruner dropped every vector of a non-empty input
    #[error("Pruning removed all {input} vectors of a non-empty set")]
    EmptyPrune { input: usize },
}

// Helper functions for common error patterns
impl SolverError {
    pub fn dimension_mismatch<S: Into<String>>(expected: S, actual: S) -> Self {
        SolverError::DimensionMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_parameter<S: Into<String>>(name: S, reason: S) -> Self {
        SolverError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
