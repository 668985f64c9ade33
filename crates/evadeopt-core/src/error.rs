//! Error types for the descent-direction search.
//!
//! Infeasible probes and degenerate directions are *not* errors here:
//! they are normal outcomes signalled by returning the unchanged
//! point/value pair. Errors cover misconfiguration, malformed shapes,
//! and numerical failures inside collaborators, and they propagate to
//! the caller unmodified.

use thiserror::Error;

/// Errors that can occur while configuring or running the search.
#[derive(Debug, Clone, Error)]
pub enum OptimizerError {
    /// Invalid configuration supplied at construction time.
    #[error("Invalid configuration: {reason} (parameter `{parameter}` = {value})")]
    InvalidConfiguration {
        /// Description of the configuration error
        reason: String,
        /// Name of the invalid parameter
        parameter: String,
        /// Value that was invalid
        value: String,
    },

    /// Dimension mismatch between vectors.
    ///
    /// Raised when operands disagree on length, e.g. a point whose size
    /// differs from the configured feature count. Inputs are never
    /// silently padded or truncated.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// Numerical failure inside an evaluation.
    #[error("Numerical error: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Operation called in a state that does not permit it.
    ///
    /// For instance, exploring before a descent direction has been set.
    #[error("Invalid state: {reason}")]
    InvalidState {
        /// Description of the state violation
        reason: String,
    },

    /// Method not implemented by a collaborator.
    ///
    /// Used for optional capabilities, e.g. the gradient of a
    /// non-differentiable objective.
    #[error("Feature not implemented: {feature}")]
    NotImplemented {
        /// Name of the unimplemented feature
        feature: String,
    },
}

impl OptimizerError {
    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2, S3>(reason: S1, parameter: S2, value: S3) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self::InvalidConfiguration {
            reason: reason.into(),
            parameter: parameter.into(),
            value: value.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create an InvalidState error.
    pub fn invalid_state<S: Into<String>>(reason: S) -> Self {
        Self::InvalidState {
            reason: reason.into(),
        }
    }

    /// Create a NotImplemented error for a specific feature.
    pub fn not_implemented<S: Into<String>>(feature: S) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
        }
    }
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, OptimizerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = OptimizerError::dimension_mismatch(3, 5);
        assert!(matches!(err, OptimizerError::DimensionMismatch { .. }));
        assert_eq!(err.to_string(), "Dimension mismatch: expected 3, got 5");

        let err = OptimizerError::invalid_configuration("must be positive", "eta", "-0.1");
        assert!(matches!(err, OptimizerError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("eta"));
    }

    #[test]
    fn test_error_display() {
        let errors = vec![
            OptimizerError::numerical_error("norm underflow"),
            OptimizerError::invalid_state("no descent direction set"),
            OptimizerError::not_implemented("gradient"),
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
