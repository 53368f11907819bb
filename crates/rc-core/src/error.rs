//! # CoreError
//!
//! Centralized error handling for the rental console core.
//! Every failure is local and recoverable: callers branch on the variant.

use thiserror::Error;

/// The primary error type for all rc-core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Resource not found (e.g., Vehicle, Comment)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., blank comment, comment too long)
    #[error("validation error: {0}")]
    Validation(String),

    /// A range criterion whose lower bound exceeds its upper bound.
    #[error("malformed criteria: {dimension} range [{min}, {max}] has min > max")]
    MalformedCriteria {
        dimension: String,
        min: String,
        max: String,
    },
}

impl CoreError {
    pub fn vehicle_not_found(id: impl ToString) -> Self {
        Self::NotFound("Vehicle".to_string(), id.to_string())
    }

    pub fn comment_not_found(id: impl ToString) -> Self {
        Self::NotFound("Comment".to_string(), id.to_string())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn malformed(dimension: &str, min: impl ToString, max: impl ToString) -> Self {
        Self::MalformedCriteria {
            dimension: dimension.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// True when the failure is a missing vehicle or comment.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(..))
    }
}

/// A specialized Result type for rental console logic.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::vehicle_not_found(42);
        assert_eq!(err.to_string(), "Vehicle not found with ID 42");
        assert!(err.is_not_found());

        let err = CoreError::malformed("price", 500.0, 100.0);
        assert!(err.to_string().contains("price"));
        assert!(err.to_string().contains("500"));
        assert!(!err.is_not_found());
    }
}
