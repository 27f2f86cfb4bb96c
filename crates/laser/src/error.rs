//! Error types for laser operations.

use crate::state::OperationalState;
use thiserror::Error;

/// Result type alias for laser operations.
pub type LaserResult<T> = Result<T, LaserError>;

/// Why an operation on the virtual laser was refused.
///
/// A refused operation never changes the instrument.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LaserError {
    /// Malformed or out-of-range input.
    #[error("{0}")]
    InvalidParameter(String),

    /// A lifecycle transition whose guard rejects the current state.
    #[error("Cannot {operation} in state {state}")]
    InvalidTransition {
        operation: &'static str,
        state: OperationalState,
    },

    /// An operation that is not permitted in the current state.
    #[error("Cannot {operation} in state {state}")]
    ForbiddenOperation {
        operation: &'static str,
        state: OperationalState,
    },
}

impl LaserError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// True for failures caused by the instrument state rather than the input.
    pub fn is_state_conflict(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. } | Self::ForbiddenOperation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = LaserError::InvalidTransition {
            operation: "turn on laser",
            state: OperationalState::Failure,
        };
        assert_eq!(err.to_string(), "Cannot turn on laser in state StateFailure");
        assert!(err.is_state_conflict());

        let err = LaserError::invalid_parameter("PP divider must be between 1 and 1000");
        assert_eq!(err.to_string(), "PP divider must be between 1 and 1000");
        assert!(!err.is_state_conflict());
    }
}
