//! Moderation error types for the donation request lifecycle.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::moderation::types::RequestStatus;

/// Errors that can occur during moderation operations.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The attempted target status.
        to: RequestStatus,
    },

    /// Attempted to modify a completed request.
    #[error("Cannot modify a completed request")]
    CannotModifyCompleted,

    /// New funding target would fall below the amount already received.
    #[error("Funding target {needed} cannot be lower than the amount already received {received}")]
    TargetBelowReceived {
        /// The proposed funding target.
        needed: Decimal,
        /// The amount already received.
        received: Decimal,
    },
}

impl ModerationError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::CannotModifyCompleted
            | Self::TargetBelowReceived { .. } => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::CannotModifyCompleted => "CANNOT_MODIFY_COMPLETED",
            Self::TargetBelowReceived { .. } => "TARGET_BELOW_RECEIVED",
        }
    }
}

impl From<ModerationError> for kindra_shared::AppError {
    fn from(err: ModerationError) -> Self {
        match &err {
            ModerationError::InvalidTransition { .. }
            | ModerationError::CannotModifyCompleted => Self::InvalidState(err.to_string()),
            ModerationError::TargetBelowReceived { .. } => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_transition_error() {
        let err = ModerationError::InvalidTransition {
            from: RequestStatus::Rejected,
            to: RequestStatus::Approved,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.to_string().contains("rejected"));
        assert!(err.to_string().contains("approved"));
    }

    #[test]
    fn test_cannot_modify_completed_error() {
        let err = ModerationError::CannotModifyCompleted;
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "CANNOT_MODIFY_COMPLETED");
    }

    #[test]
    fn test_target_below_received_error() {
        let err = ModerationError::TargetBelowReceived {
            needed: dec!(50.00),
            received: dec!(80.00),
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "TARGET_BELOW_RECEIVED");
    }
}
