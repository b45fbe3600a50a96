//! Ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::moderation::types::RequestStatus;

/// Errors that can occur while applying a donation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The request is not open for donations.
    #[error("Request is {status}, donations are only accepted while approved")]
    InvalidState {
        /// The request's current status.
        status: RequestStatus,
    },

    /// The donated amount is not a positive value.
    #[error("Donation amount {amount} must be positive")]
    InvalidAmount {
        /// The offending amount.
        amount: Decimal,
    },

    /// The donation would overshoot the funding target.
    #[error("Donation amount {amount} exceeds remaining amount needed {remaining}")]
    AmountExceedsRemaining {
        /// The offending amount.
        amount: Decimal,
        /// The remaining capacity toward the target.
        remaining: Decimal,
    },
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidState { .. }
            | Self::InvalidAmount { .. }
            | Self::AmountExceedsRemaining { .. } => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::AmountExceedsRemaining { .. } => "AMOUNT_EXCEEDS_REMAINING",
        }
    }
}

impl From<LedgerError> for kindra_shared::AppError {
    fn from(err: LedgerError) -> Self {
        match &err {
            LedgerError::InvalidState { .. } => Self::InvalidState(err.to_string()),
            LedgerError::InvalidAmount { .. } => Self::InvalidAmount(err.to_string()),
            LedgerError::AmountExceedsRemaining { .. } => {
                Self::AmountExceedsRemaining(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_state_error() {
        let err = LedgerError::InvalidState {
            status: RequestStatus::Pending,
        };
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_STATE");
        assert!(err.to_string().contains("pending"));
    }

    #[test]
    fn test_invalid_amount_error() {
        let err = LedgerError::InvalidAmount { amount: dec!(0) };
        assert_eq!(err.error_code(), "INVALID_AMOUNT");
    }

    #[test]
    fn test_exceeds_remaining_error() {
        let err = LedgerError::AmountExceedsRemaining {
            amount: dec!(60.00),
            remaining: dec!(40.00),
        };
        assert_eq!(err.error_code(), "AMOUNT_EXCEEDS_REMAINING");
        assert!(err.to_string().contains("60.00"));
        assert!(err.to_string().contains("40.00"));
    }
}
