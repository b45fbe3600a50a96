//! Moderation service for donation request state transitions.
//!
//! This module implements the core state machine logic for moving
//! requests through the moderation lifecycle.

use chrono::Utc;

use kindra_shared::types::{Money, UserId};

use crate::moderation::error::ModerationError;
use crate::moderation::types::{ModerationAction, RequestStatus};

/// Stateless service for managing request status transitions.
///
/// All methods are associated functions that validate and execute
/// state transitions, returning the appropriate `ModerationAction`
/// with audit trail information. The caller persists the action under
/// a status-guarded update so concurrent moderation cannot double-apply.
pub struct ModerationService;

impl ModerationService {
    /// Approve a pending request, opening it for donations.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the request
    /// * `approved_by` - The admin approving the request
    ///
    /// # Returns
    /// * `Ok(ModerationAction::Approve)` if the transition is valid
    /// * `Err(ModerationError::InvalidTransition)` if not in Pending status
    pub fn approve(
        current_status: RequestStatus,
        approved_by: UserId,
    ) -> Result<ModerationAction, ModerationError> {
        match current_status {
            RequestStatus::Pending => Ok(ModerationAction::Approve {
                new_status: RequestStatus::Approved,
                approved_by,
                approved_at: Utc::now(),
            }),
            _ => Err(ModerationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Approved,
            }),
        }
    }

    /// Reject a pending request (terminal).
    ///
    /// # Returns
    /// * `Ok(ModerationAction::Reject)` if the transition is valid
    /// * `Err(ModerationError::InvalidTransition)` if not in Pending status
    pub fn reject(current_status: RequestStatus) -> Result<ModerationAction, ModerationError> {
        match current_status {
            RequestStatus::Pending => Ok(ModerationAction::Reject {
                new_status: RequestStatus::Rejected,
            }),
            _ => Err(ModerationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Rejected,
            }),
        }
    }

    /// Close a fully funded request.
    ///
    /// Triggered exclusively by the ledger when cumulative donations
    /// reach the funding target; no actor can invoke it directly.
    ///
    /// # Returns
    /// * `Ok(ModerationAction::Complete)` if the transition is valid
    /// * `Err(ModerationError::InvalidTransition)` if not in Approved status
    pub fn complete(current_status: RequestStatus) -> Result<ModerationAction, ModerationError> {
        match current_status {
            RequestStatus::Approved => Ok(ModerationAction::Complete {
                new_status: RequestStatus::Completed,
            }),
            _ => Err(ModerationError::InvalidTransition {
                from: current_status,
                to: RequestStatus::Completed,
            }),
        }
    }

    /// Validate that the owning NGO may update the request with a new
    /// funding target.
    ///
    /// Editable while the request is not Completed; the target may never
    /// drop below the amount already received, which would break the
    /// ledger invariant.
    pub fn validate_owner_update(
        current_status: RequestStatus,
        new_amount_needed: Money,
        amount_received: Money,
    ) -> Result<(), ModerationError> {
        if !current_status.is_editable() {
            return Err(ModerationError::CannotModifyCompleted);
        }
        if new_amount_needed < amount_received {
            return Err(ModerationError::TargetBelowReceived {
                needed: new_amount_needed.amount(),
                received: amount_received.amount(),
            });
        }
        Ok(())
    }

    /// Validate that the owning NGO may delete the request.
    pub fn validate_owner_delete(current_status: RequestStatus) -> Result<(), ModerationError> {
        if current_status.is_editable() {
            Ok(())
        } else {
            Err(ModerationError::CannotModifyCompleted)
        }
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - Pending → Approved (approve)
    /// - Pending → Rejected (reject)
    /// - Approved → Completed (ledger)
    #[must_use]
    pub fn is_valid_transition(from: RequestStatus, to: RequestStatus) -> bool {
        matches!(
            (from, to),
            (
                RequestStatus::Pending,
                RequestStatus::Approved | RequestStatus::Rejected
            ) | (RequestStatus::Approved, RequestStatus::Completed)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const ALL_STATUSES: [RequestStatus; 4] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Completed,
    ];

    #[test]
    fn test_approve_from_pending() {
        let admin = UserId::new();
        let action = ModerationService::approve(RequestStatus::Pending, admin).unwrap();
        assert_eq!(action.new_status(), RequestStatus::Approved);
        match action {
            ModerationAction::Approve { approved_by, .. } => assert_eq!(approved_by, admin),
            _ => panic!("expected approve action"),
        }
    }

    #[test]
    fn test_approve_from_non_pending_fails() {
        for status in [
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Completed,
        ] {
            let result = ModerationService::approve(status, UserId::new());
            assert!(matches!(
                result,
                Err(ModerationError::InvalidTransition { .. })
            ));
        }
    }

    #[test]
    fn test_reject_from_pending() {
        let action = ModerationService::reject(RequestStatus::Pending).unwrap();
        assert_eq!(action.new_status(), RequestStatus::Rejected);
    }

    #[test]
    fn test_reject_from_non_pending_fails() {
        let result = ModerationService::reject(RequestStatus::Approved);
        assert!(matches!(
            result,
            Err(ModerationError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_complete_from_approved() {
        let action = ModerationService::complete(RequestStatus::Approved).unwrap();
        assert_eq!(action.new_status(), RequestStatus::Completed);
    }

    #[test]
    fn test_complete_from_non_approved_fails() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Rejected,
            RequestStatus::Completed,
        ] {
            assert!(ModerationService::complete(status).is_err());
        }
    }

    #[test]
    fn test_no_transition_out_of_terminal_states() {
        for from in [RequestStatus::Rejected, RequestStatus::Completed] {
            for to in ALL_STATUSES {
                assert!(!ModerationService::is_valid_transition(from, to));
            }
        }
    }

    #[test]
    fn test_is_valid_transition_table() {
        assert!(ModerationService::is_valid_transition(
            RequestStatus::Pending,
            RequestStatus::Approved
        ));
        assert!(ModerationService::is_valid_transition(
            RequestStatus::Pending,
            RequestStatus::Rejected
        ));
        assert!(ModerationService::is_valid_transition(
            RequestStatus::Approved,
            RequestStatus::Completed
        ));

        assert!(!ModerationService::is_valid_transition(
            RequestStatus::Pending,
            RequestStatus::Completed
        ));
        assert!(!ModerationService::is_valid_transition(
            RequestStatus::Approved,
            RequestStatus::Pending
        ));
    }

    #[test]
    fn test_owner_update_allowed_while_not_completed() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
        ] {
            assert!(
                ModerationService::validate_owner_update(
                    status,
                    Money::new(dec!(200.00)),
                    Money::new(dec!(50.00)),
                )
                .is_ok()
            );
        }
    }

    #[test]
    fn test_owner_update_rejected_when_completed() {
        let result = ModerationService::validate_owner_update(
            RequestStatus::Completed,
            Money::new(dec!(200.00)),
            Money::new(dec!(100.00)),
        );
        assert!(matches!(result, Err(ModerationError::CannotModifyCompleted)));
    }

    #[test]
    fn test_owner_update_target_below_received() {
        let result = ModerationService::validate_owner_update(
            RequestStatus::Approved,
            Money::new(dec!(40.00)),
            Money::new(dec!(60.00)),
        );
        assert!(matches!(
            result,
            Err(ModerationError::TargetBelowReceived { .. })
        ));
    }

    #[test]
    fn test_owner_delete_guard() {
        assert!(ModerationService::validate_owner_delete(RequestStatus::Pending).is_ok());
        assert!(ModerationService::validate_owner_delete(RequestStatus::Approved).is_ok());
        assert!(ModerationService::validate_owner_delete(RequestStatus::Rejected).is_ok());
        assert!(matches!(
            ModerationService::validate_owner_delete(RequestStatus::Completed),
            Err(ModerationError::CannotModifyCompleted)
        ));
    }
}
