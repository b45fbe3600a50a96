//! Ledger service for donation validation and derivation.
//!
//! The service is pure: it takes the request's current balances and
//! status, validates a donation against them, and derives the new
//! running total and completion flag. The database layer re-asserts the
//! same guards inside a single conditional UPDATE so concurrent
//! donations cannot jointly overshoot the target (see the donation
//! repository).

use kindra_shared::types::Money;

use crate::ledger::error::LedgerError;
use crate::ledger::types::DonationPlan;
use crate::moderation::types::RequestStatus;

/// Stateless donation ledger.
pub struct LedgerService;

impl LedgerService {
    /// Validate a donation and derive its effect on the request.
    ///
    /// Guard order matches the operation contract:
    /// 1. the request must be Approved,
    /// 2. the amount must be positive,
    /// 3. the amount must not exceed `amount_needed - amount_received`
    ///    (hard ceiling, no partial acceptance).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if any guard fails; no guard has side effects.
    pub fn plan_donation(
        status: RequestStatus,
        amount_needed: Money,
        amount_received: Money,
        amount: Money,
    ) -> Result<DonationPlan, LedgerError> {
        if !status.is_open_for_donations() {
            return Err(LedgerError::InvalidState { status });
        }

        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount {
                amount: amount.amount(),
            });
        }

        let remaining = Money::remaining(amount_needed, amount_received);
        if amount > remaining {
            return Err(LedgerError::AmountExceedsRemaining {
                amount: amount.amount(),
                remaining: remaining.amount(),
            });
        }

        let new_amount_received = amount_received
            .checked_add(amount)
            .ok_or(LedgerError::InvalidAmount {
                amount: amount.amount(),
            })?;

        Ok(DonationPlan {
            amount,
            new_amount_received,
            completes: new_amount_received >= amount_needed,
        })
    }

    /// Remaining capacity toward the funding target.
    #[must_use]
    pub fn remaining(amount_needed: Money, amount_received: Money) -> Money {
        Money::remaining(amount_needed, amount_received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    #[test]
    fn test_partial_donation_keeps_request_open() {
        let plan = LedgerService::plan_donation(
            RequestStatus::Approved,
            money(dec!(100.00)),
            money(dec!(0)),
            money(dec!(60.00)),
        )
        .unwrap();

        assert_eq!(plan.new_amount_received.amount(), dec!(60.00));
        assert!(!plan.completes);
    }

    #[test]
    fn test_exact_fill_completes_request() {
        let plan = LedgerService::plan_donation(
            RequestStatus::Approved,
            money(dec!(100.00)),
            money(dec!(60.00)),
            money(dec!(40.00)),
        )
        .unwrap();

        assert_eq!(plan.new_amount_received.amount(), dec!(100.00));
        assert!(plan.completes);
    }

    #[test]
    fn test_donation_to_completed_request_fails() {
        let result = LedgerService::plan_donation(
            RequestStatus::Completed,
            money(dec!(100.00)),
            money(dec!(100.00)),
            money(dec!(0.01)),
        );
        assert!(matches!(
            result,
            Err(LedgerError::InvalidState {
                status: RequestStatus::Completed
            })
        ));
    }

    #[test]
    fn test_donation_to_pending_or_rejected_fails() {
        for status in [RequestStatus::Pending, RequestStatus::Rejected] {
            let result = LedgerService::plan_donation(
                status,
                money(dec!(100.00)),
                money(dec!(0)),
                money(dec!(10.00)),
            );
            assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
        }
    }

    #[test]
    fn test_zero_amount_fails() {
        let result = LedgerService::plan_donation(
            RequestStatus::Approved,
            money(dec!(100.00)),
            money(dec!(0)),
            Money::ZERO,
        );
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
    }

    #[test]
    fn test_negative_amount_fails() {
        let result = LedgerService::plan_donation(
            RequestStatus::Approved,
            money(dec!(100.00)),
            money(dec!(0)),
            money(dec!(-5.00)),
        );
        assert!(matches!(result, Err(LedgerError::InvalidAmount { .. })));
    }

    #[test]
    fn test_overshoot_fails_whole() {
        // 60 remaining, 60.01 offered: rejected entirely, no partial acceptance.
        let result = LedgerService::plan_donation(
            RequestStatus::Approved,
            money(dec!(100.00)),
            money(dec!(40.00)),
            money(dec!(60.01)),
        );
        match result {
            Err(LedgerError::AmountExceedsRemaining { amount, remaining }) => {
                assert_eq!(amount, dec!(60.01));
                assert_eq!(remaining, dec!(60.00));
            }
            other => panic!("expected AmountExceedsRemaining, got {other:?}"),
        }
    }

    #[test]
    fn test_status_guard_precedes_amount_guard() {
        // A non-positive amount against a pending request reports the
        // state error, matching the operation's guard order.
        let result = LedgerService::plan_donation(
            RequestStatus::Pending,
            money(dec!(100.00)),
            money(dec!(0)),
            Money::ZERO,
        );
        assert!(matches!(result, Err(LedgerError::InvalidState { .. })));
    }

    #[test]
    fn test_spec_scenario_sixty_forty_then_penny() {
        let needed = money(dec!(100.00));

        let first =
            LedgerService::plan_donation(RequestStatus::Approved, needed, Money::ZERO, money(dec!(60.00)))
                .unwrap();
        assert_eq!(first.new_amount_received.amount(), dec!(60.00));
        assert!(!first.completes);

        let second = LedgerService::plan_donation(
            RequestStatus::Approved,
            needed,
            first.new_amount_received,
            money(dec!(40.00)),
        )
        .unwrap();
        assert_eq!(second.new_amount_received.amount(), dec!(100.00));
        assert!(second.completes);

        // After completion the status is Completed; one more cent fails InvalidState.
        let third = LedgerService::plan_donation(
            RequestStatus::Completed,
            needed,
            second.new_amount_received,
            money(dec!(0.01)),
        );
        assert!(matches!(third, Err(LedgerError::InvalidState { .. })));
    }

    #[test]
    fn test_remaining() {
        assert_eq!(
            LedgerService::remaining(money(dec!(100.00)), money(dec!(25.50))).amount(),
            dec!(74.50)
        );
    }
}
