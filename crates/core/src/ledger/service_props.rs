//! Property tests for the donation ledger.

use proptest::prelude::*;
use rust_decimal::Decimal;

use kindra_shared::types::Money;

use crate::ledger::error::LedgerError;
use crate::ledger::service::LedgerService;
use crate::moderation::types::RequestStatus;

/// Strategy for positive two-decimal amounts up to 10,000.00.
fn amount_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000i64).prop_map(|n| Money::new(Decimal::new(n, 2)))
}

/// Strategy for non-approved statuses.
fn closed_status_strategy() -> impl Strategy<Value = RequestStatus> {
    prop_oneof![
        Just(RequestStatus::Pending),
        Just(RequestStatus::Rejected),
        Just(RequestStatus::Completed),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any sequence of offered donations, folding accepted plans over
    /// the request never overshoots the target, and the request completes
    /// exactly when the running total reaches it.
    #[test]
    fn prop_fold_never_overshoots(
        needed in amount_strategy(),
        offers in prop::collection::vec(amount_strategy(), 1..20),
    ) {
        let mut status = RequestStatus::Approved;
        let mut received = Money::ZERO;

        for offer in offers {
            match LedgerService::plan_donation(status, needed, received, offer) {
                Ok(plan) => {
                    received = plan.new_amount_received;
                    if plan.completes {
                        status = RequestStatus::Completed;
                    }
                    prop_assert!(received <= needed, "running total overshot the target");
                    prop_assert_eq!(plan.completes, received >= needed);
                }
                Err(LedgerError::AmountExceedsRemaining { .. }) => {
                    // Rejected whole: no state change.
                    prop_assert!(offer > Money::remaining(needed, received));
                }
                Err(LedgerError::InvalidState { .. }) => {
                    prop_assert_eq!(status, RequestStatus::Completed);
                }
                Err(e) => prop_assert!(false, "unexpected error: {e}"),
            }
        }

        prop_assert!(received <= needed);
    }

    /// An accepted plan always advances the running total by exactly the
    /// donated amount.
    #[test]
    fn prop_accepted_plan_adds_exactly(
        needed in amount_strategy(),
        received in amount_strategy(),
        offer in amount_strategy(),
    ) {
        prop_assume!(received <= needed);

        if let Ok(plan) =
            LedgerService::plan_donation(RequestStatus::Approved, needed, received, offer)
        {
            prop_assert_eq!(
                plan.new_amount_received,
                received.checked_add(offer).unwrap()
            );
        }
    }

    /// Donations against a non-approved request always fail InvalidState,
    /// regardless of amounts.
    #[test]
    fn prop_closed_statuses_reject_all(
        status in closed_status_strategy(),
        needed in amount_strategy(),
        offer in amount_strategy(),
    ) {
        let result = LedgerService::plan_donation(status, needed, Money::ZERO, offer);
        prop_assert!(
            matches!(result, Err(LedgerError::InvalidState { .. })),
            "expected InvalidState for non-approved status"
        );
    }

    /// A donation of exactly the remaining capacity always completes the
    /// request.
    #[test]
    fn prop_exact_remaining_completes(
        needed in amount_strategy(),
        received in amount_strategy(),
    ) {
        prop_assume!(received < needed);

        let remaining = Money::remaining(needed, received);
        let plan =
            LedgerService::plan_donation(RequestStatus::Approved, needed, received, remaining)
                .unwrap();

        prop_assert!(plan.completes);
        prop_assert_eq!(plan.new_amount_received, needed);
    }
}
