//! Property-based tests for the SettlementTracker.
//!
//! - Property 4: Payments are monotonic and never exceed the amount owed
//! - Property 5: Status derivation ignores payment order
//! - Property 6: Rejected payments change nothing

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::error::ExpenseError;
use super::settlement::SettlementTracker;
use super::types::{ExpenseStatus, ShareBalance};

/// Strategy to generate positive amounts (0.01 to 1,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 4: any sequence of payments keeps `0 <= paid <= owed`, never
    /// decreases `paid`, and flips `is_paid` exactly when `paid` reaches `owed`.
    #[test]
    fn prop_payments_are_monotonic(
        owed in positive_amount(),
        payments in prop::collection::vec(positive_amount(), 1..20),
    ) {
        let mut share = ShareBalance::unpaid(owed);

        for payment in payments {
            let before = share;
            match SettlementTracker::apply_payment(&share, payment) {
                Ok(next) => {
                    prop_assert!(!before.is_paid);
                    prop_assert_eq!(next.paid_amount, before.paid_amount + payment);
                    prop_assert!(next.paid_amount <= next.amount_owed);
                    prop_assert_eq!(next.is_paid, next.paid_amount == owed);
                    share = next;
                }
                Err(ExpenseError::OverpaymentAttempt { amount, outstanding }) => {
                    prop_assert_eq!(amount, payment);
                    prop_assert_eq!(outstanding, before.outstanding());
                    prop_assert!(payment > outstanding);
                }
                Err(ExpenseError::AlreadyFullyPaid) => prop_assert!(before.is_paid),
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }
            prop_assert!(share.paid_amount >= before.paid_amount);
        }
    }

    /// Property 5: the derived status depends only on the set of paid flags.
    #[test]
    fn prop_status_is_order_independent(flags in prop::collection::vec(any::<bool>(), 1..10)) {
        let forward = SettlementTracker::derive_status(flags.iter().copied());
        let backward = SettlementTracker::derive_status(flags.iter().rev().copied());
        prop_assert_eq!(forward, backward);

        let expected = if flags.iter().all(|f| *f) {
            ExpenseStatus::FullySettled
        } else {
            ExpenseStatus::PartiallySettled
        };
        prop_assert_eq!(forward, expected);
    }

    /// Property 6: an overpayment leaves the share untouched.
    #[test]
    fn prop_overpayment_is_rejected(owed in positive_amount(), paid_cents in 0i64..100_000, extra in positive_amount()) {
        let paid = Decimal::new(paid_cents, 2);
        prop_assume!(paid < owed);
        let share = ShareBalance { amount_owed: owed, paid_amount: paid, is_paid: false };
        let snapshot = share;

        let attempt = share.outstanding() + extra;
        let result = SettlementTracker::apply_payment(&share, attempt);

        prop_assert_eq!(
            result,
            Err(ExpenseError::OverpaymentAttempt { amount: attempt, outstanding: owed - paid })
        );
        prop_assert_eq!(share, snapshot);
    }

    /// Property 6b: a paid share rejects every further payment.
    #[test]
    fn prop_paid_share_rejects_payment(owed in positive_amount(), payment in positive_amount()) {
        let share = ShareBalance { amount_owed: owed, paid_amount: owed, is_paid: true };
        prop_assert_eq!(
            SettlementTracker::apply_payment(&share, payment),
            Err(ExpenseError::AlreadyFullyPaid)
        );
    }
}
