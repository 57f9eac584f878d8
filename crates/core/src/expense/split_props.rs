//! Property-based tests for the Splitter.
//!
//! - Property 1: Even split sums exactly to the total
//! - Property 2: Manual splits are accepted only when they sum exactly
//! - Property 3: Remainder lands on the last participant

use proptest::prelude::*;
use rust_decimal::Decimal;
use tally_shared::types::{HouseholdId, UserId, round_money};

use super::error::ExpenseError;
use super::split::Splitter;
use super::types::{CreateExpenseInput, HouseholdMembership, ManualShare};

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a list of positive share amounts.
fn share_amounts() -> impl Strategy<Value = Vec<Decimal>> {
    prop::collection::vec(positive_amount(), 1..10)
}

fn members(count: usize) -> Vec<UserId> {
    (0..count).map(|_| UserId::new()).collect()
}

fn manual_input(creator: UserId, amount: Decimal, shares: Vec<ManualShare>) -> CreateExpenseInput {
    CreateExpenseInput {
        description: "Property test".to_string(),
        amount,
        category: None,
        creator,
        split_evenly: false,
        include_creator: false,
        manual_shares: Some(shares),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property 1: for any total and 1..=50 participants, either the split is
    /// rejected as too small or it yields `num` positive amounts summing to total.
    ///
    /// A split is rejected exactly when the rounded base share is zero or the
    /// first `num - 1` base shares already use up the whole total.
    #[test]
    fn prop_even_split_sums_to_total(total in positive_amount(), num in 1usize..=50) {
        let count = Decimal::from(num);
        let base = round_money(total / count);
        let too_small = base.is_zero() || base * (count - Decimal::ONE) >= total;

        match Splitter::even_amounts(total, num) {
            Ok(amounts) => {
                prop_assert!(!too_small);
                prop_assert_eq!(amounts.len(), num);
                prop_assert_eq!(amounts.iter().copied().sum::<Decimal>(), total);
                prop_assert!(amounts.iter().all(|a| *a > Decimal::ZERO));
            }
            Err(err) => {
                prop_assert!(too_small);
                prop_assert!(matches!(err, ExpenseError::InvalidAmount(_)));
            }
        }
    }

    /// Property 1a: less than a cent per participant can never be split.
    #[test]
    fn prop_even_split_rejects_under_a_cent_each(num in 2usize..=50, short_by in 1i64..=100) {
        let cents = i64::try_from(num).unwrap() - short_by;
        prop_assume!(cents > 0);
        let total = Decimal::new(cents, 2);
        prop_assert!(matches!(
            Splitter::even_amounts(total, num),
            Err(ExpenseError::InvalidAmount(_))
        ));
    }

    /// Property 1b: totals of at least one dollar per participant always split.
    #[test]
    fn prop_even_split_never_fails_for_large_totals(dollars in 1i64..10_000, num in 1usize..=50) {
        let total = Decimal::from(dollars) * Decimal::from(num);
        let amounts = Splitter::even_amounts(total, num).unwrap();
        prop_assert_eq!(amounts.iter().copied().sum::<Decimal>(), total);
    }

    /// Property 3: every amount except the last is identical.
    #[test]
    fn prop_remainder_on_last(total in positive_amount(), num in 2usize..=50) {
        if let Ok(amounts) = Splitter::even_amounts(total, num) {
            let base = amounts[0];
            prop_assert!(amounts[..num - 1].iter().all(|a| *a == base));
        }
    }

    /// Property 2: a manual split that sums to the total is accepted as-is.
    #[test]
    fn prop_manual_exact_sum_accepted(amounts in share_amounts()) {
        let participants = members(amounts.len());
        let creator = UserId::new();
        let total: Decimal = amounts.iter().copied().sum();
        let shares: Vec<ManualShare> = participants
            .iter()
            .zip(&amounts)
            .map(|(p, a)| ManualShare { participant: *p, amount: *a })
            .collect();

        let membership = HouseholdMembership { household_id: HouseholdId::new(), user_id: creator };
        let plan = Splitter::plan(&manual_input(creator, total, shares), Some(membership), &participants)
            .unwrap();

        prop_assert_eq!(plan.shares_total(), total);
        let owed: Vec<Decimal> = plan.shares.iter().map(|s| s.amount_owed).collect();
        prop_assert_eq!(owed, amounts);
    }

    /// Property 2b: any cent of difference is rejected, never corrected.
    #[test]
    fn prop_manual_mismatch_rejected(amounts in share_amounts(), off_by_cents in 1i64..100, over in any::<bool>()) {
        let participants = members(amounts.len());
        let creator = UserId::new();
        let split_total: Decimal = amounts.iter().copied().sum();
        let delta = Decimal::new(off_by_cents, 2);
        let total = if over { split_total + delta } else { split_total - delta };
        prop_assume!(total > Decimal::ZERO);

        let shares: Vec<ManualShare> = participants
            .iter()
            .zip(&amounts)
            .map(|(p, a)| ManualShare { participant: *p, amount: *a })
            .collect();
        let membership = HouseholdMembership { household_id: HouseholdId::new(), user_id: creator };
        let result = Splitter::plan(&manual_input(creator, total, shares), Some(membership), &participants);

        prop_assert_eq!(
            result,
            Err(ExpenseError::ShareMismatch { split_total, expense_total: total })
        );
    }
}
