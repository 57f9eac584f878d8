//! Expense splitting.
//!
//! Turns a create request plus the authoritative member list into a
//! [`SplitPlan`] whose shares sum exactly to the expense total.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tally_shared::types::{UserId, round_money};

use super::error::ExpenseError;
use super::types::{
    CreateExpenseInput, ExpenseStatus, HouseholdMembership, ManualShare, PlannedShare, SplitPlan,
    VoteStatus,
};
use super::validation::{
    require_membership, too_small_to_split, validate_description, validate_expense_amount,
    validate_whole_cents, validate_within_limit,
};

/// Expense splitter.
///
/// Pure logic: the caller resolves the membership and the active member list
/// and persists the resulting plan.
pub struct Splitter;

impl Splitter {
    /// Validates a create request and produces its shares.
    ///
    /// Checks run in this order, and the first failure wins:
    /// 1. The creator has an active household membership
    /// 2. The total is positive and in whole cents
    /// 3. The description is not blank
    /// 4. Mode-specific checks (see [`Self::even_participants`] and
    ///    [`Self::validate_manual_shares`])
    ///
    /// `active_members` is the household's member list in fetch order; it may
    /// or may not contain the creator.
    ///
    /// # Errors
    ///
    /// Returns the first `ExpenseError` encountered.
    pub fn plan(
        input: &CreateExpenseInput,
        membership: Option<HouseholdMembership>,
        active_members: &[UserId],
    ) -> Result<SplitPlan, ExpenseError> {
        let membership = require_membership(membership)?;
        validate_expense_amount(input.amount)?;
        validate_description(&input.description)?;

        let allocation = if input.split_evenly {
            let participants =
                Self::even_participants(input.creator, input.include_creator, active_members)?;
            let amounts = Self::even_amounts(input.amount, participants.len())?;
            participants.into_iter().zip(amounts).collect::<Vec<_>>()
        } else {
            let shares = input.manual_shares.as_deref().unwrap_or_default();
            Self::validate_manual_shares(input.amount, input.creator, shares, active_members)?;
            shares.iter().map(|s| (s.participant, s.amount)).collect()
        };

        let shares = allocation
            .into_iter()
            .map(|(participant, amount_owed)| PlannedShare {
                participant,
                amount_owed,
                vote_status: VoteStatus::initial_for(participant, input.creator),
            })
            .collect();

        Ok(SplitPlan {
            household_id: membership.household_id,
            creator: input.creator,
            description: input.description.trim().to_string(),
            amount: input.amount,
            category: input.category.clone(),
            status: ExpenseStatus::Pending,
            shares,
        })
    }

    /// Builds the ordered participant list for an even split.
    ///
    /// The creator comes first when included, followed by every other active
    /// member in fetch order.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NoOtherMembers` if the creator is excluded and
    /// nobody else is active.
    pub fn even_participants(
        creator: UserId,
        include_creator: bool,
        active_members: &[UserId],
    ) -> Result<Vec<UserId>, ExpenseError> {
        let others = active_members.iter().copied().filter(|m| *m != creator);

        let participants: Vec<UserId> = if include_creator {
            std::iter::once(creator).chain(others).collect()
        } else {
            others.collect()
        };

        if participants.is_empty() {
            return Err(ExpenseError::NoOtherMembers);
        }
        Ok(participants)
    }

    /// Splits `total` into `num` amounts.
    ///
    /// Every amount but the last is `round(total / num, 2)`; the last absorbs
    /// the remainder so the amounts sum to `total` exactly.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tally_core::expense::Splitter;
    ///
    /// let amounts = Splitter::even_amounts(dec!(100.01), 5).unwrap();
    /// assert_eq!(amounts, vec![dec!(20.00), dec!(20.00), dec!(20.00), dec!(20.00), dec!(20.01)]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::InvalidAmount` if `num` is zero or any amount
    /// would come out at zero or below.
    pub fn even_amounts(total: Decimal, num: usize) -> Result<Vec<Decimal>, ExpenseError> {
        if num == 0 {
            return Err(too_small_to_split(total, num));
        }

        let count = Decimal::from(num);
        let base = round_money(total / count);
        let last = round_money(total - base * (count - Decimal::ONE));

        if last <= Decimal::ZERO || (num > 1 && base <= Decimal::ZERO) {
            return Err(too_small_to_split(total, num));
        }

        let mut amounts = vec![base; num - 1];
        amounts.push(last);
        Ok(amounts)
    }

    /// Validates a manual allocation.
    ///
    /// Each share is checked in list order for membership (the creator is
    /// always valid), duplicates, and a positive whole-cent amount no larger
    /// than a stored amount can be. The sum must then equal `total` exactly.
    ///
    /// # Errors
    ///
    /// Returns `EmptyManualShares`, `InvalidParticipant`, `DuplicateParticipant`,
    /// `InvalidAmount` or `ShareMismatch`.
    pub fn validate_manual_shares(
        total: Decimal,
        creator: UserId,
        shares: &[ManualShare],
        active_members: &[UserId],
    ) -> Result<(), ExpenseError> {
        if shares.is_empty() {
            return Err(ExpenseError::EmptyManualShares);
        }

        let mut seen = HashSet::with_capacity(shares.len());
        for share in shares {
            if share.participant != creator && !active_members.contains(&share.participant) {
                return Err(ExpenseError::InvalidParticipant(share.participant));
            }
            if !seen.insert(share.participant) {
                return Err(ExpenseError::DuplicateParticipant(share.participant));
            }
            if share.amount <= Decimal::ZERO {
                return Err(ExpenseError::InvalidAmount(format!(
                    "Share for user {} must be greater than zero",
                    share.participant
                )));
            }
            validate_whole_cents(share.amount)?;
            validate_within_limit(share.amount)?;
        }

        let split_total = shares
            .iter()
            .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s.amount))
            .ok_or_else(|| {
                ExpenseError::InvalidAmount(
                    "Manual shares add up to more than can be stored".to_string(),
                )
            })?;
        if split_total != total {
            return Err(ExpenseError::ShareMismatch {
                split_total,
                expense_total: total,
            });
        }
        Ok(())
    }
}
