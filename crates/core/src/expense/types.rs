//! Expense domain types.
//!
//! Statuses are closed enums so status derivation is exhaustive. Amounts are
//! `Decimal` with two decimal places.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{HouseholdId, UserId};

/// Expense-level settlement status, derived from the paid flags of its shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseStatus {
    /// Initial status: no payment has been recorded yet.
    Pending,
    /// At least one payment recorded, at least one share still open.
    PartiallySettled,
    /// Every share is fully paid (terminal).
    FullySettled,
}

impl std::fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::PartiallySettled => write!(f, "PARTIALLY_SETTLED"),
            Self::FullySettled => write!(f, "FULLY_SETTLED"),
        }
    }
}

/// A participant's acceptance of their share. Recorded only; no workflow acts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteStatus {
    /// Waiting for the participant.
    Pending,
    /// Accepted (the creator's own share starts here).
    Accepted,
    /// Rejected by the participant.
    Rejected,
}

impl VoteStatus {
    /// Initial vote for a share: the creator has implicitly accepted their own.
    #[must_use]
    pub fn initial_for(participant: UserId, creator: UserId) -> Self {
        if participant == creator {
            Self::Accepted
        } else {
            Self::Pending
        }
    }
}

impl std::fmt::Display for VoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Accepted => write!(f, "ACCEPTED"),
            Self::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// Payment progress of a single share. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShareState {
    /// Nothing paid.
    Unpaid,
    /// Something paid, something still owed.
    PartiallyPaid,
    /// Paid in full (terminal).
    FullyPaid,
}

/// An active membership: the household the user currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HouseholdMembership {
    /// The household.
    pub household_id: HouseholdId,
    /// The member.
    pub user_id: UserId,
}

/// One `{participant, amount}` pair of a manual split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualShare {
    /// Who owes the amount.
    #[serde(alias = "user_id")]
    pub participant: UserId,
    /// What they owe.
    pub amount: Decimal,
}

/// Input for creating and splitting an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// What the expense was for.
    pub description: String,
    /// Total amount (positive, whole cents).
    pub amount: Decimal,
    /// Optional free-text category.
    pub category: Option<String>,
    /// The member recording the expense.
    pub creator: UserId,
    /// Split evenly across members instead of using `manual_shares`.
    pub split_evenly: bool,
    /// Whether the creator takes a share of an even split.
    pub include_creator: bool,
    /// Explicit allocation, used when `split_evenly` is false.
    pub manual_shares: Option<Vec<ManualShare>>,
}

/// A share as produced by the splitter, before it is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedShare {
    /// Who owes the amount.
    pub participant: UserId,
    /// What they owe.
    pub amount_owed: Decimal,
    /// Initial vote.
    pub vote_status: VoteStatus,
}

impl PlannedShare {
    /// Returns the unpaid balance this share starts with.
    #[must_use]
    pub const fn initial_balance(&self) -> ShareBalance {
        ShareBalance::unpaid(self.amount_owed)
    }
}

/// A fully validated expense with its shares, ready to be written in one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    /// Owning household.
    pub household_id: HouseholdId,
    /// The member recording the expense.
    pub creator: UserId,
    /// Trimmed description.
    pub description: String,
    /// Total amount.
    pub amount: Decimal,
    /// Optional category.
    pub category: Option<String>,
    /// Initial status.
    pub status: ExpenseStatus,
    /// Shares in construction order. Their amounts sum to `amount` exactly.
    pub shares: Vec<PlannedShare>,
}

impl SplitPlan {
    /// Sum of all planned shares.
    #[must_use]
    pub fn shares_total(&self) -> Decimal {
        self.shares.iter().map(|s| s.amount_owed).sum()
    }
}

/// Payment position of one share.
///
/// Invariants: `0 <= paid_amount <= amount_owed` and
/// `is_paid == (paid_amount >= amount_owed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBalance {
    /// What the participant owes in total.
    pub amount_owed: Decimal,
    /// What they have paid so far.
    pub paid_amount: Decimal,
    /// Whether the share is paid in full.
    pub is_paid: bool,
}

impl ShareBalance {
    /// A share with nothing paid yet.
    #[must_use]
    pub const fn unpaid(amount_owed: Decimal) -> Self {
        Self {
            amount_owed,
            paid_amount: Decimal::ZERO,
            is_paid: false,
        }
    }

    /// Amount still owed.
    #[must_use]
    pub fn outstanding(&self) -> Decimal {
        self.amount_owed - self.paid_amount
    }

    /// Payment progress.
    #[must_use]
    pub fn state(&self) -> ShareState {
        if self.is_paid || self.paid_amount >= self.amount_owed {
            ShareState::FullyPaid
        } else if self.paid_amount > Decimal::ZERO {
            ShareState::PartiallyPaid
        } else {
            ShareState::Unpaid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_initial_vote_status() {
        let creator = UserId::new();
        let other = UserId::new();
        assert_eq!(VoteStatus::initial_for(creator, creator), VoteStatus::Accepted);
        assert_eq!(VoteStatus::initial_for(other, creator), VoteStatus::Pending);
    }

    #[test]
    fn test_share_state_progression() {
        let mut share = ShareBalance::unpaid(dec!(20.00));
        assert_eq!(share.state(), ShareState::Unpaid);
        assert_eq!(share.outstanding(), dec!(20.00));

        share.paid_amount = dec!(5.00);
        assert_eq!(share.state(), ShareState::PartiallyPaid);
        assert_eq!(share.outstanding(), dec!(15.00));

        share.paid_amount = dec!(20.00);
        share.is_paid = true;
        assert_eq!(share.state(), ShareState::FullyPaid);
        assert_eq!(share.outstanding(), Decimal::ZERO);
    }

    #[test]
    fn test_state_ordering_is_forward() {
        assert!(ShareState::Unpaid < ShareState::PartiallyPaid);
        assert!(ShareState::PartiallyPaid < ShareState::FullyPaid);
        assert!(ExpenseStatus::Pending < ExpenseStatus::PartiallySettled);
        assert!(ExpenseStatus::PartiallySettled < ExpenseStatus::FullySettled);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ExpenseStatus::PartiallySettled).unwrap(),
            "\"PARTIALLY_SETTLED\""
        );
        assert_eq!(serde_json::to_string(&VoteStatus::Accepted).unwrap(), "\"ACCEPTED\"");
        assert_eq!(ExpenseStatus::FullySettled.to_string(), "FULLY_SETTLED");
    }

    #[test]
    fn test_manual_share_accepts_user_id_alias() {
        let user = UserId::new();
        let json = format!(r#"{{"user_id":"{user}","amount":"20.00"}}"#);
        let share: ManualShare = serde_json::from_str(&json).unwrap();
        assert_eq!(share.participant, user);
        assert_eq!(share.amount, dec!(20.00));
    }
}
