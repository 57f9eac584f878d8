//! Expense repository for splitting and settlement.
//!
//! Every mutation runs in a single database transaction: read, validate,
//! mutate, commit. Any error drops the transaction, which rolls it back.

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tally_core::expense::{
    CreateExpenseInput, ExpenseError, ExpenseStatus, SettlementTracker, ShareBalance, SplitPlan,
    Splitter, require_membership, require_visible_expense, validate_payment_amount,
};
use tally_shared::types::{ExpenseId, ExpenseShareId, HouseholdId, UserId};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::household::{active_member_ids, active_membership};
use crate::entities::{expense_shares, expenses};

const CREATION: &str = "creation";
const PAYMENT: &str = "payment";
const LOOKUP: &str = "lookup";

/// An expense with its shares in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseWithShares {
    /// Expense header.
    pub expense: expenses::Model,
    /// Shares.
    pub shares: Vec<expense_shares::Model>,
}

/// Result of a recorded payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReceipt {
    /// The share after the payment.
    pub share: expense_shares::Model,
    /// The recomputed expense status.
    pub expense_status: ExpenseStatus,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an expense and its shares atomically.
    ///
    /// The creator's membership and the household's active members are read
    /// inside the same transaction the rows are written in.
    ///
    /// # Errors
    ///
    /// Returns the validation `ExpenseError` from the splitter, or
    /// `PersistenceFailure` if the database fails. Nothing is written in
    /// either case.
    pub async fn create_and_split(
        &self,
        input: CreateExpenseInput,
    ) -> Result<ExpenseWithShares, ExpenseError> {
        let txn = self.db.begin().await.map_err(db_failure(CREATION))?;

        let created = match Self::create_in(&txn, &input).await {
            Ok(created) => created,
            Err(err) => {
                log_rejection(&err, input.creator, "Expense creation rejected");
                return Err(err);
            }
        };

        txn.commit().await.map_err(db_failure(CREATION))?;

        info!(
            expense_id = %created.expense.id,
            household_id = %created.expense.household_id,
            user_id = %input.creator,
            amount = %created.expense.amount,
            shares = created.shares.len(),
            "Expense created"
        );

        Ok(created)
    }

    async fn create_in(
        txn: &DatabaseTransaction,
        input: &CreateExpenseInput,
    ) -> Result<ExpenseWithShares, ExpenseError> {
        let membership = active_membership(txn, input.creator)
            .await
            .map_err(db_failure(CREATION))?;

        let members = match membership {
            Some(m) => active_member_ids(txn, m.household_id)
                .await
                .map_err(db_failure(CREATION))?,
            None => Vec::new(),
        };

        let plan = Splitter::plan(input, membership, &members)?;
        Self::insert_plan(txn, plan)
            .await
            .map_err(db_failure(CREATION))
    }

    /// Writes the expense header and its shares.
    async fn insert_plan(
        txn: &DatabaseTransaction,
        plan: SplitPlan,
    ) -> Result<ExpenseWithShares, DbErr> {
        let now = Utc::now().into();
        let expense_id = ExpenseId::new().into_inner();

        let expense = expenses::ActiveModel {
            id: Set(expense_id),
            household_id: Set(plan.household_id.into_inner()),
            creator_id: Set(plan.creator.into_inner()),
            description: Set(plan.description),
            amount: Set(plan.amount),
            category: Set(plan.category),
            status: Set(plan.status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(txn)
        .await?;

        let mut shares = Vec::with_capacity(plan.shares.len());
        for planned in plan.shares {
            let balance = planned.initial_balance();
            let share = expense_shares::ActiveModel {
                id: Set(ExpenseShareId::new().into_inner()),
                expense_id: Set(expense_id),
                user_id: Set(planned.participant.into_inner()),
                amount_owed: Set(balance.amount_owed),
                paid_amount: Set(balance.paid_amount),
                is_paid: Set(balance.is_paid),
                vote_status: Set(planned.vote_status.into()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(txn)
            .await?;
            shares.push(share);
        }

        Ok(ExpenseWithShares { expense, shares })
    }

    /// Records a payment from `payer` against their share of an expense.
    ///
    /// The payer's share row is locked for the read-modify-write. The expense
    /// row is then locked while its status is recomputed from all shares, so
    /// concurrent payments on different shares never leave a stale status.
    ///
    /// # Errors
    ///
    /// Returns, in check order: `InvalidAmount`, `NotInHousehold`,
    /// `ExpenseNotFound`, `NoShareForUser`, `AlreadyFullyPaid`,
    /// `OverpaymentAttempt`; or `PersistenceFailure` if the database fails.
    pub async fn confirm_payment(
        &self,
        expense_id: ExpenseId,
        payer: UserId,
        amount: Decimal,
    ) -> Result<PaymentReceipt, ExpenseError> {
        if let Err(err) = validate_payment_amount(amount) {
            log_rejection(&err, payer, "Payment rejected");
            return Err(err);
        }

        let txn = self.db.begin().await.map_err(db_failure(PAYMENT))?;

        let receipt = match Self::confirm_in(&txn, expense_id, payer, amount).await {
            Ok(receipt) => receipt,
            Err(err) => {
                log_rejection(&err, payer, "Payment rejected");
                return Err(err);
            }
        };

        txn.commit().await.map_err(db_failure(PAYMENT))?;

        info!(
            %expense_id,
            user_id = %payer,
            %amount,
            paid_amount = %receipt.share.paid_amount,
            is_paid = receipt.share.is_paid,
            status = %receipt.expense_status,
            "Payment recorded"
        );

        Ok(receipt)
    }

    async fn confirm_in(
        txn: &DatabaseTransaction,
        expense_id: ExpenseId,
        payer: UserId,
        amount: Decimal,
    ) -> Result<PaymentReceipt, ExpenseError> {
        let membership = require_membership(
            active_membership(txn, payer)
                .await
                .map_err(db_failure(PAYMENT))?,
        )?;

        let expense_household = expenses::Entity::find_by_id(expense_id.into_inner())
            .one(txn)
            .await
            .map_err(db_failure(PAYMENT))?
            .map(|e| HouseholdId::from_uuid(e.household_id));
        require_visible_expense(expense_id, expense_household, membership.household_id)?;

        let share = expense_shares::Entity::find()
            .filter(expense_shares::Column::ExpenseId.eq(expense_id.into_inner()))
            .filter(expense_shares::Column::UserId.eq(payer.into_inner()))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(db_failure(PAYMENT))?
            .ok_or(ExpenseError::NoShareForUser)?;

        let balance = SettlementTracker::apply_payment(
            &ShareBalance {
                amount_owed: share.amount_owed,
                paid_amount: share.paid_amount,
                is_paid: share.is_paid,
            },
            amount,
        )?;

        Self::record_payment(txn, share, balance, expense_id)
            .await
            .map_err(db_failure(PAYMENT))
    }

    /// Persists the new share balance and the recomputed expense status.
    async fn record_payment(
        txn: &DatabaseTransaction,
        share: expense_shares::Model,
        balance: ShareBalance,
        expense_id: ExpenseId,
    ) -> Result<PaymentReceipt, DbErr> {
        let now = Utc::now().into();

        let mut share: expense_shares::ActiveModel = share.into();
        share.paid_amount = Set(balance.paid_amount);
        share.is_paid = Set(balance.is_paid);
        share.updated_at = Set(now);
        let share = share.update(txn).await?;

        let expense = expenses::Entity::find_by_id(expense_id.into_inner())
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("expense {expense_id}")))?;

        let paid_flags = expense_shares::Entity::find()
            .filter(expense_shares::Column::ExpenseId.eq(expense_id.into_inner()))
            .all(txn)
            .await?
            .into_iter()
            .map(|s| s.is_paid);
        let expense_status = SettlementTracker::derive_status(paid_flags);

        let mut expense: expenses::ActiveModel = expense.into();
        expense.status = Set(expense_status.into());
        expense.updated_at = Set(now);
        expense.update(txn).await?;

        Ok(PaymentReceipt {
            share,
            expense_status,
        })
    }

    /// Gets one expense of the caller's household with its shares.
    ///
    /// # Errors
    ///
    /// `NotInHousehold`, `ExpenseNotFound` (also for another household's
    /// expense), or `PersistenceFailure`.
    pub async fn get_expense(
        &self,
        expense_id: ExpenseId,
        caller: UserId,
    ) -> Result<ExpenseWithShares, ExpenseError> {
        let membership = require_membership(
            active_membership(&self.db, caller)
                .await
                .map_err(db_failure(LOOKUP))?,
        )?;

        let expense = expenses::Entity::find_by_id(expense_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_failure(LOOKUP))?;
        require_visible_expense(
            expense_id,
            expense.as_ref().map(|e| HouseholdId::from_uuid(e.household_id)),
            membership.household_id,
        )?;
        let expense = expense.ok_or(ExpenseError::ExpenseNotFound(expense_id))?;

        let shares = self
            .shares_for(&[expense.id])
            .await
            .map_err(db_failure(LOOKUP))?;

        Ok(ExpenseWithShares { expense, shares })
    }

    /// Lists the caller's household expenses, newest first, with their shares.
    ///
    /// # Errors
    ///
    /// `NotInHousehold` or `PersistenceFailure`.
    pub async fn list_expenses(&self, caller: UserId) -> Result<Vec<ExpenseWithShares>, ExpenseError> {
        let membership = require_membership(
            active_membership(&self.db, caller)
                .await
                .map_err(db_failure(LOOKUP))?,
        )?;

        let expenses = expenses::Entity::find()
            .filter(expenses::Column::HouseholdId.eq(membership.household_id.into_inner()))
            .order_by_desc(expenses::Column::CreatedAt)
            .order_by_desc(expenses::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_failure(LOOKUP))?;

        let ids: Vec<Uuid> = expenses.iter().map(|e| e.id).collect();
        let mut by_expense: HashMap<Uuid, Vec<expense_shares::Model>> = HashMap::new();
        for share in self.shares_for(&ids).await.map_err(db_failure(LOOKUP))? {
            by_expense.entry(share.expense_id).or_default().push(share);
        }

        Ok(expenses
            .into_iter()
            .map(|expense| ExpenseWithShares {
                shares: by_expense.remove(&expense.id).unwrap_or_default(),
                expense,
            })
            .collect())
    }

    /// Fetches the shares of the given expenses in creation order.
    async fn shares_for(&self, expense_ids: &[Uuid]) -> Result<Vec<expense_shares::Model>, DbErr> {
        if expense_ids.is_empty() {
            return Ok(Vec::new());
        }
        expense_shares::Entity::find()
            .filter(expense_shares::Column::ExpenseId.is_in(expense_ids.iter().copied()))
            .order_by_asc(expense_shares::Column::CreatedAt)
            .order_by_asc(expense_shares::Column::Id)
            .all(&self.db)
            .await
    }
}

/// Maps a database error to an opaque persistence failure, logging the detail.
fn db_failure(operation: &'static str) -> impl Fn(DbErr) -> ExpenseError {
    move |err| {
        error!(error = %err, operation, "Database error");
        ExpenseError::PersistenceFailure(operation.to_string())
    }
}

fn log_rejection(err: &ExpenseError, user_id: UserId, message: &str) {
    if err.is_validation() {
        warn!(code = err.error_code(), %user_id, reason = %err, "{message}");
    }
}
