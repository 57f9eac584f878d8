//! Expense routes: create-and-split, payment confirmation and lookups.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tally_core::expense::{CreateExpenseInput, ExpenseStatus, ManualShare, VoteStatus};
use tally_db::{
    entities::{expense_shares, expenses},
    repositories::{ExpenseRepository, ExpenseWithShares},
};
use tally_shared::types::{ExpenseId, format_money};
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the expense routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses))
        .route("/expenses/create-and-split", post(create_and_split))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/expenses/{expense_id}/confirm-payment", post(confirm_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating and splitting an expense.
#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    /// What the expense was for.
    pub description: String,
    /// Total amount, as a decimal string or number.
    pub amount: Decimal,
    /// Optional category.
    pub category: Option<String>,
    /// Split evenly across active members.
    pub split_evenly: bool,
    /// Whether the creator takes a share of an even split.
    pub include_creator: bool,
    /// Explicit `{user_id, amount}` allocation for manual splits.
    pub manual_shares: Option<Vec<ManualShare>>,
}

/// Request body for confirming a payment.
#[derive(Debug, Deserialize)]
pub struct ConfirmPaymentRequest {
    /// Amount paid.
    pub amount: Decimal,
}

/// Response for an expense share.
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    /// Share ID.
    pub id: Uuid,
    /// Participant.
    pub user_id: Uuid,
    /// Amount owed.
    pub amount_owed: String,
    /// Amount paid so far.
    pub paid_amount: String,
    /// Amount still outstanding.
    pub outstanding: String,
    /// Whether the share is fully paid.
    pub is_paid: bool,
    /// Participant's vote.
    pub vote_status: VoteStatus,
}

impl From<expense_shares::Model> for ShareResponse {
    fn from(share: expense_shares::Model) -> Self {
        Self {
            id: share.id,
            user_id: share.user_id,
            amount_owed: format_money(share.amount_owed),
            paid_amount: format_money(share.paid_amount),
            outstanding: format_money(share.amount_owed - share.paid_amount),
            is_paid: share.is_paid,
            vote_status: share.vote_status.into(),
        }
    }
}

/// Response for an expense with its shares.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// Expense ID.
    pub id: Uuid,
    /// Owning household.
    pub household_id: Uuid,
    /// Member who recorded the expense.
    pub creator_id: Uuid,
    /// Description.
    pub description: String,
    /// Total amount.
    pub amount: String,
    /// Category.
    pub category: Option<String>,
    /// Settlement status.
    pub status: ExpenseStatus,
    /// Created at timestamp.
    pub created_at: String,
    /// Shares in creation order.
    pub shares: Vec<ShareResponse>,
}

impl From<ExpenseWithShares> for ExpenseResponse {
    fn from(value: ExpenseWithShares) -> Self {
        let expenses::Model {
            id,
            household_id,
            creator_id,
            description,
            amount,
            category,
            status,
            created_at,
            ..
        } = value.expense;

        Self {
            id,
            household_id,
            creator_id,
            description,
            amount: format_money(amount),
            category,
            status: status.into(),
            created_at: created_at.to_rfc3339(),
            shares: value.shares.into_iter().map(ShareResponse::from).collect(),
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/expenses/create-and-split` - Create an expense and split it.
async fn create_and_split(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let repo = ExpenseRepository::new((*state.db).clone());

    let created = repo
        .create_and_split(CreateExpenseInput {
            description: payload.description,
            amount: payload.amount,
            category: payload.category,
            creator: auth.user_id(),
            split_evenly: payload.split_evenly,
            include_creator: payload.include_creator,
            manual_shares: payload.manual_shares,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "detail": "success",
            "expense_id": created.expense.id,
        })),
    ))
}

/// POST `/expenses/{expense_id}/confirm-payment` - Pay toward the caller's share.
async fn confirm_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<Json<Value>, ApiError> {
    let repo = ExpenseRepository::new((*state.db).clone());

    let receipt = repo
        .confirm_payment(ExpenseId::from_uuid(expense_id), auth.user_id(), payload.amount)
        .await?;

    Ok(Json(json!({
        "detail": "Payment recorded",
        "share": ShareResponse::from(receipt.share),
        "expense_status": receipt.expense_status,
    })))
}

/// GET `/expenses` - List the caller's household expenses, newest first.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let repo = ExpenseRepository::new((*state.db).clone());

    let expenses: Vec<ExpenseResponse> = repo
        .list_expenses(auth.user_id())
        .await?
        .into_iter()
        .map(ExpenseResponse::from)
        .collect();

    Ok(Json(json!({ "expenses": expenses })))
}

/// GET `/expenses/{expense_id}` - Get one expense with its shares.
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(expense_id): Path<Uuid>,
) -> Result<Json<ExpenseResponse>, ApiError> {
    let repo = ExpenseRepository::new((*state.db).clone());

    let expense = repo
        .get_expense(ExpenseId::from_uuid(expense_id), auth.user_id())
        .await?;

    Ok(Json(expense.into()))
}
