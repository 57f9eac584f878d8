//! Error-to-response mapping.
//!
//! Every failure leaves the API as `{"error": <code>, "message": <detail>}`
//! with the status owned by `AppError`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tally_core::expense::ExpenseError;
use tally_db::repositories::HouseholdError;
use tally_shared::AppError;
use tracing::error;

/// An error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status.
    pub status: StatusCode,
    /// Stable machine-readable code.
    pub code: &'static str,
    /// Human-readable detail.
    pub message: String,
}

impl ApiError {
    /// Builds an error from a status, code and message.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Opaque 500 response.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            "An error occurred",
        )
    }

    fn from_app_error(err: &AppError, code: &'static str) -> Self {
        if err.is_server_error() {
            error!(code, detail = err.detail(), "Request failed");
        }
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, code, err.detail())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::from_app_error(&err, err.error_code())
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        let code = err.error_code();
        Self::from_app_error(&AppError::from(err), code)
    }
}

impl From<HouseholdError> for ApiError {
    fn from(err: HouseholdError) -> Self {
        match err {
            HouseholdError::NotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "HOUSEHOLD_NOT_FOUND", err.to_string())
            }
            HouseholdError::NotAMember => {
                Self::new(StatusCode::FORBIDDEN, "NOT_A_MEMBER", err.to_string())
            }
            HouseholdError::Database(e) => {
                error!(error = %e, "Failed to load household members");
                Self::internal()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use tally_shared::types::{ExpenseId, HouseholdId, UserId};

    #[rstest]
    #[case(ExpenseError::NotInHousehold, StatusCode::BAD_REQUEST, "NOT_IN_HOUSEHOLD")]
    #[case(ExpenseError::NoOtherMembers, StatusCode::BAD_REQUEST, "NO_OTHER_MEMBERS")]
    #[case(ExpenseError::EmptyManualShares, StatusCode::BAD_REQUEST, "EMPTY_MANUAL_SHARES")]
    #[case(ExpenseError::InvalidParticipant(UserId::new()), StatusCode::BAD_REQUEST, "INVALID_PARTICIPANT")]
    #[case(ExpenseError::NoShareForUser, StatusCode::BAD_REQUEST, "NO_SHARE_FOR_USER")]
    #[case(ExpenseError::AlreadyFullyPaid, StatusCode::BAD_REQUEST, "ALREADY_FULLY_PAID")]
    #[case(ExpenseError::ExpenseNotFound(ExpenseId::new()), StatusCode::NOT_FOUND, "EXPENSE_NOT_FOUND")]
    #[case(
        ExpenseError::PersistenceFailure("creation".into()),
        StatusCode::INTERNAL_SERVER_ERROR,
        "PERSISTENCE_FAILURE"
    )]
    fn test_expense_error_mapping(
        #[case] err: ExpenseError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let message = err.to_string();
        let api: ApiError = err.into();
        assert_eq!(api.status, status);
        assert_eq!(api.code, code);
        assert_eq!(api.message, message);
    }

    #[test]
    fn test_overpayment_message_reports_both_amounts() {
        let api: ApiError = ExpenseError::OverpaymentAttempt {
            amount: dec!(25),
            outstanding: dec!(20),
        }
        .into();
        assert_eq!(
            api.message,
            "Cannot confirm payment: Amount 25.00 exceeds outstanding balance of 20.00"
        );
    }

    #[test]
    fn test_household_error_mapping() {
        let missing: ApiError = HouseholdError::NotFound(HouseholdId::new()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let outsider: ApiError = HouseholdError::NotAMember.into();
        assert_eq!(outsider.status, StatusCode::FORBIDDEN);

        let db: ApiError = HouseholdError::Database(sea_orm::DbErr::Custom("boom".into())).into();
        assert_eq!(db, ApiError::internal());
    }

    #[test]
    fn test_server_errors_stay_opaque() {
        let api: ApiError = AppError::Database("Database error during payment".into()).into();
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code, "DATABASE_ERROR");
        assert_eq!(api.message, "Database error during payment");
    }

    #[test]
    fn test_app_error_keeps_its_code() {
        let api: ApiError = AppError::Unauthorized("Invalid or malformed token".into()).into();
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.code, "UNAUTHORIZED");
        assert_eq!(api.message, "Invalid or malformed token");
    }
}
