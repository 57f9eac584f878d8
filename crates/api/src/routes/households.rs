//! Household routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::{Value, json};
use tally_db::HouseholdRepository;
use tally_shared::types::HouseholdId;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::AuthUser};

/// Creates the household routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/households/{household_id}/members", get(list_members))
}

/// GET `/households/{household_id}/members` - List active members.
///
/// Only active members of the household may list it.
async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(household_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let repo = HouseholdRepository::new((*state.db).clone());

    let members = repo
        .list_active_members(HouseholdId::from_uuid(household_id), auth.user_id())
        .await?;

    Ok(Json(json!({ "members": members })))
}
