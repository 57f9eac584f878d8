//! Household repository for membership lookups.
//!
//! Membership queries are free functions over any `ConnectionTrait` so the
//! expense repository can run them inside its own transaction.

use chrono::{DateTime, FixedOffset};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use serde::Serialize;
use tally_core::expense::HouseholdMembership;
use tally_shared::types::{HouseholdId, UserId};

use crate::entities::{household_members, households, users};

/// Error types for household operations.
#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    /// Household does not exist.
    #[error("Household not found")]
    NotFound(HouseholdId),

    /// Caller is not an active member of the household.
    #[error("You are not a member of this household")]
    NotAMember,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// An active member with their user details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberInfo {
    /// User ID.
    pub user_id: UserId,
    /// Email address.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Whether the member administers the household.
    pub is_admin: bool,
    /// When the member joined.
    pub joined_at: DateTime<FixedOffset>,
}

/// Household repository.
#[derive(Debug, Clone)]
pub struct HouseholdRepository {
    db: DatabaseConnection,
}

impl HouseholdRepository {
    /// Creates a new household repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a household by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Option<households::Model>, DbErr> {
        households::Entity::find_by_id(household_id.into_inner())
            .one(&self.db)
            .await
    }

    /// Returns the user's active membership, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_active_membership(
        &self,
        user_id: UserId,
    ) -> Result<Option<HouseholdMembership>, DbErr> {
        active_membership(&self.db, user_id).await
    }

    /// Returns the IDs of a household's active members in fetch order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn active_member_ids(&self, household_id: HouseholdId) -> Result<Vec<UserId>, DbErr> {
        active_member_ids(&self.db, household_id).await
    }

    /// Lists a household's active members for a caller who must belong to it.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the household does not exist
    /// - `NotAMember` if the caller is not an active member of it
    pub async fn list_active_members(
        &self,
        household_id: HouseholdId,
        caller: UserId,
    ) -> Result<Vec<MemberInfo>, HouseholdError> {
        if self.find_household(household_id).await?.is_none() {
            return Err(HouseholdError::NotFound(household_id));
        }

        let rows = active_members_query(household_id)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await?;

        if !rows.iter().any(|(member, _)| member.user_id == caller.into_inner()) {
            return Err(HouseholdError::NotAMember);
        }

        Ok(rows
            .into_iter()
            .filter_map(|(member, user)| {
                user.map(|user| MemberInfo {
                    user_id: UserId::from_uuid(member.user_id),
                    email: user.email,
                    full_name: user.full_name,
                    is_admin: member.is_admin,
                    joined_at: member.joined_at,
                })
            })
            .collect())
    }
}

/// Returns the user's active membership. The earliest joined wins if there are several.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn active_membership<C: ConnectionTrait>(
    conn: &C,
    user_id: UserId,
) -> Result<Option<HouseholdMembership>, DbErr> {
    let row = household_members::Entity::find()
        .filter(household_members::Column::UserId.eq(user_id.into_inner()))
        .filter(household_members::Column::LeftAt.is_null())
        .order_by_asc(household_members::Column::JoinedAt)
        .order_by_asc(household_members::Column::HouseholdId)
        .limit(1)
        .one(conn)
        .await?;

    Ok(row.map(|m| HouseholdMembership {
        household_id: HouseholdId::from_uuid(m.household_id),
        user_id,
    }))
}

/// Returns active member IDs ordered by `joined_at`, then `user_id`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn active_member_ids<C: ConnectionTrait>(
    conn: &C,
    household_id: HouseholdId,
) -> Result<Vec<UserId>, DbErr> {
    let rows = active_members_query(household_id).all(conn).await?;
    Ok(rows
        .into_iter()
        .map(|m| UserId::from_uuid(m.user_id))
        .collect())
}

fn active_members_query(household_id: HouseholdId) -> sea_orm::Select<household_members::Entity> {
    household_members::Entity::find()
        .filter(household_members::Column::HouseholdId.eq(household_id.into_inner()))
        .filter(household_members::Column::LeftAt.is_null())
        .order_by_asc(household_members::Column::JoinedAt)
        .order_by_asc(household_members::Column::UserId)
}
