//! Initial database migration.
//!
//! Creates the household, membership, expense and expense share tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & HOUSEHOLDS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(HOUSEHOLDS_SQL).await?;
        db.execute_unprepared(HOUSEHOLD_MEMBERS_SQL).await?;

        // ============================================================
        // PART 3: EXPENSES
        // ============================================================
        db.execute_unprepared(EXPENSES_SQL).await?;
        db.execute_unprepared(EXPENSE_SHARES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Expense settlement status, derived from the shares
CREATE TYPE expense_status AS ENUM (
    'pending',
    'partially_settled',
    'fully_settled'
);

-- Participant acceptance of a share
CREATE TYPE vote_status AS ENUM ('pending', 'accepted', 'rejected');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    full_name VARCHAR(255) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const HOUSEHOLDS_SQL: &str = r"
CREATE TABLE households (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const HOUSEHOLD_MEMBERS_SQL: &str = r"
CREATE TABLE household_members (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    is_admin BOOLEAN NOT NULL DEFAULT false,
    joined_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    left_at TIMESTAMPTZ,
    PRIMARY KEY (user_id, household_id),
    CONSTRAINT chk_left_after_joined CHECK (left_at IS NULL OR left_at >= joined_at)
);

-- Active members of a household in fetch order
CREATE INDEX idx_household_members_active
    ON household_members(household_id, joined_at, user_id) WHERE left_at IS NULL;

-- Active membership lookup for a user
CREATE INDEX idx_household_members_user
    ON household_members(user_id, joined_at) WHERE left_at IS NULL;
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    household_id UUID NOT NULL REFERENCES households(id) ON DELETE CASCADE,
    creator_id UUID NOT NULL REFERENCES users(id),
    description VARCHAR(500) NOT NULL,
    amount NUMERIC(12, 2) NOT NULL,
    category VARCHAR(100),
    status expense_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_expense_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_expense_description CHECK (length(trim(description)) > 0)
);

CREATE INDEX idx_expenses_household ON expenses(household_id, created_at DESC);
";

const EXPENSE_SHARES_SQL: &str = r"
CREATE TABLE expense_shares (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    expense_id UUID NOT NULL REFERENCES expenses(id) ON DELETE CASCADE,
    user_id UUID NOT NULL REFERENCES users(id),
    amount_owed NUMERIC(12, 2) NOT NULL,
    paid_amount NUMERIC(12, 2) NOT NULL DEFAULT 0,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    vote_status vote_status NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_expense_share_user UNIQUE (expense_id, user_id),
    CONSTRAINT chk_share_owed_positive CHECK (amount_owed > 0),
    CONSTRAINT chk_share_paid_range CHECK (paid_amount >= 0 AND paid_amount <= amount_owed),
    CONSTRAINT chk_share_paid_flag CHECK (is_paid = (paid_amount >= amount_owed))
);

CREATE INDEX idx_expense_shares_user ON expense_shares(user_id);
";

const DROP_ALL_SQL: &str = r"
-- ============================================================
-- DROP ALL: Rollback migration
-- Order matters due to foreign key constraints
-- ============================================================
DROP TABLE IF EXISTS expense_shares CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS household_members CASCADE;
DROP TABLE IF EXISTS households CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS vote_status;
DROP TYPE IF EXISTS expense_status;
";
