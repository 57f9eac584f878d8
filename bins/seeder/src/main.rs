//! Database seeder for Tally development and testing.
//!
//! Seeds one household with three members (Alice, Bob, Cara, joined in that
//! order, Alice as admin) and prints a bearer token for each of them.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use tally_db::entities::{household_members, households, users};
use tally_shared::{JwtConfig, JwtService};

/// Seed household ID (consistent across runs)
const HOUSEHOLD_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// Seed members: (id, email, full name, admin)
const MEMBERS: [(Uuid, &str, &str, bool); 3] = [
    (
        Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0a11),
        "alice@tally.dev",
        "Alice",
        true,
    ),
    (
        Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0b0b),
        "bob@tally.dev",
        "Bob",
        false,
    ),
    (
        Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0ca4),
        "cara@tally.dev",
        "Cara",
        false,
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = tally_db::connect(&database_url)
        .await
        .context("failed to connect to database")?;

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding household...");
    seed_household(&db).await;

    println!("Seeding memberships...");
    seed_memberships(&db).await;

    println!("Bearer tokens:");
    print_tokens()?;

    println!("Seeding complete!");
    Ok(())
}

async fn seed_users(db: &DatabaseConnection) {
    for (id, email, full_name, _) in MEMBERS {
        if users::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  {full_name} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id),
            email: Set(email.to_string()),
            full_name: Set(full_name.to_string()),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {email}: {e}");
        } else {
            println!("  Created user: {email}");
        }
    }
}

async fn seed_household(db: &DatabaseConnection) {
    if households::Entity::find_by_id(HOUSEHOLD_ID)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Household already exists, skipping...");
        return;
    }

    let household = households::ActiveModel {
        id: Set(HOUSEHOLD_ID),
        name: Set("Maple Street".to_string()),
        description: Set(Some("Seeded development household".to_string())),
        created_at: Set(Utc::now().into()),
    };

    if let Err(e) = household.insert(db).await {
        eprintln!("Failed to insert household: {e}");
    } else {
        println!("  Created household: Maple Street");
    }
}

/// Join times are staggered so the even-split order is Alice, Bob, Cara.
async fn seed_memberships(db: &DatabaseConnection) {
    let now = Utc::now();
    let mut inserted = 0;

    for ((user_id, email, _, is_admin), minutes_ago) in MEMBERS.into_iter().zip([30, 20, 10]) {
        let membership = household_members::ActiveModel {
            user_id: Set(user_id),
            household_id: Set(HOUSEHOLD_ID),
            is_admin: Set(is_admin),
            joined_at: Set((now - Duration::minutes(minutes_ago)).into()),
            left_at: Set(None),
        };

        if let Err(e) = membership.insert(db).await {
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert membership for {email}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} memberships");
}

fn print_tokens() -> anyhow::Result<()> {
    let secret = std::env::var("TALLY__JWT__SECRET")
        .unwrap_or_else(|_| JwtConfig::default().secret);
    let jwt = JwtService::new(JwtConfig {
        secret,
        access_token_expires_minutes: 24 * 60,
    });

    for (user_id, _, full_name, _) in MEMBERS {
        let token = jwt
            .generate_access_token(user_id)
            .with_context(|| format!("failed to sign token for {full_name}"))?;
        println!("  {full_name}: {token}");
    }
    Ok(())
}
