//! Shared test utilities for Yeosang's Cafe.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{catalog, economy},
    entities::{item, profile},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test catalog item with sensible defaults.
///
/// # Defaults
/// * `name`: "Card <code>"
/// * `group_name`: "ATEEZ"
/// * `rarity`: "common"
/// * `era`: "Golden Hour"
/// * `image_url`: None
pub async fn create_test_item(db: &DatabaseConnection, code: &str) -> Result<item::Model> {
    catalog::add_item(
        db,
        code,
        &format!("Card {code}"),
        "ATEEZ",
        "common",
        "Golden Hour",
        None,
    )
    .await
}

/// Creates a test item with a specific rarity tier.
pub async fn create_custom_item(
    db: &DatabaseConnection,
    code: &str,
    rarity: &str,
) -> Result<item::Model> {
    catalog::add_item(
        db,
        code,
        &format!("Card {code}"),
        "ATEEZ",
        rarity,
        "Golden Hour",
        None,
    )
    .await
}

/// Forces a user's balance to a known value, creating the profile if needed.
pub async fn set_balance(
    db: &DatabaseConnection,
    user_id: &str,
    balance: i64,
) -> Result<profile::Model> {
    let existing = economy::get_or_create_profile(db, user_id).await?;
    let mut active: profile::ActiveModel = existing.into();
    active.balance = Set(balance);
    let updated = active.update(db).await?;
    Ok(updated)
}
