//! Database configuration module for Yeosang's Cafe.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! It provides functions for establishing database connections and creating all necessary
//! tables based on the entity definitions. The module uses `SeaORM`'s
//! `Schema::create_table_from_entity` method to automatically generate SQL statements
//! from the entity models, so the database schema always matches the Rust struct
//! definitions without manual SQL.

use crate::entities::{Item, OwnedItem, Profile};
use crate::errors::Result;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
///
/// This function looks for `DATABASE_URL` in the environment and falls back to
/// a default local `SQLite` file if not found.
pub fn get_database_url() -> Result<String> {
    Ok(std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/yeosang_cafe.sqlite?mode=rwc".to_string()))
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL` environment variable.
///
/// Falls back to a default local `SQLite` file if no environment variable is set.
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url()?;
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Creates tables for catalog items, owned copies, and user profiles. Safe to call
/// against a database where the tables already exist only on first boot; callers that
/// reconnect should rely on `SQLite` keeping the prior schema.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let item_table = schema.create_table_from_entity(Item);
    let owned_item_table = schema.create_table_from_entity(OwnedItem);
    let profile_table = schema.create_table_from_entity(Profile);

    db.execute(builder.build(&item_table)).await?;
    db.execute(builder.build(&owned_item_table)).await?;
    db.execute(builder.build(&profile_table)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ItemModel, OwnedItemModel, ProfileModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Tables exist if querying them succeeds
        let _: Vec<ItemModel> = Item::find().limit(1).all(&db).await?;
        let _: Vec<OwnedItemModel> = OwnedItem::find().limit(1).all(&db).await?;
        let _: Vec<ProfileModel> = Profile::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_default_database_url() -> Result<()> {
        // With no DATABASE_URL set the helper must hand back the local file path
        let url = get_database_url()?;
        assert!(url.starts_with("sqlite://"));
        Ok(())
    }
}
