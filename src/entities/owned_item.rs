//! Owned item entity - One physical copy of a card in a user's binder.
//!
//! Rows are append-only: claims and gacha pulls insert copies, and burning
//! deletes exactly one row. `item_code` is a non-owning reference into the
//! catalog, re-resolved whenever the copy is displayed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Inventory copy database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "owned_items")]
pub struct Model {
    /// Unique identifier for this copy
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Discord user ID of the owner
    pub user_id: String,
    /// Code of the catalog item this copy is a print of
    pub item_code: String,
    /// When the copy entered the binder
    pub obtained_at: DateTimeUtc,
    /// How the copy was obtained ("drop" or "gacha")
    pub source: String,
}

/// Copies link to the catalog by code only, deliberately without a foreign key
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
