//! Item entity - One definable photocard in the cafe's catalog.
//!
//! Items are immutable once created: the privileged `add_item` command inserts
//! them and nothing ever mutates them afterwards. Inventory copies and featured
//! references point at items by code without a foreign key, so a card can leave
//! the catalog without breaking the rows that mention it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Catalog item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    /// Unique item code (stored uppercase, e.g. "YS-GH-001")
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    /// Human-readable card name
    pub name: String,
    /// Artist or group the card belongs to
    pub group_name: String,
    /// Rarity tier name ("common", "rare", "epic", "legendary")
    pub rarity: String,
    /// Era or comeback the card is from
    pub era: String,
    /// Optional image URL shown in embeds
    pub image_url: Option<String>,
}

/// Items reference nothing and are referenced only by soft item-code links
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
