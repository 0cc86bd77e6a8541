//! Profile entity - Per-user economy state.
//!
//! Exclusively mutated by the economy handlers (daily/gacha/burn/featured);
//! the drop engine never touches it. `featured_code` is a non-owning pointer
//! into the catalog and may dangle if the card is later removed, in which
//! case it renders as "none".

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User economy database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Discord user ID
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    /// Currency balance, never negative
    pub balance: i64,
    /// Consecutive daily-claim streak, never negative
    pub streak: i64,
    /// Timestamp of the most recent daily claim
    pub last_daily: Option<DateTimeUtc>,
    /// Code of the card showcased on the profile, if any
    pub featured_code: Option<String>,
}

/// Profiles reference the catalog only through the soft `featured_code` link
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
