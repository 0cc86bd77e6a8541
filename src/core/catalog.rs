//! Catalog business logic - the definable set of cards available for drops.
//!
//! Items are created by the privileged `add_item` command (or seeded from
//! config.toml at startup) and never mutated afterwards. Codes are normalized
//! to uppercase on the way in so lookups are case-insensitive.

use crate::{
    config::ItemSeed,
    entities::{Item, item},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use std::fmt;
use std::str::FromStr;

/// The four rarity tiers a card can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rarity {
    /// The bread and butter of the binder
    Common,
    /// Seen a few times a week
    Rare,
    /// A good day at the cafe
    Epic,
    /// Screenshot-and-brag territory
    Legendary,
}

impl FromStr for Rarity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            _ => Err(Error::UnknownRarity {
                value: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        };
        write!(f, "{name}")
    }
}

/// Normalizes an item code for storage and lookup.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Adds a new item to the catalog, validating inputs.
///
/// The code is normalized to uppercase and must be unique; the rarity must
/// parse to a known tier. Items are immutable once inserted.
pub async fn add_item(
    db: &DatabaseConnection,
    code: &str,
    name: &str,
    group_name: &str,
    rarity: &str,
    era: &str,
    image_url: Option<String>,
) -> Result<item::Model> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err(Error::Config {
            message: "Item code cannot be empty".to_string(),
        });
    }
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Item name cannot be empty".to_string(),
        });
    }
    let rarity: Rarity = rarity.parse()?;

    if get_item(db, &code).await?.is_some() {
        return Err(Error::DuplicateItem { code });
    }

    let item = item::ActiveModel {
        code: Set(code),
        name: Set(name.trim().to_string()),
        group_name: Set(group_name.trim().to_string()),
        rarity: Set(rarity.to_string()),
        era: Set(era.trim().to_string()),
        image_url: Set(image_url),
    };

    let result = item.insert(db).await?;
    Ok(result)
}

/// Finds an item by code (case-insensitive), returning `None` if absent.
pub async fn get_item(db: &DatabaseConnection, code: &str) -> Result<Option<item::Model>> {
    Item::find_by_id(normalize_code(code))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the whole catalog ordered by code.
pub async fn all_items(db: &DatabaseConnection) -> Result<Vec<item::Model>> {
    Item::find()
        .order_by_asc(item::Column::Code)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts the catalog without loading it.
pub async fn count_items(db: &DatabaseConnection) -> Result<u64> {
    Item::find().count(db).await.map_err(Into::into)
}

/// Inserts seed entries that aren't in the catalog yet.
///
/// Existing codes are skipped, so running the seed on every boot is safe.
/// Returns how many items were actually inserted.
pub async fn seed_catalog(db: &DatabaseConnection, seeds: &[ItemSeed]) -> Result<usize> {
    let mut inserted = 0;
    for seed in seeds {
        match add_item(
            db,
            &seed.code,
            &seed.name,
            &seed.group_name,
            &seed.rarity,
            &seed.era,
            seed.image_url.clone(),
        )
        .await
        {
            Ok(_) => inserted += 1,
            Err(Error::DuplicateItem { .. }) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn add_and_fetch_roundtrip() -> Result<()> {
        let db = setup_test_db().await?;

        let added = add_item(
            &db,
            "ys-gh-001",
            "Yeosang - Golden Hour",
            "ATEEZ",
            "rare",
            "Golden Hour",
            None,
        )
        .await?;
        // Codes are stored uppercase, rarities lowercase
        assert_eq!(added.code, "YS-GH-001");
        assert_eq!(added.rarity, "rare");

        // Lookups are case-insensitive
        let fetched = get_item(&db, "ys-gh-001").await?.unwrap();
        assert_eq!(fetched, added);

        Ok(())
    }

    #[tokio::test]
    async fn rejects_duplicate_code() -> Result<()> {
        let db = setup_test_db().await?;
        add_item(&db, "YS-001", "Card", "ATEEZ", "common", "Era", None).await?;

        let err = add_item(&db, "ys-001", "Other", "ATEEZ", "rare", "Era", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateItem { code } if code == "YS-001"));

        Ok(())
    }

    #[tokio::test]
    async fn rejects_unknown_rarity() -> Result<()> {
        let db = setup_test_db().await?;

        let err = add_item(&db, "YS-001", "Card", "ATEEZ", "mythic", "Era", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownRarity { value } if value == "mythic"));
        assert_eq!(count_items(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn rejects_empty_code_and_name() -> Result<()> {
        let db = setup_test_db().await?;

        assert!(matches!(
            add_item(&db, "  ", "Card", "ATEEZ", "common", "Era", None).await,
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            add_item(&db, "YS-001", "", "ATEEZ", "common", "Era", None).await,
            Err(Error::Config { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn seeding_is_idempotent() -> Result<()> {
        let db = setup_test_db().await?;
        let seeds = vec![
            ItemSeed {
                code: "YS-001".to_string(),
                name: "Card One".to_string(),
                group_name: "ATEEZ".to_string(),
                rarity: "common".to_string(),
                era: "Era".to_string(),
                image_url: None,
            },
            ItemSeed {
                code: "YS-002".to_string(),
                name: "Card Two".to_string(),
                group_name: "ATEEZ".to_string(),
                rarity: "epic".to_string(),
                era: "Era".to_string(),
                image_url: None,
            },
        ];

        assert_eq!(seed_catalog(&db, &seeds).await?, 2);
        // Second run inserts nothing
        assert_eq!(seed_catalog(&db, &seeds).await?, 0);
        assert_eq!(count_items(&db).await?, 2);

        Ok(())
    }

    #[test]
    fn rarity_parsing_is_case_insensitive() {
        assert_eq!(" Rare ".parse::<Rarity>().unwrap(), Rarity::Rare);
        assert_eq!("LEGENDARY".parse::<Rarity>().unwrap(), Rarity::Legendary);
        assert!(matches!(
            "mythic".parse::<Rarity>(),
            Err(Error::UnknownRarity { .. })
        ));
    }
}
