//! Inventory business logic - reads and writes against users' binders.
//!
//! A binder is a bag of copies: claiming a drop or pulling gacha appends one
//! row per copy, and burning deletes exactly one row. Copies reference the
//! catalog by code only, so display paths must tolerate codes whose catalog
//! entry has since disappeared.

use crate::{
    entities::{Item, OwnedItem, item, owned_item},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use std::collections::BTreeMap;

/// One grouped line of a binder listing.
#[derive(Debug, Clone)]
pub struct InventoryLine {
    /// The item code the copies share
    pub code: String,
    /// The catalog entry, if the code still resolves
    pub item: Option<item::Model>,
    /// How many copies the user holds
    pub copies: u64,
}

/// Appends one copy of an item to a user's binder.
///
/// This is the durable half of a granted claim: the drop engine records the
/// claim in memory first and then calls this at least once. A failure here
/// does not revoke the claim - the caller reports degraded success instead.
pub async fn append_copy(
    db: &DatabaseConnection,
    user_id: &str,
    item_code: &str,
    source: &str,
) -> Result<owned_item::Model> {
    let copy = owned_item::ActiveModel {
        user_id: Set(user_id.to_string()),
        item_code: Set(item_code.to_string()),
        obtained_at: Set(Utc::now()),
        source: Set(source.to_string()),
        ..Default::default()
    };
    let result = copy.insert(db).await?;
    Ok(result)
}

/// Counts every copy in a user's binder.
pub async fn copy_count(db: &DatabaseConnection, user_id: &str) -> Result<u64> {
    OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Whether the user holds at least one copy of the code.
pub async fn owns_copy(db: &DatabaseConnection, user_id: &str, item_code: &str) -> Result<bool> {
    let count = OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .filter(owned_item::Column::ItemCode.eq(item_code))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Lists a user's binder grouped by item code, catalog entries resolved.
///
/// Codes whose catalog entry no longer exists stay in the listing with
/// `item: None` so owned copies never silently vanish from view.
pub async fn counts_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<InventoryLine>> {
    let copies = OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let mut grouped: BTreeMap<String, u64> = BTreeMap::new();
    for copy in copies {
        *grouped.entry(copy.item_code).or_insert(0) += 1;
    }
    if grouped.is_empty() {
        return Ok(Vec::new());
    }

    let codes: Vec<String> = grouped.keys().cloned().collect();
    let items = Item::find()
        .filter(item::Column::Code.is_in(codes))
        .all(db)
        .await?;
    let mut by_code: BTreeMap<String, item::Model> =
        items.into_iter().map(|i| (i.code.clone(), i)).collect();

    Ok(grouped
        .into_iter()
        .map(|(code, copies)| InventoryLine {
            item: by_code.remove(&code),
            code,
            copies,
        })
        .collect())
}

/// Distinct item codes the user owns, for autocomplete.
pub async fn distinct_codes_for_user(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Vec<String>> {
    let copies = OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .order_by_asc(owned_item::Column::ItemCode)
        .all(db)
        .await?;

    let mut codes: Vec<String> = copies.into_iter().map(|c| c.item_code).collect();
    codes.dedup();
    Ok(codes)
}

/// Removes exactly one copy of the code from the user's binder.
///
/// The oldest copy goes first. Returns the removed row, or `None` when the
/// user holds no copy of that code.
pub async fn remove_one_copy(
    db: &DatabaseConnection,
    user_id: &str,
    item_code: &str,
) -> Result<Option<owned_item::Model>> {
    let oldest = OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .filter(owned_item::Column::ItemCode.eq(item_code))
        .order_by_asc(owned_item::Column::Id)
        .one(db)
        .await?;

    let Some(copy) = oldest else {
        return Ok(None);
    };
    OwnedItem::delete_by_id(copy.id).exec(db).await?;
    Ok(Some(copy))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_test_item, setup_test_db};

    #[tokio::test]
    async fn append_and_count() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;

        append_copy(&db, "u1", "YS-001", "drop").await?;
        append_copy(&db, "u1", "YS-001", "gacha").await?;
        append_copy(&db, "u2", "YS-001", "drop").await?;

        assert_eq!(copy_count(&db, "u1").await?, 2);
        assert_eq!(copy_count(&db, "u2").await?, 1);
        assert!(owns_copy(&db, "u1", "YS-001").await?);
        assert!(!owns_copy(&db, "u1", "YS-999").await?);

        Ok(())
    }

    #[tokio::test]
    async fn grouped_listing_resolves_catalog() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;

        append_copy(&db, "u1", "YS-001", "drop").await?;
        append_copy(&db, "u1", "YS-001", "drop").await?;
        // A copy whose catalog entry never existed stays visible
        append_copy(&db, "u1", "GHOST-01", "drop").await?;

        let lines = counts_for_user(&db, "u1").await?;
        assert_eq!(lines.len(), 2);

        let ghost = lines.iter().find(|l| l.code == "GHOST-01").unwrap();
        assert!(ghost.item.is_none());
        assert_eq!(ghost.copies, 1);

        let known = lines.iter().find(|l| l.code == "YS-001").unwrap();
        assert_eq!(known.item.as_ref().unwrap().code, "YS-001");
        assert_eq!(known.copies, 2);

        Ok(())
    }

    #[tokio::test]
    async fn remove_one_copy_takes_exactly_one() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;
        append_copy(&db, "u1", "YS-001", "drop").await?;
        append_copy(&db, "u1", "YS-001", "drop").await?;

        let removed = remove_one_copy(&db, "u1", "YS-001").await?;
        assert!(removed.is_some());
        assert_eq!(copy_count(&db, "u1").await?, 1);

        let removed = remove_one_copy(&db, "u1", "YS-001").await?;
        assert!(removed.is_some());
        assert_eq!(copy_count(&db, "u1").await?, 0);

        // Nothing left to remove
        assert!(remove_one_copy(&db, "u1", "YS-001").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn distinct_codes_deduplicate() -> Result<()> {
        let db = setup_test_db().await?;
        append_copy(&db, "u1", "YS-002", "drop").await?;
        append_copy(&db, "u1", "YS-001", "drop").await?;
        append_copy(&db, "u1", "YS-001", "gacha").await?;

        let codes = distinct_codes_for_user(&db, "u1").await?;
        assert_eq!(codes, vec!["YS-001".to_string(), "YS-002".to_string()]);

        Ok(())
    }
}
