//! Economy business logic - daily rewards, gacha pulls, and card burning.
//!
//! Each action is a single read-modify-write transaction against one user's
//! profile. None of them touches the drop engine, and the drop engine never
//! touches them; the only shared surface is the inventory table.

use crate::{
    config::EconomySettings,
    core::{catalog, catalog::Rarity, cooldown::{CooldownKind, CooldownTracker, Eligibility}, sampling},
    entities::{OwnedItem, Profile, item, owned_item, profile},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use rand::Rng;
use sea_orm::{ConnectionTrait, PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Result of a successful `/daily` claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyOutcome {
    /// Credits granted by this claim
    pub reward: i64,
    /// Streak length after this claim
    pub streak: i64,
    /// Balance after this claim
    pub balance: i64,
}

/// Result of a successful gacha pull.
#[derive(Debug, Clone)]
pub struct GachaOutcome {
    /// The card that was pulled
    pub item: item::Model,
    /// Balance after the pull
    pub balance: i64,
}

/// Result of burning a card.
#[derive(Debug, Clone)]
pub struct BurnOutcome {
    /// The card that was destroyed
    pub item: item::Model,
    /// Credits granted, or `None` when the roll failed
    pub payout: Option<i64>,
    /// Balance after the burn
    pub balance: i64,
}

async fn fetch_or_default_profile<C: ConnectionTrait>(
    conn: &C,
    user_id: &str,
) -> Result<profile::Model> {
    if let Some(existing) = Profile::find_by_id(user_id).one(conn).await? {
        return Ok(existing);
    }
    let fresh = profile::ActiveModel {
        user_id: Set(user_id.to_string()),
        balance: Set(0),
        streak: Set(0),
        last_daily: Set(None),
        featured_code: Set(None),
    };
    let created = fresh.insert(conn).await?;
    Ok(created)
}

/// Fetches a user's profile, creating an empty one on first touch.
pub async fn get_or_create_profile(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<profile::Model> {
    fetch_or_default_profile(db, user_id).await
}

/// Sets the card showcased on the user's profile.
///
/// The user must hold at least one copy of the code; the stored reference is
/// soft, so later losing the copy (or the catalog entry) just makes the
/// profile render it as "none".
pub async fn set_featured(
    db: &DatabaseConnection,
    user_id: &str,
    code: &str,
) -> Result<profile::Model> {
    let code = catalog::normalize_code(code);
    let owned = OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .filter(owned_item::Column::ItemCode.eq(code.as_str()))
        .count(db)
        .await?;
    if owned == 0 {
        return Err(Error::ItemNotFound { code });
    }

    let profile = fetch_or_default_profile(db, user_id).await?;
    let mut active: profile::ActiveModel = profile.into();
    active.featured_code = Set(Some(code));
    let updated = active.update(db).await?;
    Ok(updated)
}

/// Claims the daily reward.
///
/// Gated by the in-memory daily cooldown. The streak continues when the
/// previous claim was within the grace window and resets to 1 otherwise;
/// the reward is the base amount plus the per-streak bonus for every
/// consecutive day beyond the first.
pub async fn claim_daily(
    db: &DatabaseConnection,
    cooldowns: &CooldownTracker,
    cfg: &EconomySettings,
    user_id: &str,
    now: DateTime<Utc>,
) -> Result<DailyOutcome> {
    match cooldowns.check_and_start_at(user_id, CooldownKind::Daily, cfg.daily_cooldown(), now) {
        Eligibility::Blocked { remaining } => return Err(Error::OnCooldown { remaining }),
        Eligibility::Ready => {}
    }

    let txn = db.begin().await?;
    let profile = fetch_or_default_profile(&txn, user_id).await?;

    let streak = match profile.last_daily {
        Some(last) if now - last <= cfg.daily_streak_grace() => profile.streak + 1,
        _ => 1,
    };
    let reward = cfg.daily_reward + cfg.daily_streak_bonus * (streak - 1);
    let balance = profile.balance + reward;

    let mut active: profile::ActiveModel = profile.into();
    active.balance = Set(balance);
    active.streak = Set(streak);
    active.last_daily = Set(Some(now));
    active.update(&txn).await?;
    txn.commit().await?;

    info!(user = %user_id, reward, streak, "daily claimed");
    Ok(DailyOutcome {
        reward,
        streak,
        balance,
    })
}

/// Buys one gacha pull: debit first, then a uniform catalog draw.
///
/// The balance check and debit happen inside one transaction together with
/// the inventory append, so a failed pull never costs anything. An empty
/// catalog rejects the pull before any money moves.
pub async fn buy_gacha(
    db: &DatabaseConnection,
    cfg: &EconomySettings,
    user_id: &str,
) -> Result<GachaOutcome> {
    let items = catalog::all_items(db).await?;
    if items.is_empty() {
        return Err(Error::InsufficientCatalog { have: 0, need: 1 });
    }

    let txn = db.begin().await?;
    let profile = fetch_or_default_profile(&txn, user_id).await?;
    if profile.balance < cfg.gacha_price {
        return Err(Error::InsufficientFunds {
            balance: profile.balance,
            price: cfg.gacha_price,
        });
    }
    let balance = profile.balance - cfg.gacha_price;

    let mut active: profile::ActiveModel = profile.into();
    active.balance = Set(balance);
    active.update(&txn).await?;

    // Reward resolution happens strictly after the debit
    let drawn = {
        let mut rng = rand::rng();
        sampling::sample_one(&items, &mut rng)
    };
    let Some(item) = drawn else {
        // Not reachable: the catalog was checked non-empty above, and the
        // dropped transaction rolls the debit back anyway.
        return Err(Error::InsufficientCatalog { have: 0, need: 1 });
    };

    let copy = owned_item::ActiveModel {
        user_id: Set(user_id.to_string()),
        item_code: Set(item.code.clone()),
        obtained_at: Set(Utc::now()),
        source: Set("gacha".to_string()),
        ..Default::default()
    };
    copy.insert(&txn).await?;
    txn.commit().await?;

    info!(user = %user_id, code = %item.code, "gacha pulled");
    Ok(GachaOutcome { item, balance })
}

/// Rolls whether a burn pays out. Pulled out of [`burn_item`] so the odds
/// can be exercised with a seeded generator.
pub fn roll_burn<R: Rng + ?Sized>(chance: f64, rng: &mut R) -> bool {
    rng.random_bool(chance.clamp(0.0, 1.0))
}

/// Burns one copy of a card the user owns.
///
/// Exactly one copy is destroyed. A Bernoulli roll with the rarity tier's
/// configured chance decides whether the tier's payout is credited; a failed
/// roll destroys the card for nothing, which is the gamble.
pub async fn burn_item(
    db: &DatabaseConnection,
    cfg: &EconomySettings,
    user_id: &str,
    code: &str,
) -> Result<BurnOutcome> {
    let code = catalog::normalize_code(code);
    let Some(item) = catalog::get_item(db, &code).await? else {
        return Err(Error::ItemNotFound { code });
    };
    let rarity: Rarity = item.rarity.parse()?;
    let tier = cfg.burn.tier(rarity);

    let paid = {
        let mut rng = rand::rng();
        roll_burn(tier.chance, &mut rng)
    };

    let txn = db.begin().await?;
    let oldest = OwnedItem::find()
        .filter(owned_item::Column::UserId.eq(user_id))
        .filter(owned_item::Column::ItemCode.eq(code.as_str()))
        .order_by_asc(owned_item::Column::Id)
        .one(&txn)
        .await?;
    let Some(copy) = oldest else {
        return Err(Error::ItemNotFound { code });
    };
    OwnedItem::delete_by_id(copy.id).exec(&txn).await?;

    let profile = fetch_or_default_profile(&txn, user_id).await?;
    let payout = paid.then_some(tier.payout);
    let balance = profile.balance + payout.unwrap_or(0);
    if payout.is_some() {
        let mut active: profile::ActiveModel = profile.into();
        active.balance = Set(balance);
        active.update(&txn).await?;
    }
    txn.commit().await?;

    info!(user = %user_id, code = %item.code, payout = ?payout, "card burned");
    Ok(BurnOutcome {
        item,
        payout,
        balance,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{create_custom_item, create_test_item, set_balance, setup_test_db};
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn cfg() -> EconomySettings {
        EconomySettings::default()
    }

    #[tokio::test]
    async fn daily_first_claim_starts_streak() -> Result<()> {
        let db = setup_test_db().await?;
        let cooldowns = CooldownTracker::new();

        let outcome = claim_daily(&db, &cooldowns, &cfg(), "u1", t0()).await?;
        assert_eq!(
            outcome,
            DailyOutcome {
                reward: 100,
                streak: 1,
                balance: 100
            }
        );

        let profile = get_or_create_profile(&db, "u1").await?;
        assert_eq!(profile.balance, 100);
        assert_eq!(profile.last_daily, Some(t0()));

        Ok(())
    }

    #[tokio::test]
    async fn daily_back_to_back_is_on_cooldown() -> Result<()> {
        let db = setup_test_db().await?;
        let cooldowns = CooldownTracker::new();
        claim_daily(&db, &cooldowns, &cfg(), "u1", t0()).await?;

        let err = claim_daily(&db, &cooldowns, &cfg(), "u1", t0() + chrono::Duration::minutes(5))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::OnCooldown { .. }));

        // Blocked claim changed nothing
        let profile = get_or_create_profile(&db, "u1").await?;
        assert_eq!(profile.balance, 100);
        assert_eq!(profile.streak, 1);

        Ok(())
    }

    #[tokio::test]
    async fn daily_streak_continues_within_grace() -> Result<()> {
        let db = setup_test_db().await?;
        let cooldowns = CooldownTracker::new();
        claim_daily(&db, &cooldowns, &cfg(), "u1", t0()).await?;

        // 23 hours later: past the cooldown, within the 48h grace window
        let next = t0() + chrono::Duration::hours(23);
        let outcome = claim_daily(&db, &cooldowns, &cfg(), "u1", next).await?;
        assert_eq!(outcome.streak, 2);
        assert_eq!(outcome.reward, 110);
        assert_eq!(outcome.balance, 210);

        Ok(())
    }

    #[tokio::test]
    async fn daily_streak_resets_after_grace() -> Result<()> {
        let db = setup_test_db().await?;
        let cooldowns = CooldownTracker::new();
        claim_daily(&db, &cooldowns, &cfg(), "u1", t0()).await?;

        // Four days later the streak starts over
        let next = t0() + chrono::Duration::hours(96);
        let outcome = claim_daily(&db, &cooldowns, &cfg(), "u1", next).await?;
        assert_eq!(outcome.streak, 1);
        assert_eq!(outcome.reward, 100);

        Ok(())
    }

    #[tokio::test]
    async fn gacha_rejects_insufficient_balance_untouched() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;
        set_balance(&db, "u1", 40).await?;

        let err = buy_gacha(&db, &cfg(), "u1").await.unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientFunds {
                balance: 40,
                price: 50
            }
        ));

        // Balance unchanged, nothing pulled
        let profile = get_or_create_profile(&db, "u1").await?;
        assert_eq!(profile.balance, 40);
        assert_eq!(crate::core::inventory::copy_count(&db, "u1").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn gacha_debits_before_reward() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;
        set_balance(&db, "u1", 120).await?;

        let outcome = buy_gacha(&db, &cfg(), "u1").await?;
        assert_eq!(outcome.item.code, "YS-001");
        assert_eq!(outcome.balance, 70);

        let copies = crate::core::inventory::counts_for_user(&db, "u1").await?;
        assert_eq!(copies.len(), 1);
        assert_eq!(copies[0].copies, 1);

        Ok(())
    }

    #[tokio::test]
    async fn gacha_rejects_empty_catalog_before_debit() -> Result<()> {
        let db = setup_test_db().await?;
        set_balance(&db, "u1", 500).await?;

        let err = buy_gacha(&db, &cfg(), "u1").await.unwrap_err();
        assert!(matches!(err, Error::InsufficientCatalog { have: 0, need: 1 }));

        let profile = get_or_create_profile(&db, "u1").await?;
        assert_eq!(profile.balance, 500);

        Ok(())
    }

    #[tokio::test]
    async fn burn_with_certain_payout() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_item(&db, "YS-001", "common").await?;
        crate::core::inventory::append_copy(&db, "u1", "YS-001", "drop").await?;

        let mut certain = cfg();
        certain.burn.common.chance = 1.0;

        let outcome = burn_item(&db, &certain, "u1", "ys-001").await?;
        assert_eq!(outcome.payout, Some(10));
        assert_eq!(outcome.balance, 10);
        assert_eq!(crate::core::inventory::copy_count(&db, "u1").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn burn_with_certain_failure_still_destroys() -> Result<()> {
        let db = setup_test_db().await?;
        create_custom_item(&db, "YS-001", "legendary").await?;
        crate::core::inventory::append_copy(&db, "u1", "YS-001", "drop").await?;

        let mut hopeless = cfg();
        hopeless.burn.legendary.chance = 0.0;

        let outcome = burn_item(&db, &hopeless, "u1", "YS-001").await?;
        assert_eq!(outcome.payout, None);
        assert_eq!(outcome.balance, 0);
        // The card is gone either way
        assert_eq!(crate::core::inventory::copy_count(&db, "u1").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn burn_unowned_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;

        let err = burn_item(&db, &cfg(), "u1", "YS-001").await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { code } if code == "YS-001"));

        Ok(())
    }

    #[tokio::test]
    async fn set_featured_requires_ownership() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_item(&db, "YS-001").await?;

        let err = set_featured(&db, "u1", "YS-001").await.unwrap_err();
        assert!(matches!(err, Error::ItemNotFound { .. }));

        crate::core::inventory::append_copy(&db, "u1", "YS-001", "drop").await?;
        let profile = set_featured(&db, "u1", "ys-001").await?;
        assert_eq!(profile.featured_code.as_deref(), Some("YS-001"));

        Ok(())
    }

    #[test]
    fn burn_odds_converge_to_configured_chance() {
        // 1000 seeded rolls at 65% should land within a generous tolerance
        let mut rng = StdRng::seed_from_u64(2024);
        let trials = 1000;
        let successes = (0..trials).filter(|_| roll_burn(0.65, &mut rng)).count();

        let rate = f64::from(u32::try_from(successes).unwrap()) / f64::from(trials);
        assert!(
            (0.58..=0.72).contains(&rate),
            "burn success rate {rate} strayed from 0.65"
        );
    }
}
