//! Drop and economy tunables loaded from config.toml.
//!
//! Every knob has a baked-in default so the bot runs without a config file.
//! The same file also carries `[[items]]` seed entries that are inserted into
//! the catalog at startup when missing, mirroring how the database is
//! bootstrapped on a fresh install.

use crate::core::catalog::Rarity;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::info;

/// Top-level application configuration parsed from config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Drop session tunables
    pub drops: DropsSettings,
    /// Currency economy tunables
    pub economy: EconomySettings,
    /// Catalog entries seeded into the database at startup if missing
    pub items: Vec<ItemSeed>,
}

/// Tunables for the timed drop sessions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DropsSettings {
    /// Number of slots per drop. Discord caps an action row at five buttons,
    /// so this must stay in 1..=5.
    pub slots: usize,
    /// Claim window in seconds, measured from session creation
    pub window_secs: u64,
    /// Per-user cooldown between drops, independent of the claim window
    pub cooldown_secs: u64,
}

impl Default for DropsSettings {
    fn default() -> Self {
        Self {
            slots: 3,
            window_secs: 15,
            cooldown_secs: 60,
        }
    }
}

impl DropsSettings {
    /// The claim window as a [`chrono::Duration`].
    #[must_use]
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.window_secs).unwrap_or(i64::MAX))
    }

    /// The per-user drop cooldown as a [`chrono::Duration`].
    #[must_use]
    pub fn cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.cooldown_secs).unwrap_or(i64::MAX))
    }
}

/// Tunables for daily rewards, gacha pulls, and burning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomySettings {
    /// Base credits granted by `/daily`
    pub daily_reward: i64,
    /// Extra credits per consecutive day beyond the first
    pub daily_streak_bonus: i64,
    /// Seconds before `/daily` becomes eligible again
    pub daily_cooldown_secs: u64,
    /// Seconds since the previous claim within which the streak continues
    pub daily_streak_grace_secs: u64,
    /// Price of one gacha pull
    pub gacha_price: i64,
    /// Burn payout odds and amounts per rarity tier
    pub burn: BurnSettings,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            daily_reward: 100,
            daily_streak_bonus: 10,
            // 22 hours, so a claim around the same time every day never misses
            daily_cooldown_secs: 22 * 60 * 60,
            daily_streak_grace_secs: 48 * 60 * 60,
            gacha_price: 50,
            burn: BurnSettings::default(),
        }
    }
}

impl EconomySettings {
    /// The daily-claim cooldown as a [`chrono::Duration`].
    #[must_use]
    pub fn daily_cooldown(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.daily_cooldown_secs).unwrap_or(i64::MAX))
    }

    /// The streak continuation grace window as a [`chrono::Duration`].
    #[must_use]
    pub fn daily_streak_grace(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.daily_streak_grace_secs).unwrap_or(i64::MAX))
    }
}

/// Burn odds table keyed by rarity tier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BurnSettings {
    /// Odds and payout for common cards
    pub common: BurnTier,
    /// Odds and payout for rare cards
    pub rare: BurnTier,
    /// Odds and payout for epic cards
    pub epic: BurnTier,
    /// Odds and payout for legendary cards
    pub legendary: BurnTier,
}

impl Default for BurnSettings {
    fn default() -> Self {
        Self {
            common: BurnTier {
                chance: 0.65,
                payout: 10,
            },
            rare: BurnTier {
                chance: 0.50,
                payout: 25,
            },
            epic: BurnTier {
                chance: 0.35,
                payout: 60,
            },
            legendary: BurnTier {
                chance: 0.20,
                payout: 150,
            },
        }
    }
}

impl BurnSettings {
    /// Returns the configured odds and payout for a rarity tier.
    #[must_use]
    pub const fn tier(&self, rarity: Rarity) -> &BurnTier {
        match rarity {
            Rarity::Common => &self.common,
            Rarity::Rare => &self.rare,
            Rarity::Epic => &self.epic,
            Rarity::Legendary => &self.legendary,
        }
    }
}

/// One rarity tier's burn odds.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BurnTier {
    /// Probability in [0, 1] that burning pays out
    pub chance: f64,
    /// Credits granted when the roll succeeds
    pub payout: i64,
}

/// One catalog entry seeded from config.toml.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemSeed {
    /// Unique item code
    pub code: String,
    /// Card name
    pub name: String,
    /// Artist or group
    #[serde(rename = "group")]
    pub group_name: String,
    /// Rarity tier name
    pub rarity: String,
    /// Era or comeback
    pub era: String,
    /// Optional image URL
    #[serde(default)]
    pub image_url: Option<String>,
}

impl AppConfig {
    /// Checks the invariants the rest of the crate assumes.
    fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.drops.slots) {
            return Err(Error::Config {
                message: format!(
                    "drops.slots must be between 1 and 5 (one Discord button row), got {}",
                    self.drops.slots
                ),
            });
        }
        if self.drops.window_secs == 0 {
            return Err(Error::Config {
                message: "drops.window_secs must be at least 1".to_string(),
            });
        }
        if self.economy.gacha_price <= 0 {
            return Err(Error::Config {
                message: format!(
                    "economy.gacha_price must be positive, got {}",
                    self.economy.gacha_price
                ),
            });
        }
        for (tier, cfg) in [
            ("common", &self.economy.burn.common),
            ("rare", &self.economy.burn.rare),
            ("epic", &self.economy.burn.epic),
            ("legendary", &self.economy.burn.legendary),
        ] {
            if !(0.0..=1.0).contains(&cfg.chance) {
                return Err(Error::Config {
                    message: format!(
                        "economy.burn.{tier}.chance must be in [0, 1], got {}",
                        cfg.chance
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Parses configuration from a TOML string and validates it.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads configuration from the default location (./config.toml), falling
/// back to built-in defaults when the file doesn't exist.
pub fn load_default_config() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    if path.exists() {
        load_config(path)
    } else {
        info!("No config.toml found; using built-in defaults.");
        Ok(AppConfig::default())
    }
}
