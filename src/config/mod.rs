/// Database configuration and connection management
pub mod database;

/// Drop and economy tunables plus seed catalog entries from config.toml
pub mod settings;

pub use settings::{
    AppConfig, BurnSettings, BurnTier, DropsSettings, EconomySettings, ItemSeed,
};
