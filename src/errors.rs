//! Unified error types for everything the cafe can do wrong.
//!
//! Every variant here is recovered locally and surfaced as a user-visible
//! reply scoped to the triggering interaction; none of them crashes the
//! process. Store failures during a granted claim are a special case: the
//! claim stands and the claimant gets a degraded-success warning instead of
//! a rollback (see [`crate::bot::commands::drop`]).

use thiserror::Error;

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value problem.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// The durable store rejected or failed an operation.
    #[error("Store unavailable: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or malformed.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Error bubbled up from the Discord framework.
    #[error("Serenity/Poise framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),

    /// The catalog is too small for the requested action.
    #[error("The catalog holds {have} item(s) but this action needs {need}")]
    InsufficientCatalog {
        /// How many items the catalog currently holds
        have: u64,
        /// How many items the action needed
        need: u64,
    },

    /// The action is blocked by a per-user cooldown.
    #[error("On cooldown for another {} second(s)", remaining.num_seconds().max(1))]
    OnCooldown {
        /// Time left until the action becomes eligible again
        remaining: chrono::Duration,
    },

    /// Another user already claimed the slot.
    #[error("That slot was already claimed")]
    AlreadyClaimed,

    /// The claim arrived after the session deadline or after finalization.
    #[error("This drop has expired")]
    Expired,

    /// A claim referenced a slot index the session doesn't have.
    #[error("No such slot: {index}")]
    UnknownSlot {
        /// The out-of-range slot index
        index: usize,
    },

    /// A privileged action was attempted by a regular member.
    #[error("Only the server owner or an administrator can do that")]
    NotOwner,

    /// The referenced item code resolved to nothing the user owns.
    #[error("Item '{code}' not found")]
    ItemNotFound {
        /// The item code that failed to resolve
        code: String,
    },

    /// An item with this code already exists in the catalog.
    #[error("An item with code '{code}' already exists")]
    DuplicateItem {
        /// The conflicting item code
        code: String,
    },

    /// The rarity string doesn't name a known tier.
    #[error("Unknown rarity tier: '{value}'")]
    UnknownRarity {
        /// The unparseable rarity value
        value: String,
    },

    /// The user's balance doesn't cover the price.
    #[error("Not enough credits: balance is {balance}, price is {price}")]
    InsufficientFunds {
        /// Current balance
        balance: i64,
        /// Required price
        price: i64,
    },
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Error::Framework(Box::new(value))
    }
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
