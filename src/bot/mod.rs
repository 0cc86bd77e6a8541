//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the cafe, including all
//! slash commands, the claim-button driver, autocomplete handlers, and bot
//! context management.

/// Discord command implementations (drop, collection, economy, manage, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::config::AppConfig;
use crate::core::cooldown::CooldownTracker;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the parsed configuration,
/// and the in-memory cooldown tracker that commands need to access.
pub struct BotData {
    /// Database connection for all durable operations
    pub database: DatabaseConnection,
    /// Drop and economy tunables
    pub config: Arc<AppConfig>,
    /// Atomic per-user, per-action cooldown state
    pub cooldowns: CooldownTracker,
}

impl BotData {
    /// Creates a new `BotData` instance with a fresh cooldown tracker.
    #[must_use]
    pub fn new(database: DatabaseConnection, config: Arc<AppConfig>) -> Self {
        Self {
            database,
            config,
            cooldowns: CooldownTracker::new(),
        }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            // Nothing sensible to do without a working framework
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error:?}", ctx.command().name);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Builds the poise framework, registers the slash commands globally, and
/// runs the gateway client until it exits.
pub async fn run_bot(
    token: String,
    config: Arc<AppConfig>,
    database: DatabaseConnection,
) -> Result<()> {
    let intents = serenity::GatewayIntents::non_privileged();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::drop(),
                commands::inventory(),
                commands::profile(),
                commands::daily(),
                commands::gacha(),
                commands::burn(),
                commands::set_featured(),
                commands::add_item(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} slash commands.", framework.options().commands.len());
                Ok(BotData::new(database, config))
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .map_err(Error::from)?;
    client.start().await.map_err(Into::into)
}
