//! General Discord commands - ping, help, and other utility commands.
//! This module contains simple commands that don't require database operations
//! and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong! ☕").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Yeosang's Cafe Help**\n\
        Welcome to the cafe! Here's everything you can do.\n\n\
        **Cards**\n\
        • `/drop` - Drops a tray of random cards; first to press a button claims that card.\n\
        • `/inventory` - Shows your binder, ten lines per page.\n\
        • `/profile` - Shows your balance, streak, collection size, and featured card.\n\
        • `/set_featured <code>` - Showcases one of your cards on your profile.\n\n\
        **Economy**\n\
        • `/daily` - Claims your daily credits; consecutive days build a streak bonus.\n\
        • `/gacha` - Spends credits on one random card from the catalog.\n\
        • `/burn <code>` - Burns a card for a chance at credits (better odds on commons).\n\n\
        **Admin**\n\
        • `/add_item <code> <name> <group> <rarity> <era> [image_url]` - Adds a card to the catalog.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
