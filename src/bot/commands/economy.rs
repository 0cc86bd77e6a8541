//! Economy Discord commands - `daily`, `gacha`, and `burn`.
//!
//! Thin wrappers over [`crate::core::economy`]: translate the interaction
//! into a core call, then format the structured outcome (or the expected
//! failure) back into a reply.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::economy,
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::{CreateReply, serenity_prelude as serenity};
    use serenity::{CreateEmbed, CreateEmbedFooter};

    /// Claims your daily credits; consecutive days build a streak bonus.
    #[poise::command(slash_command)]
    pub async fn daily(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        match economy::claim_daily(
            &data.database,
            &data.cooldowns,
            &data.config.economy,
            &user_id,
            Utc::now(),
        )
        .await
        {
            Ok(outcome) => {
                ctx.say(format!(
                    "☀️ Daily claimed! **+{} 🪙** (streak {} — balance {} 🪙)",
                    outcome.reward, outcome.streak, outcome.balance
                ))
                .await?;
            }
            Err(Error::OnCooldown { remaining }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!(
                            "⏳ Already claimed — come back in {}.",
                            crate::bot::commands::format_remaining(remaining)
                        ))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Spends credits on one random card from the catalog.
    #[poise::command(slash_command)]
    pub async fn gacha(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        match economy::buy_gacha(&data.database, &data.config.economy, &user_id).await {
            Ok(outcome) => {
                let mut embed = CreateEmbed::new()
                    .title("🎰 Gacha!")
                    .description(format!(
                        "You pulled **{}** (`{}`) · {} · {} · {}",
                        outcome.item.name,
                        outcome.item.code,
                        outcome.item.group_name,
                        outcome.item.era,
                        outcome.item.rarity
                    ))
                    .footer(CreateEmbedFooter::new(format!(
                        "Balance: {} 🪙",
                        outcome.balance
                    )));
                if let Some(url) = outcome.item.image_url.as_deref() {
                    embed = embed.thumbnail(url);
                }
                ctx.send(CreateReply::default().embed(embed)).await?;
            }
            Err(Error::InsufficientFunds { balance, price }) => {
                ctx.say(format!(
                    "💸 A pull costs {price} 🪙 and you have {balance} 🪙. `/daily` helps!"
                ))
                .await?;
            }
            Err(Error::InsufficientCatalog { .. }) => {
                ctx.say("📦 The catalog is empty — nothing to pull yet.").await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Burns one of your cards for a chance at credits.
    #[poise::command(slash_command)]
    pub async fn burn(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Code of the card to burn"]
        #[autocomplete = "autocomplete::autocomplete_owned_code"]
        code: String,
    ) -> Result<()> {
        ctx.defer().await?;
        let data = ctx.data();
        let user_id = ctx.author().id.to_string();

        match economy::burn_item(&data.database, &data.config.economy, &user_id, &code).await {
            Ok(outcome) => match outcome.payout {
                Some(payout) => {
                    ctx.say(format!(
                        "🔥 Burned **{}** — the cafe pays out **{payout} 🪙**! (balance {} 🪙)",
                        outcome.item.name, outcome.balance
                    ))
                    .await?;
                }
                None => {
                    ctx.say(format!(
                        "🔥 Burned **{}**... just ashes this time. (balance {} 🪙)",
                        outcome.item.name, outcome.balance
                    ))
                    .await?;
                }
            },
            Err(Error::ItemNotFound { code }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!(
                            "❌ You don't own a card with code `{code}`. Check `/inventory`."
                        ))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
