//! Catalog management Discord commands - privileged `add_item`.
//!
//! Catalog edits are restricted to the server owner or members carrying the
//! Administrator permission; everyone else is turned away before any input
//! validation runs.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::catalog,
        errors::{Error, Result},
    };
    use poise::CreateReply;

    /// Only the guild owner or an administrator may manage the catalog.
    async fn ensure_catalog_manager(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let owner_id = ctx.guild().map(|guild| guild.owner_id);
        if owner_id == Some(ctx.author().id) {
            return Ok(());
        }
        if let Some(member) = ctx.author_member().await {
            // Interaction members carry their resolved permissions
            if member.permissions.is_some_and(|p| p.administrator()) {
                return Ok(());
            }
        }
        Err(Error::NotOwner)
    }

    /// Adds a new card to the catalog (owner/admin only).
    #[poise::command(slash_command, guild_only)]
    pub async fn add_item(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique card code (e.g. YS-GH-001)"] code: String,
        #[description = "Card name"] name: String,
        #[description = "Artist or group"] group: String,
        #[description = "Rarity tier: common, rare, epic, or legendary"] rarity: String,
        #[description = "Era or comeback the card is from"] era: String,
        #[description = "Optional image URL"] image_url: Option<String>,
    ) -> Result<()> {
        if let Err(Error::NotOwner) = ensure_catalog_manager(ctx).await {
            ctx.send(
                CreateReply::default()
                    .content("🔒 Only the server owner or an administrator can add cards.")
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        match catalog::add_item(
            &ctx.data().database,
            &code,
            &name,
            &group,
            &rarity,
            &era,
            image_url,
        )
        .await
        {
            Ok(item) => {
                ctx.say(format!(
                    "📇 Added **{}** (`{}`) — {} · {} · {}.",
                    item.name, item.code, item.group_name, item.era, item.rarity
                ))
                .await?;
            }
            Err(Error::DuplicateItem { code }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!("❌ A card with code `{code}` already exists."))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(Error::UnknownRarity { value }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!(
                            "❌ `{value}` isn't a rarity tier. Use common, rare, epic, or legendary."
                        ))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(Error::Config { message }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!("❌ {message}."))
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
