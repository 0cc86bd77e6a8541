//! Collection Discord commands - inventory listing, profile, featured card.
//!
//! The inventory is paginated with page-flip buttons scoped to the invoking
//! user; anyone else pressing them gets an ephemeral rejection instead of a
//! silent failure.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{catalog, economy, inventory},
        errors::{Error, Result},
    };
    use poise::{CreateReply, serenity_prelude as serenity};
    use serenity::{
        ButtonStyle, ComponentInteractionCollector, CreateActionRow, CreateButton, CreateEmbed,
        CreateEmbedFooter, CreateInteractionResponse, CreateInteractionResponseMessage,
    };

    const PAGE_SIZE: usize = 10;
    const PAGER_IDLE_SECS: u64 = 120;

    /// Shows your card binder, ten lines per page.
    #[poise::command(slash_command)]
    pub async fn inventory(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer().await?;
        let user_id = ctx.author().id.to_string();
        let lines = inventory::counts_for_user(&ctx.data().database, &user_id).await?;

        if lines.is_empty() {
            ctx.say("🗃️ Your binder is empty — catch a `/drop` or try your luck with `/gacha`!")
                .await?;
            return Ok(());
        }

        let pages: Vec<String> = lines.chunks(PAGE_SIZE).map(render_page).collect();
        let mut page = 0;

        let prev_id = format!("inv:{}:prev", ctx.id());
        let next_id = format!("inv:{}:next", ctx.id());

        let handle = ctx
            .send(
                CreateReply::default()
                    .embed(inventory_embed(&ctx.author().name, &pages, page))
                    .components(pager_rows(&prev_id, &next_id, page, pages.len())),
            )
            .await?;

        if pages.len() == 1 {
            return Ok(());
        }
        let message_id = handle.message().await?.id;

        loop {
            let prev_filter = prev_id.clone();
            let next_filter = next_id.clone();
            let Some(press) = ComponentInteractionCollector::new(ctx)
                .channel_id(ctx.channel_id())
                .message_id(message_id)
                .timeout(std::time::Duration::from_secs(PAGER_IDLE_SECS))
                .filter(move |press| {
                    press.data.custom_id == prev_filter || press.data.custom_id == next_filter
                })
                .await
            else {
                break;
            };

            // Page flips belong to whoever opened the binder
            if press.user.id != ctx.author().id {
                press
                    .create_response(
                        ctx,
                        CreateInteractionResponse::Message(
                            CreateInteractionResponseMessage::new()
                                .content("🙅 Only the binder's owner can flip its pages.")
                                .ephemeral(true),
                        ),
                    )
                    .await?;
                continue;
            }

            if press.data.custom_id == next_id {
                page = (page + 1).min(pages.len() - 1);
            } else {
                page = page.saturating_sub(1);
            }

            press
                .create_response(
                    ctx,
                    CreateInteractionResponse::UpdateMessage(
                        CreateInteractionResponseMessage::new()
                            .embed(inventory_embed(&ctx.author().name, &pages, page))
                            .components(pager_rows(&prev_id, &next_id, page, pages.len())),
                    ),
                )
                .await?;
        }

        // Strip the controls once the pager goes idle
        handle
            .edit(
                ctx,
                CreateReply::default()
                    .embed(inventory_embed(&ctx.author().name, &pages, page))
                    .components(Vec::new()),
            )
            .await?;
        Ok(())
    }

    /// Shows your balance, daily streak, collection size, and featured card.
    #[poise::command(slash_command)]
    pub async fn profile(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.defer().await?;
        let user_id = ctx.author().id.to_string();
        let db = &ctx.data().database;

        let profile = economy::get_or_create_profile(db, &user_id).await?;
        let cards = inventory::copy_count(db, &user_id).await?;

        // The featured reference is soft: re-resolve it and fall back to
        // "none" when the card has left the catalog.
        let featured = match profile.featured_code.as_deref() {
            Some(code) => catalog::get_item(db, code).await?,
            None => None,
        };

        let mut embed = CreateEmbed::new()
            .title(format!("☕ {}'s cafe profile", ctx.author().name))
            .field("Balance", format!("🪙 {}", profile.balance), true)
            .field("Daily streak", format!("🔥 {}", profile.streak), true)
            .field("Cards", format!("🗃️ {cards}"), true);

        match featured {
            Some(item) => {
                embed = embed.field(
                    "Featured card",
                    format!("**{}** (`{}`) · {} · {}", item.name, item.code, item.era, item.rarity),
                    false,
                );
                if let Some(url) = item.image_url.as_deref() {
                    embed = embed.thumbnail(url);
                }
            }
            None => {
                embed = embed.field("Featured card", "none", false);
            }
        }

        ctx.send(CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Showcases one of your cards on your profile.
    #[poise::command(slash_command)]
    pub async fn set_featured(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Code of a card you own"]
        #[autocomplete = "autocomplete::autocomplete_owned_code"]
        code: String,
    ) -> Result<()> {
        let user_id = ctx.author().id.to_string();

        match economy::set_featured(&ctx.data().database, &user_id, &code).await {
            Ok(profile) => {
                let shown = profile.featured_code.unwrap_or_default();
                ctx.say(format!("🌟 **{shown}** is now your featured card."))
                    .await?;
            }
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

    fn render_page(lines: &[inventory::InventoryLine]) -> String {
        lines
            .iter()
            .map(|line| match &line.item {
                Some(item) => format!(
                    "`{}` **{}** · {} · {} · {} ×{}",
                    line.code, item.name, item.group_name, item.era, item.rarity, line.copies
                ),
                None => format!("`{}` (no longer in the catalog) ×{}", line.code, line.copies),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn inventory_embed(owner: &str, pages: &[String], page: usize) -> CreateEmbed {
        CreateEmbed::new()
            .title(format!("🗃️ {owner}'s binder"))
            .description(pages.get(page).cloned().unwrap_or_default())
            .footer(CreateEmbedFooter::new(format!(
                "Page {} of {}",
                page + 1,
                pages.len()
            )))
    }

    fn pager_rows(
        prev_id: &str,
        next_id: &str,
        page: usize,
        page_count: usize,
    ) -> Vec<CreateActionRow> {
        if page_count <= 1 {
            return Vec::new();
        }
        vec![CreateActionRow::Buttons(vec![
            CreateButton::new(prev_id)
                .label("◀ Prev")
                .style(ButtonStyle::Secondary)
                .disabled(page == 0),
            CreateButton::new(next_id)
                .label("Next ▶")
                .style(ButtonStyle::Secondary)
                .disabled(page + 1 >= page_count),
        ])]
    }
}

// Re-export all commands
pub use inner::*;
