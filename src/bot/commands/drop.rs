//! Drop Discord command - publishes a timed card drop and drives its claims.
//!
//! The command creates a [`crate::core::drop::DropSession`], publishes the
//! outward message with one claim button per slot, and then funnels button
//! presses into the session's compare-and-set claim operation until the
//! session fills or the deadline passes. The outward message goes through
//! three explicit phases - create, update, finalize - instead of an ad-hoc
//! reply-or-edit object.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{
            drop::{ClaimSuccess, DropSession, DropSummary, create_session},
            inventory,
        },
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::{CreateReply, ReplyHandle, serenity_prelude as serenity};
    use serenity::{
        ButtonStyle, ComponentInteraction, ComponentInteractionCollector, CreateActionRow,
        CreateButton, CreateEmbed, CreateEmbedFooter, CreateInteractionResponse,
        CreateInteractionResponseMessage,
    };
    use tracing::{error, info};

    /// Drops a tray of random cards - first to press a button claims that card.
    #[poise::command(slash_command, guild_only)]
    pub async fn drop(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let initiator = ctx.author().id.to_string();

        let session = match create_session(
            &data.database,
            &data.cooldowns,
            &data.config.drops,
            ctx.id(),
            &initiator,
        )
        .await
        {
            Ok(session) => session,
            Err(Error::OnCooldown { remaining }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!(
                            "⏳ Easy there! You can drop again in {}.",
                            crate::bot::commands::format_remaining(remaining)
                        ))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(Error::InsufficientCatalog { have, need }) => {
                ctx.send(
                    CreateReply::default()
                        .content(format!(
                            "📦 The catalog only holds {have} card(s) but a drop needs {need}. \
                             Ask an admin to `/add_item` a few more."
                        ))
                        .ephemeral(true),
                )
                .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        // Phase one: create the outward message
        let handle = ctx
            .send(
                CreateReply::default()
                    .embed(open_embed(&session))
                    .components(claim_rows(&session, false)),
            )
            .await?;
        let message_id = handle.message().await?.id;

        run_claim_loop(ctx, &session, &handle, message_id).await?;

        // Full claim and deadline expiry both land here; finalize yields the
        // one summary no matter which path won.
        if let Some(summary) = session.finalize() {
            finalize_outward(ctx, &handle, &session, &summary).await?;
            info!(session = session.id(), "drop session finalized");
        }
        Ok(())
    }

    /// Funnels claim button presses into the session until it fills or the
    /// deadline passes. The collector timeout is recomputed from the session
    /// deadline each iteration, which is what makes the deadline timer
    /// effectively cancellable: a full session simply breaks out and the
    /// pending wait dies with the collector.
    async fn run_claim_loop(
        ctx: poise::Context<'_, BotData, Error>,
        session: &DropSession,
        handle: &ReplyHandle<'_>,
        message_id: serenity::MessageId,
    ) -> Result<()> {
        let prefix = format!("claim:{}:", session.id());

        loop {
            let Ok(timeout) = (session.deadline() - Utc::now()).to_std() else {
                break; // deadline already behind us
            };
            let filter_prefix = prefix.clone();
            let Some(press) = ComponentInteractionCollector::new(ctx)
                .channel_id(ctx.channel_id())
                .message_id(message_id)
                .timeout(timeout)
                .filter(move |press| press.data.custom_id.starts_with(&filter_prefix))
                .await
            else {
                break; // deadline timer fired with no press
            };

            let Some(slot) = press
                .data
                .custom_id
                .strip_prefix(&prefix)
                .and_then(|raw| raw.parse::<usize>().ok())
            else {
                continue;
            };
            let claimant = press.user.id.to_string();

            match session.try_claim(slot, &claimant, Utc::now()) {
                Ok(granted) => {
                    handle_granted_claim(ctx, &press, session, &claimant, &granted).await?;
                    update_outward(ctx, handle, session).await?;
                    if granted.session_full {
                        break;
                    }
                }
                Err(Error::AlreadyClaimed) => {
                    ack(ctx, &press, "🫰 Too slow — someone beat you to that card.").await?;
                }
                Err(Error::Expired) => {
                    ack(ctx, &press, "⌛ This drop already expired.").await?;
                    break;
                }
                Err(Error::UnknownSlot { .. }) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Durable half of a granted claim: the inventory append is attempted at
    /// least once, and a store failure is reported to the claimant as a
    /// degraded success - the claim itself is never revoked.
    async fn handle_granted_claim(
        ctx: poise::Context<'_, BotData, Error>,
        press: &ComponentInteraction,
        session: &DropSession,
        claimant: &str,
        granted: &ClaimSuccess,
    ) -> Result<()> {
        match inventory::append_copy(&ctx.data().database, claimant, &granted.item.code, "drop")
            .await
        {
            Ok(_) => {
                info!(
                    session = session.id(),
                    user = %claimant,
                    code = %granted.item.code,
                    "claim granted"
                );
                ack(
                    ctx,
                    press,
                    &format!("☕ You claimed **{}**! It's in your binder.", granted.item.name),
                )
                .await
            }
            Err(e) => {
                error!(
                    session = session.id(),
                    user = %claimant,
                    code = %granted.item.code,
                    "inventory write failed after granted claim: {e}"
                );
                ack(
                    ctx,
                    press,
                    &format!(
                        "⚠️ You claimed **{}**, but saving it hit a storage error. \
                         Ping an admin if it's missing from your binder.",
                        granted.item.name
                    ),
                )
                .await
            }
        }
    }

    async fn ack(
        ctx: poise::Context<'_, BotData, Error>,
        press: &ComponentInteraction,
        content: &str,
    ) -> Result<()> {
        press
            .create_response(
                ctx,
                CreateInteractionResponse::Message(
                    CreateInteractionResponseMessage::new()
                        .content(content)
                        .ephemeral(true),
                ),
            )
            .await
            .map_err(Into::into)
    }

    /// Phase two: re-render the outward message after a claim.
    async fn update_outward(
        ctx: poise::Context<'_, BotData, Error>,
        handle: &ReplyHandle<'_>,
        session: &DropSession,
    ) -> Result<()> {
        handle
            .edit(
                ctx,
                CreateReply::default()
                    .embed(open_embed(session))
                    .components(claim_rows(session, false)),
            )
            .await
            .map_err(Into::into)
    }

    /// Phase three: replace the interactive controls with the inert summary.
    async fn finalize_outward(
        ctx: poise::Context<'_, BotData, Error>,
        handle: &ReplyHandle<'_>,
        session: &DropSession,
        summary: &DropSummary,
    ) -> Result<()> {
        handle
            .edit(
                ctx,
                CreateReply::default()
                    .embed(summary_embed(summary))
                    .components(claim_rows(session, true)),
            )
            .await
            .map_err(Into::into)
    }

    fn open_embed(session: &DropSession) -> CreateEmbed {
        let claims = session.claim_snapshot();
        let mut embed = CreateEmbed::new()
            .title("☕ A tray of cards hits the counter!")
            .description(format!(
                "First come, first served — claims close <t:{}:R>.",
                session.deadline().timestamp()
            ))
            .footer(CreateEmbedFooter::new(
                "Press a button to claim that card.",
            ));

        for (index, item) in session.slots().iter().enumerate() {
            let value = match claims.get(index).and_then(Option::as_ref) {
                Some(claim) => format!("Claimed by <@{}>", claim.user_id),
                None => format!(
                    "`{}` · {} · {} · {}",
                    item.code, item.group_name, item.era, item.rarity
                ),
            };
            embed = embed.field(format!("Slot {} — {}", index + 1, item.name), value, false);
        }
        if let Some(url) = session.slots().first().and_then(|item| item.image_url.as_deref()) {
            embed = embed.thumbnail(url);
        }
        embed
    }

    fn summary_embed(summary: &DropSummary) -> CreateEmbed {
        let mut embed = CreateEmbed::new()
            .title("☕ Drop over!")
            .description("Here's how the tray went:");

        for (index, outcome) in summary.slots.iter().enumerate() {
            let value = match &outcome.claim {
                Some(claim) => format!("Claimed by <@{}>", claim.user_id),
                None => "Expired unclaimed".to_string(),
            };
            embed = embed.field(
                format!("Slot {} — {}", index + 1, outcome.item.name),
                value,
                false,
            );
        }
        embed
    }

    fn claim_rows(session: &DropSession, all_disabled: bool) -> Vec<CreateActionRow> {
        let claims = session.claim_snapshot();
        let buttons = session
            .slots()
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let taken = claims.get(index).is_some_and(Option::is_some);
                CreateButton::new(format!("claim:{}:{index}", session.id()))
                    .label(format!("Claim {}", item.code))
                    .style(ButtonStyle::Primary)
                    .disabled(all_disabled || taken)
            })
            .collect();
        vec![CreateActionRow::Buttons(buttons)]
    }
}

// Re-export all commands
pub use inner::*;
