//! Autocomplete handlers for Discord slash command parameters.
//!
//! This module suggests item codes as the user types, so `/burn` and
//! `/set_featured` never need a code memorized or copy-pasted.

use crate::{bot::BotData, core::inventory, errors::Error};

/// Suggests codes from the caller's own binder.
///
/// Queries the distinct item codes the user owns, filters them against the
/// partial input (case-insensitive), and returns up to 25 matches - the
/// Discord autocomplete limit. Failures degrade to no suggestions rather
/// than surfacing an error mid-typing.
pub async fn autocomplete_owned_code(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let user_id = ctx.author().id.to_string();

    let Ok(codes) = inventory::distinct_codes_for_user(db, &user_id).await else {
        return Vec::new();
    };

    let needle = partial.trim().to_uppercase();
    codes
        .into_iter()
        .filter(|code| code.contains(&needle))
        .take(25)
        .collect()
}
