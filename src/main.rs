//! Binary entrypoint for Yeosang's Cafe.
//!
//! Boot order matters: tracing first so everything after it can log, then
//! env, configuration, database, catalog seed, and finally the gateway.

use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use yeosang_cafe::{
    bot, config,
    core::catalog,
    errors::{Error, Result},
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenvy::dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration (tunables + seed catalog)
    let app_config = Arc::new(config::settings::load_default_config()?);
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db).await?;

    // 5. Seed catalog entries from config.toml (if any are missing)
    let seeded = catalog::seed_catalog(&db, &app_config.items).await?;
    if seeded > 0 {
        info!("Seeded {seeded} catalog item(s) from config.");
    }

    // 6. Run the bot; the token is loaded directly before use, never stored
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, Arc::clone(&app_config), db).await
}
