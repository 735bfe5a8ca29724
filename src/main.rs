#![allow(clippy::result_large_err)]

use optima_bank::{
    bot::{self, BotData},
    config::{
        database,
        settings::{self, ConnectionSettings},
        store,
    },
    core::{faq::FaqTree, voucher},
    errors::Result,
};
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Required settings, then the optional store configuration
    let connection = ConnectionSettings::from_env()
        .inspect_err(|e| error!("Missing required settings: {}", e))?;
    let store_config = store::load_config_or_default(settings::config_path())
        .inspect_err(|e| error!("Failed to load store configuration: {}", e))?;
    let faq = FaqTree::from_config(&store_config.faq)
        .inspect_err(|e| error!("Invalid FAQ configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Initialize database
    let db = database::create_connection(&connection.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the catalog from configuration
    voucher::seed_catalog(&db, &store_config)
        .await
        .inspect(|created| info!("Catalog seeded ({} new entries).", created))
        .inspect_err(|e| error!("Failed to seed catalog: {}", e))?;

    // 6. Run the bot
    let data = BotData::new(db, Arc::new(store_config), faq);
    bot::run_bot(connection.bot_token, data).await?;

    Ok(())
}
