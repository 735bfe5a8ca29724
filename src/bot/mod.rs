//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for Optima Bank: slash commands
//! for the storefront and the admin console, autocomplete handlers, and the
//! framework setup. Commands stay thin; every rule lives in [`crate::core`].

/// Discord command implementations (catalog, account, cart, wishlist, admin, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, session resolution)
pub mod handlers;

use crate::{
    config::store::StoreConfig,
    core::faq::FaqTree,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection, the store configuration and
/// the FAQ tree that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Redemption policy, admin bootstrap list and catalog seed
    pub store: Arc<StoreConfig>,
    /// Validated FAQ content
    pub faq: FaqTree,
}

impl BotData {
    /// Creates a new `BotData` instance.
    #[must_use]
    pub const fn new(database: DatabaseConnection, store: Arc<StoreConfig>, faq: FaqTree) -> Self {
        Self {
            database,
            store,
            faq,
        }
    }
}

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            if error.is_user_error() {
                info!("Command `{}` refused: {}", ctx.command().name, error);
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
            }
            if let Err(e) = ctx.say(error.user_message()).await {
                error!("Failed to send error message: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Builds the framework, registers commands and runs until the gateway closes.
///
/// # Errors
/// Returns an error if the client cannot be created or the connection fails.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client.start().await.inspect_err(|e| warn!("Client stopped: {:?}", e))?;
    Ok(())
}
