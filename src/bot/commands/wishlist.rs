//! Wishlist Discord commands, grouped under `/wishlist`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, session},
        },
        core::wishlist::{self, WishlistAddition},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Manage your wishlist.
    #[poise::command(
        slash_command,
        subcommands("wishlist_add", "wishlist_list", "wishlist_remove")
    )]
    pub async fn wishlist(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(
            "Wishlist command. Available subcommands:\n\
            • `/wishlist add <voucher>`\n\
            • `/wishlist list`\n\
            • `/wishlist remove <item_id>`",
        )
        .await?;
        Ok(())
    }

    /// Saves a voucher to your wishlist.
    #[poise::command(slash_command, rename = "add")]
    pub async fn wishlist_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher to save"]
        #[autocomplete = "autocomplete::autocomplete_voucher_title"]
        title: String,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let voucher = session::voucher_by_title(ctx, &title).await?;

        let message =
            match wishlist::add_to_wishlist(&ctx.data().database, &session, voucher.id).await? {
                WishlistAddition::Added(_) => format!("💖 Added **{}** to your wishlist.", voucher.title),
                WishlistAddition::AlreadyPresent(_) => {
                    format!("💖 **{}** is already on your wishlist.", voucher.title)
                }
            };

        ctx.say(message).await?;
        Ok(())
    }

    /// Lists your wishlist.
    #[poise::command(slash_command, rename = "list")]
    pub async fn wishlist_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let items = wishlist::get_wishlist(&ctx.data().database, &session).await?;

        if items.is_empty() {
            ctx.say("💖 Your wishlist is empty.").await?;
            return Ok(());
        }

        let mut response = String::from("**💖 Your wishlist**\n");
        for (item, voucher) in &items {
            let status = if voucher.is_hidden { " _(unavailable)_" } else { "" };
            writeln!(
                response,
                "• `#{}` **{}** - {} pts{}",
                item.id, voucher.title, voucher.points, status
            )
            .ok();
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Removes an entry from your wishlist.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn wishlist_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Wishlist item number from /wishlist list"] item_id: i64,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        wishlist::remove_from_wishlist_by_id(&ctx.data().database, &session, item_id).await?;
        ctx.say(format!("🗑️ Wishlist item #{item_id} removed.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
