//! Cart Discord commands, grouped under `/cart`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, session},
        },
        core::{
            cart::{self, CartUpdate},
            redemption,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Manage your cart.
    ///
    /// Groups the subcommands for adding, listing, updating, removing, clearing
    /// and checking out.
    #[poise::command(
        slash_command,
        subcommands(
            "cart_add",
            "cart_list",
            "cart_update",
            "cart_remove",
            "cart_clear",
            "cart_checkout"
        )
    )]
    pub async fn cart(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Cart command. Available subcommands:\n\
            • `/cart add <voucher> [quantity]`\n\
            • `/cart list`\n\
            • `/cart update <item_id> <quantity>`\n\
            • `/cart remove <item_id>`\n\
            • `/cart clear`\n\
            • `/cart checkout`";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds a voucher to your cart.
    #[poise::command(slash_command, rename = "add")]
    pub async fn cart_add(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher to add"]
        #[autocomplete = "autocomplete::autocomplete_voucher_title"]
        title: String,
        #[description = "How many (defaults to 1)"] quantity: Option<i32>,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let voucher = session::voucher_by_title(ctx, &title).await?;

        let data = ctx.data();
        let addition = cart::add_to_cart(
            &data.database,
            &session,
            voucher.id,
            quantity.unwrap_or(1),
            &data.store.redemption,
        )
        .await?;

        let mut response = if addition.merged {
            format!(
                "🛒 **{}** is now in your cart x{}.",
                voucher.title, addition.item.quantity
            )
        } else {
            format!(
                "🛒 Added **{}** x{} to your cart.",
                voucher.title, addition.item.quantity
            )
        };
        if let Some(shortfall) = addition.shortfall {
            write!(
                response,
                "\n⚠️ You need **{shortfall}** more points to check out this cart."
            )
            .ok();
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Lists the items in your cart.
    #[poise::command(slash_command, rename = "list")]
    pub async fn cart_list(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let lines = cart::get_cart(&ctx.data().database, &session).await?;

        if lines.is_empty() {
            ctx.say("🛒 Your cart is empty.").await?;
            return Ok(());
        }

        let mut response = String::from("**🛒 Your cart**\n");
        for line in &lines {
            writeln!(
                response,
                "• `#{}` **{}** x{} - {} pts",
                line.item.id,
                line.voucher.title,
                line.item.quantity,
                line.line_total()
            )
            .ok();
        }
        writeln!(response, "\n**Total:** {} points", cart::cart_total(&lines)).ok();

        ctx.say(response).await?;
        Ok(())
    }

    /// Changes the quantity of a cart item. A quantity below 1 removes it.
    #[poise::command(slash_command, rename = "update")]
    pub async fn cart_update(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Cart item number from /cart list"] item_id: i64,
        #[description = "New quantity"] quantity: i32,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let data = ctx.data();
        match cart::update_cart_quantity(
            &data.database,
            &session,
            item_id,
            quantity,
            &data.store.redemption,
        )
        .await?
        {
            CartUpdate::Updated(item) => {
                ctx.say(format!("✅ Cart item #{} quantity set to {}.", item.id, item.quantity))
                    .await?;
            }
            CartUpdate::Removed => {
                ctx.say(format!("🗑️ Cart item #{item_id} removed.")).await?;
            }
        }
        Ok(())
    }

    /// Removes an item from your cart.
    #[poise::command(slash_command, rename = "remove")]
    pub async fn cart_remove(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Cart item number from /cart list"] item_id: i64,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        cart::remove_from_cart(&ctx.data().database, &session, item_id).await?;
        ctx.say(format!("🗑️ Cart item #{item_id} removed.")).await?;
        Ok(())
    }

    /// Empties your cart.
    #[poise::command(slash_command, rename = "clear")]
    pub async fn cart_clear(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let removed = cart::remove_all_from_cart(&ctx.data().database, &session).await?;
        ctx.say(format!("🗑️ Removed {removed} item(s) from your cart."))
            .await?;
        Ok(())
    }

    /// Redeems everything in your cart in one go.
    #[poise::command(slash_command, rename = "checkout")]
    pub async fn cart_checkout(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let data = ctx.data();
        let checkout =
            redemption::checkout_cart(&data.database, &session, &data.store.redemption).await?;

        let mut response = format!(
            "✅ Checked out {} item(s) for **{}** points. Remaining balance: **{}** points.\n",
            checkout.records.len(),
            checkout.total_points,
            checkout.new_balance
        );
        for record in &checkout.records {
            writeln!(
                response,
                "• #{} **{}** x{}",
                record.id, record.voucher_title, record.quantity
            )
            .ok();
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
