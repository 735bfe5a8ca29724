//! Catalog Discord commands - browsing, searching and the balance check.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, session},
        },
        core::{category, profile, voucher},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::collections::HashMap;
    use std::fmt::Write;

    /// Browse the voucher catalog, optionally filtered.
    #[poise::command(slash_command, prefix_command)]
    pub async fn vouchers(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Text to search titles and descriptions"] search: Option<String>,
        #[description = "Only this category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Only vouchers costing at most this many points"]
        max_points: Option<i64>,
    ) -> Result<()> {
        let category_id = match category.as_deref() {
            Some(name) => Some(session::category_by_name(ctx, name).await?.id),
            None => None,
        };

        let db = &ctx.data().database;
        let query = voucher::VoucherQuery {
            text: search,
            category_id,
            max_points,
        };
        let vouchers = voucher::search_vouchers(db, &query).await?;

        if vouchers.is_empty() {
            ctx.say("🎁 No vouchers match your search.").await?;
            return Ok(());
        }

        let category_names: HashMap<i64, String> = category::list_categories(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let mut response = format!("**🎁 Vouchers ({})**\n", vouchers.len());
        for v in &vouchers {
            let category_label = v
                .category_id
                .and_then(|id| category_names.get(&id))
                .map_or(String::new(), |name| format!(" [{name}]"));
            writeln!(
                response,
                "• **{}**{} - {} pts ({} in stock)",
                v.title, category_label, v.points, v.stock
            )
            .ok();
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows one voucher in detail.
    #[poise::command(slash_command, prefix_command)]
    pub async fn voucher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher title"]
        #[autocomplete = "autocomplete::autocomplete_voucher_title"]
        title: String,
    ) -> Result<()> {
        let found = session::voucher_by_title(ctx, &title).await?;
        if found.is_hidden {
            return Err(Error::VoucherUnavailable { id: found.id });
        }

        let category_name = match found.category_id {
            Some(id) => category::get_category_by_id(&ctx.data().database, id)
                .await?
                .map(|c| c.name),
            None => None,
        };

        let mut embed = serenity::CreateEmbed::default()
            .title(&found.title)
            .description(&found.description)
            .color(0x00_1F_6F_EB)
            .field("Points", found.points.to_string(), true)
            .field("Stock", found.stock.to_string(), true)
            .field(
                "Category",
                category_name.unwrap_or_else(|| "Uncategorised".to_string()),
                true,
            );
        if let Some(image) = &found.image {
            embed = embed.image(image);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows your point balance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn balance(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let points = profile::get_balance(&ctx.data().database, &session).await?;
        ctx.say(format!("💰 You have **{points}** points.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
