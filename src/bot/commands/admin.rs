//! Administrator Discord commands, grouped under `/admin`.
//!
//! Every subcommand goes through [`crate::core::admin`], which re-checks the
//! caller's admin flag against the store before doing anything.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, session},
        },
        core::{
            admin,
            voucher::{NewVoucher, VoucherChanges},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Administrator console.
    #[poise::command(
        slash_command,
        subcommands(
            "admin_points",
            "admin_audit",
            "admin_profiles",
            "admin_add_voucher",
            "admin_edit_voucher",
            "admin_hide_voucher",
            "admin_delete_voucher",
            "admin_add_category",
            "admin_delete_category"
        )
    )]
    pub async fn admin(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "Administrator console. Available subcommands:\n\
            • `/admin points <user> <delta> <reason>` - Adjust a balance.\n\
            • `/admin audit [user]` - Show the points audit trail.\n\
            • `/admin profiles` - List all profiles.\n\
            • `/admin add-voucher`, `/admin edit-voucher`, `/admin hide-voucher`, `/admin delete-voucher`\n\
            • `/admin add-category`, `/admin delete-category`";
        ctx.say(help_text).await?;
        Ok(())
    }

    /// Adds or removes points from a user's balance. Balances never go below zero.
    #[poise::command(slash_command, rename = "points")]
    pub async fn admin_points(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "User whose balance to adjust"] user: serenity::User,
        #[description = "Points to add (negative to remove)"] delta: i64,
        #[description = "Why the balance is changing"] reason: String,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let db = &ctx.data().database;
        let target_id = user.id.to_string();

        let adjustment =
            match admin::adjust_user_points(db, &session, &target_id, delta, &reason).await {
                Err(Error::ProfileNotFound { .. }) => {
                    ctx.say(format!(
                        "❌ {} has not used the bot yet, so they have no balance.",
                        user.name
                    ))
                    .await?;
                    return Ok(());
                }
                result => result?,
            };

        let clamp_note = if adjustment.new_balance - adjustment.previous_balance == delta {
            ""
        } else {
            " (clamped at zero)"
        };
        ctx.say(format!(
            "✅ {}'s balance: {} → **{}** points{}.\nAudit entry #{}: {}",
            user.name,
            adjustment.previous_balance,
            adjustment.new_balance,
            clamp_note,
            adjustment.audit.id,
            adjustment.audit.reason
        ))
        .await?;
        Ok(())
    }

    /// Shows the points audit trail, optionally for one user.
    #[poise::command(slash_command, rename = "audit")]
    pub async fn admin_audit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this user's entries"] user: Option<serenity::User>,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let target_id = user.as_ref().map(|u| u.id.to_string());
        let entries =
            admin::list_audit_entries(&ctx.data().database, &session, target_id.as_deref()).await?;

        if entries.is_empty() {
            ctx.say("📋 No audit entries found.").await?;
            return Ok(());
        }

        let mut response = String::from("**📋 Points audit**\n");
        for entry in entries.iter().take(20) {
            writeln!(
                response,
                "• #{} {} <@{}> {:+} → {} by <@{}>: {}",
                entry.id,
                entry.created_at.format("%Y-%m-%d"),
                entry.user_id,
                entry.delta,
                entry.balance_after,
                entry.admin_id,
                entry.reason
            )
            .ok();
        }

        ctx.send(
            poise::CreateReply::default()
                .content(response)
                .allowed_mentions(serenity::CreateAllowedMentions::new()),
        )
        .await?;
        Ok(())
    }

    /// Lists every profile with its balance.
    #[poise::command(slash_command, rename = "profiles")]
    pub async fn admin_profiles(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let profiles = admin::list_profiles(&ctx.data().database, &session).await?;

        let mut response = format!("**👥 Profiles ({})**\n", profiles.len());
        for p in &profiles {
            let name = p.display_name.as_deref().unwrap_or(p.user_id.as_str());
            let badge = if p.is_admin { " 🛡️" } else { "" };
            writeln!(response, "• {name}{badge} - {} pts", p.total_points).ok();
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Adds a voucher to the catalog.
    #[poise::command(slash_command, rename = "add-voucher")]
    #[allow(clippy::too_many_arguments)]
    pub async fn admin_add_voucher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Unique title"] title: String,
        #[description = "Catalog description"] description: String,
        #[description = "Cost in points"] points: i64,
        #[description = "Units in stock (defaults to 0)"] stock: Option<i64>,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Image URL"] image: Option<String>,
        #[description = "Create hidden"] hidden: Option<bool>,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let category_id = match category.as_deref() {
            Some(name) => Some(session::category_by_name(ctx, name).await?.id),
            None => None,
        };

        let created = admin::add_voucher(
            &ctx.data().database,
            &session,
            NewVoucher {
                title,
                description,
                points,
                category_id,
                stock: stock.unwrap_or(0),
                is_hidden: hidden.unwrap_or(false),
                image,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Voucher **{}** created at {} points.",
            created.title, created.points
        ))
        .await?;
        Ok(())
    }

    /// Edits a voucher. Only the fields you provide change.
    #[poise::command(slash_command, rename = "edit-voucher")]
    #[allow(clippy::too_many_arguments)]
    pub async fn admin_edit_voucher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher to edit"]
        #[autocomplete = "autocomplete::autocomplete_any_voucher_title"]
        voucher: String,
        #[description = "New title"] title: Option<String>,
        #[description = "New description"] description: Option<String>,
        #[description = "New cost in points"] points: Option<i64>,
        #[description = "New stock"] stock: Option<i64>,
        #[description = "New category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: Option<String>,
        #[description = "Remove the category"] clear_category: Option<bool>,
        #[description = "New image URL"] image: Option<String>,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let existing = session::voucher_by_title(ctx, &voucher).await?;

        let category_id = if clear_category.unwrap_or(false) {
            Some(None)
        } else {
            match category.as_deref() {
                Some(name) => Some(Some(session::category_by_name(ctx, name).await?.id)),
                None => None,
            }
        };

        let updated = admin::edit_voucher(
            &ctx.data().database,
            &session,
            existing.id,
            VoucherChanges {
                title,
                description,
                points,
                category_id,
                stock,
                is_hidden: None,
                image: image.map(Some),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Voucher **{}** updated ({} points, {} in stock).",
            updated.title, updated.points, updated.stock
        ))
        .await?;
        Ok(())
    }

    /// Hides a voucher from the catalog, or shows it again.
    #[poise::command(slash_command, rename = "hide-voucher")]
    pub async fn admin_hide_voucher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher"]
        #[autocomplete = "autocomplete::autocomplete_any_voucher_title"]
        voucher: String,
        #[description = "True to hide, false to show"] hidden: bool,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let existing = session::voucher_by_title(ctx, &voucher).await?;
        let updated =
            admin::set_voucher_hidden(&ctx.data().database, &session, existing.id, hidden).await?;

        let state = if updated.is_hidden { "hidden" } else { "visible" };
        ctx.say(format!("✅ Voucher **{}** is now {state}.", updated.title))
            .await?;
        Ok(())
    }

    /// Deletes a voucher. Cart and wishlist entries for it go too; history stays.
    #[poise::command(slash_command, rename = "delete-voucher")]
    pub async fn admin_delete_voucher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher to delete"]
        #[autocomplete = "autocomplete::autocomplete_any_voucher_title"]
        voucher: String,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let existing = session::voucher_by_title(ctx, &voucher).await?;
        admin::remove_voucher(&ctx.data().database, &session, existing.id).await?;
        ctx.say(format!("🗑️ Voucher **{}** deleted.", existing.title))
            .await?;
        Ok(())
    }

    /// Creates a category.
    #[poise::command(slash_command, rename = "add-category")]
    pub async fn admin_add_category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"] name: String,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let created = admin::add_category(&ctx.data().database, &session, name).await?;
        ctx.say(format!("✅ Category **{}** created.", created.name))
            .await?;
        Ok(())
    }

    /// Deletes a category. Its vouchers become uncategorised.
    #[poise::command(slash_command, rename = "delete-category")]
    pub async fn admin_delete_category(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category to delete"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        name: String,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let existing = session::category_by_name(ctx, &name).await?;
        admin::remove_category(&ctx.data().database, &session, existing.id).await?;
        ctx.say(format!("🗑️ Category **{}** deleted.", existing.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
