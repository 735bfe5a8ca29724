//! Redemption Discord commands - redeem, history and receipts.
//!
//! These commands are thin wrappers around [`crate::core::redemption`]; the
//! balance check, deduction and ledger write all happen in one transaction there.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            handlers::{autocomplete, session},
        },
        core::{
            receipt,
            redemption::{self, RedeemRequest},
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Redeems a voucher with your points.
    ///
    /// Pass the price you saw as `expected_points` to be warned if it changed
    /// before the redemption went through.
    #[poise::command(slash_command, prefix_command)]
    pub async fn redeem(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Voucher to redeem"]
        #[autocomplete = "autocomplete::autocomplete_voucher_title"]
        title: String,
        #[description = "How many (defaults to 1)"] quantity: Option<i32>,
        #[description = "The price you saw, in points"] expected_points: Option<i64>,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let voucher = session::voucher_by_title(ctx, &title).await?;

        let request = RedeemRequest {
            voucher_id: voucher.id,
            quoted_points: expected_points,
            quantity: quantity.unwrap_or(1),
        };
        let data = ctx.data();
        let outcome =
            redemption::redeem(&data.database, &session, request, &data.store.redemption).await?;

        info!(
            "User {} redeemed '{}' x{} via Discord",
            ctx.author().name,
            outcome.record.voucher_title,
            outcome.record.quantity
        );

        ctx.say(format!(
            "✅ Redeemed **{}** x{} for {} points. Remaining balance: **{}** points.\n\
            Use `/receipt {}` to get your receipt.",
            outcome.record.voucher_title,
            outcome.record.quantity,
            outcome.record.points_used,
            outcome.new_balance,
            outcome.record.id
        ))
        .await?;
        Ok(())
    }

    /// Lists your past redemptions, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let records = redemption::list_redemptions(&ctx.data().database, &session).await?;

        if records.is_empty() {
            ctx.say("📜 You haven't redeemed anything yet.").await?;
            return Ok(());
        }

        let mut response = format!("**📜 Your redemptions ({})**\n", records.len());
        for record in records.iter().take(20) {
            writeln!(
                response,
                "• #{} {} - **{}** x{} for {} pts",
                record.id,
                record.redeemed_at.format("%Y-%m-%d"),
                record.voucher_title,
                record.quantity,
                record.points_used
            )
            .ok();
        }
        if records.len() > 20 {
            writeln!(response, "_...and {} older_", records.len() - 20).ok();
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Sends the PDF receipt for one of your redemptions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn receipt(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Redemption number from /history"] id: i64,
    ) -> Result<()> {
        let session = session::user_session(ctx).await?;
        let receipt = receipt::receipt_for(&ctx.data().database, &session, id).await?;

        let attachment =
            serenity::CreateAttachment::bytes(receipt.pdf, receipt.file_name);
        ctx.send(
            poise::CreateReply::default()
                .content(format!("🧾 Receipt for redemption #{id}"))
                .attachment(attachment)
                .ephemeral(true),
        )
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
