//! General Discord commands - ping, help and the FAQ browser.
//! These commands need no profile; the FAQ reads the tree loaded at start-up.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Optima Bank Help**\n\
        Earn points, browse the catalog and redeem vouchers.\n\n\
        **Catalog**\n\
        • `/vouchers [search] [category] [max_points]` - Browse and search vouchers.\n\
        • `/voucher <title>` - Shows one voucher in detail.\n\
        • `/balance` - Shows your point balance.\n\n\
        **Redeeming**\n\
        • `/redeem <title> [quantity] [expected_points]` - Redeems a voucher now.\n\
        • `/history` - Lists your past redemptions.\n\
        • `/receipt <id>` - Sends the receipt for a redemption.\n\n\
        **Cart & Wishlist**\n\
        • `/cart <add|list|update|remove|clear|checkout>` - Manage your cart.\n\
        • `/wishlist <add|list|remove>` - Manage your wishlist.\n\n\
        **Other**\n\
        • `/faq [topic]` - Frequently asked questions.\n\
        • `/admin ...` - Administrator console.\n\
        • `/ping` - Checks if the bot is responsive.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Browse frequently asked questions.
    ///
    /// Without a topic, lists the top-level questions. With a topic, shows the
    /// answer and the follow-up questions.
    #[poise::command(slash_command, prefix_command)]
    pub async fn faq(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Question ID or text"]
        #[autocomplete = "autocomplete::autocomplete_faq_topic"]
        topic: Option<String>,
    ) -> Result<()> {
        let tree = &ctx.data().faq;

        if tree.is_empty() {
            ctx.say("❓ No FAQ entries are configured.").await?;
            return Ok(());
        }

        let mut response = String::new();
        match topic {
            None => {
                writeln!(response, "**❓ Frequently Asked Questions**").ok();
                for node in tree.roots() {
                    writeln!(response, "• `{}` - {}", node.id, node.question).ok();
                }
                writeln!(response, "\nUse `/faq <topic>` to read an answer.").ok();
            }
            Some(topic) => {
                let Some(node) = tree.find(&topic) else {
                    ctx.say(format!("❓ No FAQ entry matches '{topic}'.")).await?;
                    return Ok(());
                };
                writeln!(response, "**{}**\n{}", node.question, node.answer).ok();
                let follow_ups = tree.follow_ups(&node.id);
                if !follow_ups.is_empty() {
                    writeln!(response, "\n**Related questions:**").ok();
                    for follow_up in follow_ups {
                        writeln!(response, "• `{}` - {}", follow_up.id, follow_up.question).ok();
                    }
                }
            }
        }

        ctx.say(response).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
