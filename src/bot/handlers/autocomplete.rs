//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggests voucher titles and category names as the user types.

use crate::{
    bot::Context,
    core::{category, voucher},
};

/// Suggests visible voucher titles containing `partial` (case-insensitive).
pub async fn autocomplete_voucher_title(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(vouchers) = voucher::list_visible_vouchers(&ctx.data().database).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    vouchers
        .into_iter()
        .filter(|v| v.title.to_lowercase().contains(&partial_lower))
        .map(|v| v.title)
        .take(25) // Discord autocomplete limit
        .collect()
}

/// Suggests every voucher title, hidden ones included, for admin commands.
pub async fn autocomplete_any_voucher_title(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(vouchers) = voucher::list_all_vouchers(&ctx.data().database).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    vouchers
        .into_iter()
        .filter(|v| v.title.to_lowercase().contains(&partial_lower))
        .map(|v| v.title)
        .take(25)
        .collect()
}

/// Suggests category names containing `partial`.
pub async fn autocomplete_category(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let Ok(categories) = category::list_categories(&ctx.data().database).await else {
        return Vec::new();
    };

    let partial_lower = partial.to_lowercase();
    categories
        .into_iter()
        .filter(|c| c.name.to_lowercase().contains(&partial_lower))
        .map(|c| c.name)
        .take(25)
        .collect()
}

/// Suggests FAQ questions by ID.
pub async fn autocomplete_faq_topic(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    ctx.data()
        .faq
        .nodes()
        .iter()
        .filter(|node| {
            node.id.to_lowercase().contains(&partial_lower)
                || node.question.to_lowercase().contains(&partial_lower)
        })
        .map(|node| node.id.clone())
        .take(25)
        .collect()
}
