//! Session resolution for commands.
//!
//! The Discord author is the signed-in user. Their profile is created on first
//! contact, which is the storefront's sign-up step.

use crate::{
    bot::Context,
    core::{
        category, profile,
        session::{Session, SessionUser},
        voucher,
    },
    entities::{category as category_entity, voucher as voucher_entity},
    errors::{Error, Result},
};

/// Session for the command author, creating their profile if needed.
pub async fn user_session(ctx: Context<'_>) -> Result<Session> {
    let author = ctx.author();
    let user = SessionUser::new(author.id.to_string());
    let display_name = author
        .global_name
        .clone()
        .or_else(|| Some(author.name.clone()));

    let data = ctx.data();
    profile::ensure_profile(&data.database, &user, display_name, &data.store.admin).await?;

    Ok(Session::signed_in(user))
}

/// Finds a voucher by the title picked in autocomplete.
pub async fn voucher_by_title(ctx: Context<'_>, title: &str) -> Result<voucher_entity::Model> {
    voucher::get_voucher_by_title(&ctx.data().database, title)
        .await?
        .ok_or_else(|| Error::VoucherNotFound {
            id: title.to_string(),
        })
}

/// Finds a category by name.
pub async fn category_by_name(ctx: Context<'_>, name: &str) -> Result<category_entity::Model> {
    category::get_category_by_name(&ctx.data().database, name)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            name: name.to_string(),
        })
}
