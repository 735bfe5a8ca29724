//! Wishlist business logic - same shape as the cart, without quantities.

use crate::{
    core::{session::Session, voucher},
    entities::{Voucher, WishlistItem, voucher as voucher_entity, wishlist_item},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Result of [`add_to_wishlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistAddition {
    /// A new row was inserted
    Added(wishlist_item::Model),
    /// The voucher was already on the wishlist; nothing was inserted
    AlreadyPresent(wishlist_item::Model),
}

/// Adds a voucher to the wishlist unless it is already there.
///
/// # Errors
/// [`Error::Unauthenticated`], [`Error::VoucherNotFound`] or [`Error::VoucherUnavailable`].
pub async fn add_to_wishlist(
    db: &DatabaseConnection,
    session: &Session,
    voucher_id: i64,
) -> Result<WishlistAddition> {
    let user = session.require_user()?;
    voucher::get_available_voucher(db, voucher_id).await?;

    if let Some(existing) = WishlistItem::find()
        .filter(wishlist_item::Column::UserId.eq(user.id.as_str()))
        .filter(wishlist_item::Column::VoucherId.eq(voucher_id))
        .one(db)
        .await?
    {
        return Ok(WishlistAddition::AlreadyPresent(existing));
    }

    let item = wishlist_item::ActiveModel {
        user_id: Set(user.id.clone()),
        voucher_id: Set(voucher_id),
        added_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(WishlistAddition::Added(item))
}

/// Removes a wishlist row by its ID.
///
/// # Errors
/// [`Error::WishlistItemNotFound`] if the row does not exist or belongs to someone else.
pub async fn remove_from_wishlist_by_id(
    db: &DatabaseConnection,
    session: &Session,
    wishlist_id: i64,
) -> Result<()> {
    let user = session.require_user()?;

    let item = WishlistItem::find_by_id(wishlist_id)
        .filter(wishlist_item::Column::UserId.eq(user.id.as_str()))
        .one(db)
        .await?
        .ok_or(Error::WishlistItemNotFound { id: wishlist_id })?;

    item.delete(db).await?;
    Ok(())
}

/// The signed-in user's wishlist with voucher details, oldest first.
///
/// # Errors
/// [`Error::Unauthenticated`] for an anonymous session, or a database error.
pub async fn get_wishlist(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<(wishlist_item::Model, voucher_entity::Model)>> {
    let user = session.require_user()?;

    let rows = WishlistItem::find()
        .filter(wishlist_item::Column::UserId.eq(user.id.as_str()))
        .order_by_asc(wishlist_item::Column::Id)
        .find_also_related(Voucher)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, voucher)| voucher.map(|v| (item, v)))
        .collect())
}
