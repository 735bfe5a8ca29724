//! Cart business logic - pending redemption intents per user.
//!
//! The cart never touches balances. Adding a voucher that is already in the
//! cart merges into the existing row; the insufficient-points check at add time
//! is advisory only and reported back as a shortfall.

use crate::{
    config::store::RedemptionPolicy,
    core::{profile, session::Session, voucher},
    entities::{CartItem, Voucher, cart_item, voucher as voucher_entity},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// A cart row joined with its voucher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: cart_item::Model,
    pub voucher: voucher_entity::Model,
}

impl CartLine {
    /// Points this line would cost at the voucher's current price.
    #[must_use]
    pub fn line_total(&self) -> i64 {
        self.voucher
            .points
            .saturating_mul(i64::from(self.item.quantity))
    }
}

/// Result of [`add_to_cart`].
#[derive(Debug, Clone)]
pub struct CartAddition {
    /// The row after the add
    pub item: cart_item::Model,
    /// True when the voucher was already in the cart and its quantity grew
    pub merged: bool,
    /// Points still missing to check out the whole cart, if any
    pub shortfall: Option<i64>,
}

/// Result of [`update_cart_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartUpdate {
    /// Quantity was overwritten
    Updated(cart_item::Model),
    /// Quantity below 1 removed the row
    Removed,
}

/// Sum of all line totals.
#[must_use]
pub fn cart_total(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .fold(0_i64, |acc, line| acc.saturating_add(line.line_total()))
}

/// The signed-in user's cart, oldest line first.
///
/// # Errors
/// [`Error::Unauthenticated`] for an anonymous session, or a database error.
pub async fn get_cart<C>(db: &C, session: &Session) -> Result<Vec<CartLine>>
where
    C: ConnectionTrait,
{
    let user = session.require_user()?;
    get_cart_for_user(db, &user.id).await
}

pub(crate) async fn get_cart_for_user<C>(db: &C, user_id: &str) -> Result<Vec<CartLine>>
where
    C: ConnectionTrait,
{
    let rows = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user_id))
        .order_by_asc(cart_item::Column::Id)
        .find_also_related(Voucher)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(item, voucher)| voucher.map(|voucher| CartLine { item, voucher }))
        .collect())
}

/// A cart line must stay within what a checkout will accept.
fn check_line_quantity(quantity: i32, policy: &RedemptionPolicy) -> Result<()> {
    if quantity < 1 {
        return Err(Error::validation("Quantity must be at least 1"));
    }
    if quantity > policy.max_quantity {
        return Err(Error::validation(format!(
            "A cart line can hold at most {} units",
            policy.max_quantity
        )));
    }
    Ok(())
}

async fn find_owned_item(
    db: &DatabaseConnection,
    user_id: &str,
    cart_id: i64,
) -> Result<cart_item::Model> {
    CartItem::find_by_id(cart_id)
        .filter(cart_item::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or(Error::CartItemNotFound { id: cart_id })
}

/// Adds `quantity` units of a voucher to the cart, merging with an existing row.
///
/// # Errors
/// Returns an error if:
/// - the session is anonymous
/// - `quantity` is below 1, or the merged quantity exceeds `policy.max_quantity`
/// - the voucher does not exist or is hidden
pub async fn add_to_cart(
    db: &DatabaseConnection,
    session: &Session,
    voucher_id: i64,
    quantity: i32,
    policy: &RedemptionPolicy,
) -> Result<CartAddition> {
    let user = session.require_user()?;
    check_line_quantity(quantity, policy)?;

    voucher::get_available_voucher(db, voucher_id).await?;

    let existing = CartItem::find()
        .filter(cart_item::Column::UserId.eq(user.id.as_str()))
        .filter(cart_item::Column::VoucherId.eq(voucher_id))
        .one(db)
        .await?;

    let merged = existing.is_some();
    let item = if let Some(existing) = existing {
        let new_quantity = existing
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| Error::validation("Quantity is too large"))?;
        check_line_quantity(new_quantity, policy)?;
        let mut active: cart_item::ActiveModel = existing.into();
        active.quantity = Set(new_quantity);
        active.update(db).await?
    } else {
        cart_item::ActiveModel {
            user_id: Set(user.id.clone()),
            voucher_id: Set(voucher_id),
            quantity: Set(quantity),
            added_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?
    };

    let balance = profile::get_profile(db, &user.id)
        .await?
        .map_or(0, |p| p.total_points);
    let total = cart_total(&get_cart_for_user(db, &user.id).await?);
    let shortfall = (total > balance).then(|| total - balance);

    tracing::debug!(user_id = %user.id, voucher_id, quantity = item.quantity, merged, "Cart updated");

    Ok(CartAddition {
        item,
        merged,
        shortfall,
    })
}

/// Overwrites the quantity of a cart row; a quantity below 1 removes it.
///
/// # Errors
/// [`Error::CartItemNotFound`] if the row does not exist or belongs to someone
/// else, [`Error::Validation`] above `policy.max_quantity`.
pub async fn update_cart_quantity(
    db: &DatabaseConnection,
    session: &Session,
    cart_id: i64,
    new_quantity: i32,
    policy: &RedemptionPolicy,
) -> Result<CartUpdate> {
    if new_quantity < 1 {
        remove_from_cart(db, session, cart_id).await?;
        return Ok(CartUpdate::Removed);
    }
    check_line_quantity(new_quantity, policy)?;

    let user = session.require_user()?;
    let mut active: cart_item::ActiveModel = find_owned_item(db, &user.id, cart_id).await?.into();
    active.quantity = Set(new_quantity);

    Ok(CartUpdate::Updated(active.update(db).await?))
}

/// Removes one cart row.
///
/// # Errors
/// [`Error::CartItemNotFound`] if the row does not exist or belongs to someone else.
pub async fn remove_from_cart(db: &DatabaseConnection, session: &Session, cart_id: i64) -> Result<()> {
    let user = session.require_user()?;
    let item = find_owned_item(db, &user.id, cart_id).await?;
    item.delete(db).await?;
    Ok(())
}

/// Empties the cart and returns how many rows were removed.
///
/// # Errors
/// [`Error::CartEmpty`] if there was nothing to remove.
pub async fn remove_all_from_cart(db: &DatabaseConnection, session: &Session) -> Result<u64> {
    let user = session.require_user()?;

    let result = CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user.id.as_str()))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::CartEmpty);
    }
    Ok(result.rows_affected)
}
