//! Redemption business logic - spending points on vouchers.
//!
//! Balance check, deduction and ledger insert run inside one database
//! transaction, so a redemption either commits completely or leaves no trace.
//! If the ledger insert fails, the transaction is dropped and the deduction
//! rolls back with it; there is no separate compensating write that could
//! itself fail.
//!
//! The deduction is a single guarded statement
//! (`total_points = total_points - cost WHERE total_points >= cost`), so two
//! concurrent redemptions against the same balance cannot both spend the same
//! points. The price charged is always the voucher's stored price; a price
//! quoted by the caller is only compared against it.

use crate::{
    config::store::RedemptionPolicy,
    core::{cart, profile, session::Session, voucher},
    entities::{
        CartItem, Profile, Redemption, Voucher, cart_item, profile as profile_entity, redemption,
        voucher as voucher_entity,
    },
    errors::{Error, Result},
};
use sea_orm::{
    DatabaseTransaction, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr,
};
use tracing::{info, warn};

/// A request to redeem one voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedeemRequest {
    /// Voucher to redeem
    pub voucher_id: i64,
    /// Unit price the caller showed the user; rejected if stale
    pub quoted_points: Option<i64>,
    /// Number of units
    pub quantity: i32,
}

impl RedeemRequest {
    /// One unit at the price the caller displayed.
    #[must_use]
    pub const fn single(voucher_id: i64, points_cost: i64) -> Self {
        Self {
            voucher_id,
            quoted_points: Some(points_cost),
            quantity: 1,
        }
    }

    /// Sets the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }
}

/// A committed redemption and the balance it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionOutcome {
    /// The ledger row
    pub record: redemption::Model,
    /// Balance after the deduction, so callers need not re-read it
    pub new_balance: i64,
}

/// A committed cart checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// One ledger row per cart line
    pub records: Vec<redemption::Model>,
    /// Points charged in total
    pub total_points: i64,
    /// Balance after the deduction
    pub new_balance: i64,
}

fn validate_quantity(quantity: i32, policy: &RedemptionPolicy) -> Result<()> {
    if quantity < 1 {
        return Err(Error::validation("Quantity must be at least 1"));
    }
    if quantity > policy.max_quantity {
        return Err(Error::validation(format!(
            "At most {} units can be redeemed at once",
            policy.max_quantity
        )));
    }
    Ok(())
}

fn line_cost(unit_points: i64, quantity: i32) -> Result<i64> {
    unit_points
        .checked_mul(i64::from(quantity))
        .ok_or_else(|| Error::validation("Redemption cost is too large"))
}

async fn load_profile(txn: &DatabaseTransaction, user_id: &str) -> Result<profile_entity::Model> {
    profile::get_profile(txn, user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })
}

/// Takes stock for one line when the policy enforces inventory.
async fn take_stock(
    txn: &DatabaseTransaction,
    voucher: &voucher_entity::Model,
    quantity: i32,
) -> Result<()> {
    let wanted = i64::from(quantity);
    let result = Voucher::update_many()
        .col_expr(
            voucher_entity::Column::Stock,
            Expr::col(voucher_entity::Column::Stock).sub(wanted),
        )
        .filter(voucher_entity::Column::Id.eq(voucher.id))
        .filter(voucher_entity::Column::Stock.gte(wanted))
        .exec(txn)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::OutOfStock {
            id: voucher.id,
            available: voucher.stock,
        });
    }
    Ok(())
}

/// Deducts `cost` from the user's balance and returns the new balance.
async fn charge_points(txn: &DatabaseTransaction, user_id: &str, cost: i64) -> Result<i64> {
    let result = Profile::update_many()
        .col_expr(
            profile_entity::Column::TotalPoints,
            Expr::col(profile_entity::Column::TotalPoints).sub(cost),
        )
        .filter(profile_entity::Column::UserId.eq(user_id))
        .filter(profile_entity::Column::TotalPoints.gte(cost))
        .exec(txn)
        .await
        .map_err(|e| Error::BalanceUpdateFailed {
            reason: e.to_string(),
        })?;

    let current = load_profile(txn, user_id).await?.total_points;
    if result.rows_affected == 0 {
        // Balance moved between the check and the write
        return Err(Error::InsufficientPoints {
            shortfall: cost - current,
        });
    }
    Ok(current)
}

async fn record_redemption(
    txn: &DatabaseTransaction,
    user_id: &str,
    voucher: &voucher_entity::Model,
    quantity: i32,
    points_used: i64,
) -> Result<redemption::Model> {
    redemption::ActiveModel {
        user_id: Set(user_id.to_string()),
        voucher_id: Set(voucher.id),
        voucher_title: Set(voucher.title.clone()),
        points_used: Set(points_used),
        quantity: Set(quantity),
        redeemed_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(|e| {
        warn!(user_id, voucher_id = voucher.id, error = %e, "Ledger insert failed; rolling back deduction");
        Error::RedemptionRecordFailed {
            reason: e.to_string(),
        }
    })
}

async fn commit(txn: DatabaseTransaction) -> Result<()> {
    txn.commit()
        .await
        .map_err(|e| Error::RedemptionRecordFailed {
            reason: format!("commit failed: {e}"),
        })
}

/// Redeems a voucher for the signed-in user.
///
/// Charges `voucher.points * quantity`. Steps run in order inside one
/// transaction: read balance, read voucher, check, (take stock), deduct,
/// append ledger row, commit.
///
/// # Errors
/// - [`Error::Unauthenticated`] for an anonymous session
/// - [`Error::Validation`] for a quantity outside `1..=policy.max_quantity`
/// - [`Error::ProfileNotFound`] if the user has no balance record
/// - [`Error::VoucherNotFound`] / [`Error::VoucherUnavailable`]
/// - [`Error::PriceChanged`] if `quoted_points` differs from the stored price
/// - [`Error::InsufficientPoints`] with the exact shortfall; nothing is changed
/// - [`Error::OutOfStock`] when stock is enforced and too low
/// - [`Error::BalanceUpdateFailed`] if the store rejects the deduction
/// - [`Error::RedemptionRecordFailed`] if the ledger insert or commit fails;
///   the deduction is rolled back
pub async fn redeem(
    db: &DatabaseConnection,
    session: &Session,
    request: RedeemRequest,
    policy: &RedemptionPolicy,
) -> Result<RedemptionOutcome> {
    let user = session.require_user()?;
    validate_quantity(request.quantity, policy)?;

    let txn = db.begin().await?;

    let balance = load_profile(&txn, &user.id).await?.total_points;
    let voucher = voucher::get_available_voucher(&txn, request.voucher_id).await?;

    if let Some(quoted) = request.quoted_points {
        if quoted != voucher.points {
            return Err(Error::PriceChanged {
                quoted,
                current: voucher.points,
            });
        }
    }

    let cost = line_cost(voucher.points, request.quantity)?;
    if balance < cost {
        return Err(Error::InsufficientPoints {
            shortfall: cost - balance,
        });
    }

    if policy.enforce_stock {
        take_stock(&txn, &voucher, request.quantity).await?;
    }

    let new_balance = charge_points(&txn, &user.id, cost).await?;
    let record = record_redemption(&txn, &user.id, &voucher, request.quantity, cost).await?;
    commit(txn).await?;

    info!(
        user_id = %user.id,
        voucher_id = voucher.id,
        points_used = cost,
        new_balance,
        "Voucher redeemed"
    );

    Ok(RedemptionOutcome {
        record,
        new_balance,
    })
}

/// Redeems everything in the signed-in user's cart and empties it.
///
/// The whole cart is charged in one transaction: either every line gets a
/// ledger row and the cart is cleared, or nothing changes.
///
/// # Errors
/// [`Error::CartEmpty`] when there is nothing to check out, otherwise the same
/// failures as [`redeem`] (without price quotes).
pub async fn checkout_cart(
    db: &DatabaseConnection,
    session: &Session,
    policy: &RedemptionPolicy,
) -> Result<Checkout> {
    let user = session.require_user()?;

    let txn = db.begin().await?;

    let balance = load_profile(&txn, &user.id).await?.total_points;
    let lines = cart::get_cart_for_user(&txn, &user.id).await?;
    if lines.is_empty() {
        return Err(Error::CartEmpty);
    }

    let mut total_points = 0_i64;
    for line in &lines {
        validate_quantity(line.item.quantity, policy)?;
        if line.voucher.is_hidden {
            return Err(Error::VoucherUnavailable {
                id: line.voucher.id,
            });
        }
        total_points = total_points
            .checked_add(line_cost(line.voucher.points, line.item.quantity)?)
            .ok_or_else(|| Error::validation("Cart total is too large"))?;
    }

    if balance < total_points {
        return Err(Error::InsufficientPoints {
            shortfall: total_points - balance,
        });
    }

    if policy.enforce_stock {
        for line in &lines {
            take_stock(&txn, &line.voucher, line.item.quantity).await?;
        }
    }

    let new_balance = charge_points(&txn, &user.id, total_points).await?;

    let mut records = Vec::with_capacity(lines.len());
    for line in &lines {
        let cost = line.line_total();
        records.push(
            record_redemption(&txn, &user.id, &line.voucher, line.item.quantity, cost).await?,
        );
    }

    CartItem::delete_many()
        .filter(cart_item::Column::UserId.eq(user.id.as_str()))
        .exec(&txn)
        .await?;

    commit(txn).await?;

    info!(
        user_id = %user.id,
        lines = records.len(),
        total_points,
        new_balance,
        "Cart checked out"
    );

    Ok(Checkout {
        records,
        total_points,
        new_balance,
    })
}

/// The signed-in user's redemption history, newest first.
///
/// # Errors
/// [`Error::Unauthenticated`] for an anonymous session, or a database error.
pub async fn list_redemptions(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<redemption::Model>> {
    let user = session.require_user()?;

    Redemption::find()
        .filter(redemption::Column::UserId.eq(user.id.as_str()))
        .order_by_desc(redemption::Column::RedeemedAt)
        .order_by_desc(redemption::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// One of the signed-in user's redemptions.
///
/// # Errors
/// [`Error::RedemptionNotFound`] if it does not exist or belongs to someone else.
pub async fn get_redemption(
    db: &DatabaseConnection,
    session: &Session,
    redemption_id: i64,
) -> Result<redemption::Model> {
    let user = session.require_user()?;

    Redemption::find_by_id(redemption_id)
        .filter(redemption::Column::UserId.eq(user.id.as_str()))
        .one(db)
        .await?
        .ok_or(Error::RedemptionNotFound { id: redemption_id })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::cart::{add_to_cart, get_cart};
    use crate::test_utils::*;
    use sea_orm::ConnectionTrait;

    fn policy() -> RedemptionPolicy {
        RedemptionPolicy::default()
    }

    async fn ledger_rows(db: &DatabaseConnection, user_id: &str) -> Result<Vec<redemption::Model>> {
        Redemption::find()
            .filter(redemption::Column::UserId.eq(user_id))
            .all(db)
            .await
            .map_err(Into::into)
    }

    #[tokio::test]
    async fn test_redeem_success() -> Result<()> {
        let (db, voucher) = setup_with_voucher(200).await?;
        create_test_profile(&db, "u1", 500).await?;

        let outcome = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 200),
            &policy(),
        )
        .await?;

        assert_eq!(outcome.new_balance, 300);
        assert_eq!(outcome.record.points_used, 200);
        assert_eq!(outcome.record.quantity, 1);
        assert_eq!(outcome.record.voucher_title, "Test Voucher");
        assert_eq!(balance_of(&db, "u1").await?, 300);
        assert_eq!(ledger_rows(&db, "u1").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_insufficient_points_changes_nothing() -> Result<()> {
        let (db, voucher) = setup_with_voucher(200).await?;
        create_test_profile(&db, "u1", 150).await?;

        let result = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 200),
            &policy(),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::InsufficientPoints { shortfall: 50 })
        ));
        assert_eq!(balance_of(&db, "u1").await?, 150);
        assert!(ledger_rows(&db, "u1").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_exact_balance_boundary() -> Result<()> {
        let (db, voucher) = setup_with_voucher(100).await?;
        create_test_profile(&db, "short", 99).await?;
        create_test_profile(&db, "exact", 100).await?;

        let short = redeem(
            &db,
            &session_for("short"),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await;
        assert!(matches!(
            short,
            Err(Error::InsufficientPoints { shortfall: 1 })
        ));
        assert_eq!(balance_of(&db, "short").await?, 99);

        let exact = redeem(
            &db,
            &session_for("exact"),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await?;
        assert_eq!(exact.new_balance, 0);
        assert_eq!(balance_of(&db, "exact").await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_sequence_matches_ledger() -> Result<()> {
        let db = setup_test_db().await?;
        let small = create_test_voucher(&db, "Small", 70).await?;
        let large = create_test_voucher(&db, "Large", 180).await?;
        create_test_profile(&db, "u1", 1_000).await?;
        let session = session_for("u1");

        let attempts = [
            RedeemRequest::single(small.id, 70),
            RedeemRequest::single(large.id, 180).with_quantity(3),
            RedeemRequest::single(large.id, 180).with_quantity(2),
            RedeemRequest::single(small.id, 70).with_quantity(2),
            RedeemRequest::single(small.id, 70).with_quantity(5),
        ];
        for request in attempts {
            // Some of these run out of points; that must leave no trace
            let _ = redeem(&db, &session, request, &policy()).await;
            assert!(balance_of(&db, "u1").await? >= 0);
        }

        let spent: i64 = ledger_rows(&db, "u1")
            .await?
            .iter()
            .map(|r| r.points_used)
            .sum();
        assert_eq!(balance_of(&db, "u1").await?, 1_000 - spent);
        assert_eq!(spent, 70 + 540 + 360);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_charges_per_unit() -> Result<()> {
        let (db, voucher) = setup_with_voucher(150).await?;
        create_test_profile(&db, "u1", 1_000).await?;

        let outcome = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 150).with_quantity(3),
            &policy(),
        )
        .await?;

        assert_eq!(outcome.record.points_used, 450);
        assert_eq!(outcome.record.quantity, 3);
        assert_eq!(outcome.new_balance, 550);

        Ok(())
    }

    #[tokio::test]
    async fn test_ledger_failure_rolls_back_deduction() -> Result<()> {
        let (db, voucher) = setup_with_voucher(200).await?;
        create_test_profile(&db, "u1", 500).await?;
        db.execute_unprepared(
            "CREATE TRIGGER reject_redemptions BEFORE INSERT ON redemptions \
             BEGIN SELECT RAISE(ABORT, 'ledger offline'); END;",
        )
        .await?;

        let result = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 200),
            &policy(),
        )
        .await;

        assert!(matches!(result, Err(Error::RedemptionRecordFailed { .. })));
        assert_eq!(balance_of(&db, "u1").await?, 500);
        assert!(ledger_rows(&db, "u1").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_balance_write_stops_redemption() -> Result<()> {
        let (db, voucher) = setup_with_voucher(200).await?;
        create_test_profile(&db, "u1", 500).await?;
        db.execute_unprepared(
            "CREATE TRIGGER freeze_balances BEFORE UPDATE ON profiles \
             BEGIN SELECT RAISE(ABORT, 'balance locked'); END;",
        )
        .await?;

        let result = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 200),
            &policy(),
        )
        .await;

        assert!(matches!(result, Err(Error::BalanceUpdateFailed { .. })));
        assert_eq!(balance_of(&db, "u1").await?, 500);
        assert!(ledger_rows(&db, "u1").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_rejects_stale_price() -> Result<()> {
        let (db, voucher) = setup_with_voucher(200).await?;
        create_test_profile(&db, "u1", 500).await?;

        let result = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 50),
            &policy(),
        )
        .await;

        assert!(matches!(
            result,
            Err(Error::PriceChanged {
                quoted: 50,
                current: 200
            })
        ));
        assert_eq!(balance_of(&db, "u1").await?, 500);

        // Without a quote the stored price is charged
        let outcome = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest {
                voucher_id: voucher.id,
                quoted_points: None,
                quantity: 1,
            },
            &policy(),
        )
        .await?;
        assert_eq!(outcome.record.points_used, 200);

        Ok(())
    }

    #[tokio::test]
    async fn test_redeem_failure_modes() -> Result<()> {
        let (db, voucher) = setup_with_voucher(100).await?;
        create_test_profile(&db, "u1", 500).await?;

        let anonymous = redeem(
            &db,
            &Session::anonymous(),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await;
        assert!(matches!(anonymous, Err(Error::Unauthenticated)));

        let no_profile = redeem(
            &db,
            &session_for("ghost"),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await;
        assert!(matches!(no_profile, Err(Error::ProfileNotFound { .. })));

        let zero = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 100).with_quantity(0),
            &policy(),
        )
        .await;
        assert!(matches!(zero, Err(Error::Validation { .. })));

        let too_many = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 100).with_quantity(11),
            &policy(),
        )
        .await;
        assert!(matches!(too_many, Err(Error::Validation { .. })));

        let missing = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(999, 100),
            &policy(),
        )
        .await;
        assert!(matches!(missing, Err(Error::VoucherNotFound { .. })));

        assert_eq!(balance_of(&db, "u1").await?, 500);
        Ok(())
    }

    #[tokio::test]
    async fn test_hidden_voucher_cannot_be_redeemed() -> Result<()> {
        let (db, voucher) = setup_with_voucher(100).await?;
        create_test_profile(&db, "u1", 500).await?;
        hide_voucher(&db, voucher.id).await?;

        let result = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await;
        assert!(matches!(result, Err(Error::VoucherUnavailable { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_stock_untouched_unless_enforced() -> Result<()> {
        let (db, voucher) = setup_with_voucher(100).await?;
        set_stock(&db, voucher.id, 1).await?;
        create_test_profile(&db, "u1", 1_000).await?;
        let session = session_for("u1");

        redeem(&db, &session, RedeemRequest::single(voucher.id, 100).with_quantity(2), &policy())
            .await?;
        let unchanged = crate::core::voucher::get_voucher_by_id(&db, voucher.id)
            .await?
            .unwrap();
        assert_eq!(unchanged.stock, 1);

        let enforcing = RedemptionPolicy {
            enforce_stock: true,
            ..RedemptionPolicy::default()
        };
        let short = redeem(
            &db,
            &session,
            RedeemRequest::single(voucher.id, 100).with_quantity(2),
            &enforcing,
        )
        .await;
        assert!(matches!(
            short,
            Err(Error::OutOfStock { available: 1, .. })
        ));
        assert_eq!(balance_of(&db, "u1").await?, 800);

        redeem(&db, &session, RedeemRequest::single(voucher.id, 100), &enforcing).await?;
        let drained = crate::core::voucher::get_voucher_by_id(&db, voucher.id)
            .await?
            .unwrap();
        assert_eq!(drained.stock, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_redemptions_cannot_overspend() -> Result<()> {
        let (db, voucher) = setup_with_voucher(300).await?;
        create_test_profile(&db, "u1", 500).await?;
        let session = session_for("u1");
        let request = RedeemRequest::single(voucher.id, 300);
        let rules = policy();

        let (first, second) = tokio::join!(
            redeem(&db, &session, request, &rules),
            redeem(&db, &session, request, &rules),
        );

        let successes = [first.is_ok(), second.is_ok()]
            .iter()
            .filter(|ok| **ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(balance_of(&db, "u1").await?, 200);
        assert_eq!(ledger_rows(&db, "u1").await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_guarded_deduction_refuses_when_balance_moved() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_profile(&db, "u1", 500).await?;

        let txn = db.begin().await?;
        let checked = load_profile(&txn, "u1").await?.total_points;
        assert!(checked >= 300);

        // Another spend lands after the balance check
        Profile::update_many()
            .col_expr(
                profile_entity::Column::TotalPoints,
                Expr::col(profile_entity::Column::TotalPoints).sub(400),
            )
            .filter(profile_entity::Column::UserId.eq("u1"))
            .exec(&txn)
            .await?;

        let result = charge_points(&txn, "u1", 300).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientPoints { shortfall: 200 })
        ));
        assert_eq!(load_profile(&txn, "u1").await?.total_points, 100);
        drop(txn);

        assert_eq!(balance_of(&db, "u1").await?, 500);
        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_cart() -> Result<()> {
        let db = setup_test_db().await?;
        let coffee = create_test_voucher(&db, "Coffee", 100).await?;
        let movie = create_test_voucher(&db, "Movie", 250).await?;
        create_test_profile(&db, "u1", 1_000).await?;
        let session = session_for("u1");

        add_to_cart(&db, &session, coffee.id, 2, &policy()).await?;
        add_to_cart(&db, &session, movie.id, 1, &policy()).await?;

        let checkout = checkout_cart(&db, &session, &policy()).await?;

        assert_eq!(checkout.total_points, 450);
        assert_eq!(checkout.new_balance, 550);
        assert_eq!(checkout.records.len(), 2);
        assert_eq!(checkout.records[0].points_used, 200);
        assert_eq!(checkout.records[1].points_used, 250);
        assert!(get_cart(&db, &session).await?.is_empty());
        assert_eq!(balance_of(&db, "u1").await?, 550);

        let again = checkout_cart(&db, &session, &policy()).await;
        assert!(matches!(again, Err(Error::CartEmpty)));

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_is_all_or_nothing() -> Result<()> {
        let db = setup_test_db().await?;
        let coffee = create_test_voucher(&db, "Coffee", 100).await?;
        let movie = create_test_voucher(&db, "Movie", 250).await?;
        create_test_profile(&db, "u1", 300).await?;
        let session = session_for("u1");

        add_to_cart(&db, &session, coffee.id, 1, &policy()).await?;
        add_to_cart(&db, &session, movie.id, 1, &policy()).await?;

        let result = checkout_cart(&db, &session, &policy()).await;
        assert!(matches!(
            result,
            Err(Error::InsufficientPoints { shortfall: 50 })
        ));
        assert_eq!(balance_of(&db, "u1").await?, 300);
        assert_eq!(get_cart(&db, &session).await?.len(), 2);
        assert!(ledger_rows(&db, "u1").await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_redemption_history_is_private() -> Result<()> {
        let (db, voucher) = setup_with_voucher(100).await?;
        create_test_profile(&db, "u1", 500).await?;
        create_test_profile(&db, "u2", 500).await?;

        let first = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await?;
        let second = redeem(
            &db,
            &session_for("u1"),
            RedeemRequest::single(voucher.id, 100),
            &policy(),
        )
        .await?;

        let history = list_redemptions(&db, &session_for("u1")).await?;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, second.record.id);
        assert!(list_redemptions(&db, &session_for("u2")).await?.is_empty());

        let own = get_redemption(&db, &session_for("u1"), first.record.id).await?;
        assert_eq!(own, first.record);

        let other = get_redemption(&db, &session_for("u2"), first.record.id).await;
        assert!(matches!(other, Err(Error::RedemptionNotFound { .. })));

        Ok(())
    }
}
