//! Admin business logic - point adjustments and catalog management.
//!
//! Every function here starts with [`session::require_admin`], which re-reads the
//! caller's profile, so revoking admin rights takes effect on the next call.
//! Input validation runs before any store access.

use crate::{
    core::{
        category, profile,
        session::{self, Session},
        voucher::{self, NewVoucher, VoucherChanges},
    },
    entities::{
        PointsAudit, category as category_entity, points_audit, profile as profile_entity,
        voucher as voucher_entity,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// A committed balance adjustment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsAdjustment {
    /// Balance before the adjustment
    pub previous_balance: i64,
    /// Balance written (never negative)
    pub new_balance: i64,
    /// The audit row committed with the change
    pub audit: points_audit::Model,
}

fn require_signed_in(session: &Session) -> Result<()> {
    session.current_user().map(|_| ()).ok_or(Error::Unauthorized)
}

/// Applies a signed `delta` to a user's balance, clamped at zero, and records why.
///
/// The balance write and the audit entry commit in the same transaction, so an
/// adjustment never exists without its audit trail.
///
/// # Errors
/// - [`Error::Unauthorized`] when nobody is signed in
/// - [`Error::Validation`] for a zero delta, blank reason or blank user ID
/// - [`Error::Forbidden`] when the caller is not an admin
/// - [`Error::ProfileNotFound`] when the target has no profile
/// - [`Error::BalanceUpdateFailed`] if the store rejects the write
pub async fn adjust_user_points(
    db: &DatabaseConnection,
    session: &Session,
    target_user_id: &str,
    delta: i64,
    reason: &str,
) -> Result<PointsAdjustment> {
    require_signed_in(session)?;
    if delta == 0 {
        return Err(Error::validation("Point adjustment cannot be zero"));
    }
    if reason.trim().is_empty() {
        return Err(Error::validation("A reason is required for point adjustments"));
    }
    if target_user_id.trim().is_empty() {
        return Err(Error::validation("Target user ID cannot be empty"));
    }

    let admin = session::require_admin(db, session).await?;

    let txn = db.begin().await?;

    let target = profile::get_profile(&txn, target_user_id.trim())
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: target_user_id.to_string(),
        })?;

    let previous_balance = target.total_points;
    let new_balance = previous_balance.saturating_add(delta).max(0);

    let mut active: profile_entity::ActiveModel = target.into();
    active.total_points = Set(new_balance);
    let updated = active
        .update(&txn)
        .await
        .map_err(|e| Error::BalanceUpdateFailed {
            reason: e.to_string(),
        })?;

    let audit = points_audit::ActiveModel {
        user_id: Set(updated.user_id.clone()),
        delta: Set(delta),
        reason: Set(reason.trim().to_string()),
        admin_id: Set(admin.user_id.clone()),
        balance_after: Set(new_balance),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        admin_id = %admin.user_id,
        user_id = %updated.user_id,
        delta,
        previous_balance,
        new_balance,
        "Points adjusted"
    );

    Ok(PointsAdjustment {
        previous_balance,
        new_balance,
        audit,
    })
}

/// Audit entries, newest first, optionally for one user.
///
/// # Errors
/// Authorization failures as in [`adjust_user_points`], or a database error.
pub async fn list_audit_entries(
    db: &DatabaseConnection,
    session: &Session,
    user_id: Option<&str>,
) -> Result<Vec<points_audit::Model>> {
    require_signed_in(session)?;
    session::require_admin(db, session).await?;

    let mut query = PointsAudit::find();
    if let Some(user_id) = user_id {
        query = query.filter(points_audit::Column::UserId.eq(user_id));
    }

    query
        .order_by_desc(points_audit::Column::CreatedAt)
        .order_by_desc(points_audit::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Every profile with its balance.
///
/// # Errors
/// Authorization failures, or a database error.
pub async fn list_profiles(
    db: &DatabaseConnection,
    session: &Session,
) -> Result<Vec<profile_entity::Model>> {
    require_signed_in(session)?;
    session::require_admin(db, session).await?;
    profile::get_all_profiles(db).await
}

/// Creates a voucher.
///
/// # Errors
/// Authorization failures, or anything [`voucher::create_voucher`] rejects.
pub async fn add_voucher(
    db: &DatabaseConnection,
    session: &Session,
    new: NewVoucher,
) -> Result<voucher_entity::Model> {
    require_signed_in(session)?;
    let admin = session::require_admin(db, session).await?;
    let created = voucher::create_voucher(db, new).await?;
    info!(admin_id = %admin.user_id, voucher_id = created.id, title = %created.title, "Voucher created");
    Ok(created)
}

/// Edits a voucher.
///
/// # Errors
/// Authorization failures, or anything [`voucher::update_voucher`] rejects.
pub async fn edit_voucher(
    db: &DatabaseConnection,
    session: &Session,
    voucher_id: i64,
    changes: VoucherChanges,
) -> Result<voucher_entity::Model> {
    require_signed_in(session)?;
    let admin = session::require_admin(db, session).await?;
    let updated = voucher::update_voucher(db, voucher_id, changes).await?;
    info!(admin_id = %admin.user_id, voucher_id, "Voucher edited");
    Ok(updated)
}

/// Shows or hides a voucher.
///
/// # Errors
/// Authorization failures, or [`Error::VoucherNotFound`].
pub async fn set_voucher_hidden(
    db: &DatabaseConnection,
    session: &Session,
    voucher_id: i64,
    is_hidden: bool,
) -> Result<voucher_entity::Model> {
    edit_voucher(
        db,
        session,
        voucher_id,
        VoucherChanges {
            is_hidden: Some(is_hidden),
            ..Default::default()
        },
    )
    .await
}

/// Deletes a voucher.
///
/// # Errors
/// Authorization failures, or [`Error::VoucherNotFound`].
pub async fn remove_voucher(
    db: &DatabaseConnection,
    session: &Session,
    voucher_id: i64,
) -> Result<()> {
    require_signed_in(session)?;
    let admin = session::require_admin(db, session).await?;
    voucher::delete_voucher(db, voucher_id).await?;
    info!(admin_id = %admin.user_id, voucher_id, "Voucher deleted");
    Ok(())
}

/// Creates a category.
///
/// # Errors
/// Authorization failures, or anything [`category::create_category`] rejects.
pub async fn add_category(
    db: &DatabaseConnection,
    session: &Session,
    name: String,
) -> Result<category_entity::Model> {
    require_signed_in(session)?;
    if name.trim().is_empty() {
        return Err(Error::validation("Category name cannot be empty"));
    }
    session::require_admin(db, session).await?;
    category::create_category(db, name).await
}

/// Deletes a category; its vouchers become uncategorised.
///
/// # Errors
/// Authorization failures, or [`Error::CategoryNotFound`].
pub async fn remove_category(
    db: &DatabaseConnection,
    session: &Session,
    category_id: i64,
) -> Result<()> {
    require_signed_in(session)?;
    session::require_admin(db, session).await?;
    category::delete_category(db, category_id).await
}
