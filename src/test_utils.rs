//! Shared test utilities for Optima Bank.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        profile,
        session::{Session, SessionUser},
        voucher::{self, NewVoucher, VoucherChanges},
    },
    entities,
    errors::{Error, Result},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// A signed-in session for `user_id`.
pub fn session_for(user_id: &str) -> Session {
    Session::signed_in(SessionUser::new(user_id))
}

/// Creates a profile and sets its balance directly, bypassing the workflows.
pub async fn create_test_profile(
    db: &DatabaseConnection,
    user_id: &str,
    total_points: i64,
) -> Result<entities::profile::Model> {
    let created = profile::create_profile(db, user_id.to_string(), None, None).await?;
    let mut active: entities::profile::ActiveModel = created.into();
    active.total_points = Set(total_points);
    active.update(db).await.map_err(Into::into)
}

/// Creates a profile with admin rights and a zero balance.
pub async fn create_test_admin(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<entities::profile::Model> {
    profile::create_profile(db, user_id.to_string(), None, None).await?;
    profile::set_admin(db, user_id, true).await
}

/// Current balance straight from the store.
pub async fn balance_of(db: &DatabaseConnection, user_id: &str) -> Result<i64> {
    profile::get_profile(db, user_id)
        .await?
        .map(|p| p.total_points)
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })
}

/// Creates a visible, uncategorised voucher with a stock of 100.
pub async fn create_test_voucher(
    db: &DatabaseConnection,
    title: &str,
    points: i64,
) -> Result<entities::voucher::Model> {
    voucher::create_voucher(
        db,
        NewVoucher {
            title: title.to_string(),
            description: format!("{title} description"),
            points,
            stock: 100,
            ..Default::default()
        },
    )
    .await
}

/// Creates a visible voucher in a category.
pub async fn create_categorised_voucher(
    db: &DatabaseConnection,
    title: &str,
    points: i64,
    category_id: i64,
) -> Result<entities::voucher::Model> {
    voucher::create_voucher(
        db,
        NewVoucher {
            title: title.to_string(),
            description: format!("{title} description"),
            points,
            category_id: Some(category_id),
            stock: 100,
            ..Default::default()
        },
    )
    .await
}

/// Marks a voucher hidden.
pub async fn hide_voucher(db: &DatabaseConnection, voucher_id: i64) -> Result<()> {
    voucher::update_voucher(
        db,
        voucher_id,
        VoucherChanges {
            is_hidden: Some(true),
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

/// Overwrites a voucher's stock.
pub async fn set_stock(db: &DatabaseConnection, voucher_id: i64, stock: i64) -> Result<()> {
    voucher::update_voucher(
        db,
        voucher_id,
        VoucherChanges {
            stock: Some(stock),
            ..Default::default()
        },
    )
    .await?;
    Ok(())
}

/// Sets up a test database with one voucher titled "Test Voucher".
/// Returns (db, voucher) for common test scenarios.
pub async fn setup_with_voucher(
    points: i64,
) -> Result<(DatabaseConnection, entities::voucher::Model)> {
    let db = setup_test_db().await?;
    let voucher = create_test_voucher(&db, "Test Voucher", points).await?;
    Ok((db, voucher))
}
