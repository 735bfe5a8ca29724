//! Database configuration module for Optima Bank.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the schema always matches the Rust structs. The composite unique indexes that keep
//! one cart row and one wishlist row per `(user_id, voucher_id)` are added on top.

use crate::entities::{
    CartItem, Category, PointsAudit, Profile, Redemption, Voucher, WishlistItem, cart_item,
    wishlist_item,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Establishes a connection to the database at `database_url`.
///
/// # Errors
/// Returns an error if the connection cannot be established.
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    Database::connect(database_url).await.map_err(Into::into)
}

/// Creates all necessary database tables using `SeaORM`'s schema generation from entity definitions.
///
/// Safe to call on every start: tables and indexes are created only when missing.
///
/// # Errors
/// Returns an error if any DDL statement fails.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    // Referenced tables first
    let mut tables = vec![
        schema.create_table_from_entity(Category),
        schema.create_table_from_entity(Voucher),
        schema.create_table_from_entity(Profile),
        schema.create_table_from_entity(CartItem),
        schema.create_table_from_entity(WishlistItem),
        schema.create_table_from_entity(Redemption),
        schema.create_table_from_entity(PointsAudit),
    ];

    for table in &mut tables {
        db.execute(builder.build(table.if_not_exists())).await?;
    }

    let cart_unique = Index::create()
        .name("idx_cart_items_user_voucher")
        .table(CartItem)
        .col(cart_item::Column::UserId)
        .col(cart_item::Column::VoucherId)
        .unique()
        .if_not_exists()
        .to_owned();
    let wishlist_unique = Index::create()
        .name("idx_wishlist_items_user_voucher")
        .table(WishlistItem)
        .col(wishlist_item::Column::UserId)
        .col(wishlist_item::Column::VoucherId)
        .unique()
        .if_not_exists()
        .to_owned();

    db.execute(builder.build(&cart_unique)).await?;
    db.execute(builder.build(&wishlist_unique)).await?;

    info!("Database schema is up to date");
    Ok(())
}
