//! Voucher entity - A catalog item users can redeem for points.
//!
//! Vouchers are managed by administrators and read-only to everyone else.
//! Hidden vouchers stay in the table but are excluded from browsing and
//! cannot be redeemed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Voucher database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vouchers")]
pub struct Model {
    /// Unique identifier for the voucher
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Title shown in the catalog (e.g., "Coffee for Two")
    #[sea_orm(unique)]
    pub title: String,
    /// Longer description of what the voucher gives
    pub description: String,
    /// Cost per unit in points
    pub points: i64,
    /// Category this voucher is listed under, if any
    pub category_id: Option<i64>,
    /// Inventory shown to users
    pub stock: i64,
    /// Hidden vouchers are not listed and cannot be redeemed
    pub is_hidden: bool,
    /// Image URL for the catalog card
    pub image: Option<String>,
    /// When the voucher was created
    pub created_at: DateTime,
    /// When the voucher was last modified
    pub updated_at: DateTime,
}

/// Defines relationships between Voucher and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each voucher optionally belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_delete = "SetNull"
    )]
    Category,
    /// One voucher appears in many carts
    #[sea_orm(has_many = "super::cart_item::Entity")]
    CartItems,
    /// One voucher appears in many wishlists
    #[sea_orm(has_many = "super::wishlist_item::Entity")]
    WishlistItems,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::cart_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CartItems.def()
    }
}

impl Related<super::wishlist_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WishlistItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
