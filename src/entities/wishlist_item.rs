//! Wishlist item entity - A voucher the user wants to keep an eye on.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Wishlist item database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wishlist_items")]
pub struct Model {
    /// Unique identifier for the wishlist row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owner of the wishlist
    pub user_id: String,
    /// Wished-for voucher
    pub voucher_id: i64,
    /// When the voucher was added
    pub added_at: DateTimeUtc,
}

/// Defines relationships between `WishlistItem` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::voucher::Entity",
        from = "Column::VoucherId",
        to = "super::voucher::Column::Id",
        on_delete = "Cascade"
    )]
    Voucher,
}

impl Related<super::voucher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Voucher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
