//! Redemption entity - Append-only ledger of points spent on vouchers.
//!
//! Each row is the ground truth that `points_used` points left a balance in
//! exchange for `quantity` units of a voucher. `voucher_title` is a snapshot
//! taken at redemption time so receipts stay readable after catalog edits;
//! for the same reason the ledger does not hold a foreign key to `vouchers`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Redemption database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "redemptions")]
pub struct Model {
    /// Unique identifier for the redemption
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User whose balance was charged
    pub user_id: String,
    /// Voucher that was redeemed
    pub voucher_id: i64,
    /// Voucher title at the time of redemption
    pub voucher_title: String,
    /// Total points charged (`unit price * quantity`)
    pub points_used: i64,
    /// Number of units redeemed
    pub quantity: i32,
    /// When the redemption was committed
    pub redeemed_at: DateTimeUtc,
}

/// Ledger rows stand alone
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
