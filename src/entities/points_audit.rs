//! Points audit entity - Append-only trail of admin balance adjustments.
//!
//! Kept separate from the redemption ledger. `delta` is the change the admin
//! requested; `balance_after` is what was written once clamping at zero applied.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Points audit database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "points_audit")]
pub struct Model {
    /// Unique identifier for the audit entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// User whose balance changed
    pub user_id: String,
    /// Requested signed change
    pub delta: i64,
    /// Mandatory explanation supplied by the admin
    pub reason: String,
    /// Admin who made the change
    pub admin_id: String,
    /// Balance written by the adjustment
    pub balance_after: i64,
    /// When the adjustment was committed
    pub created_at: DateTimeUtc,
}

/// `PointsAudit` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
