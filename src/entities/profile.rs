//! Profile entity - One row per signed-in user holding the point balance.
//!
//! `user_id` is the identifier issued by the auth provider (the Discord user ID
//! for the bot surface). `total_points` never goes below zero in committed state.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// Unique identifier for the profile row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Auth provider user ID
    #[sea_orm(unique)]
    pub user_id: String,
    /// Contact email, when the auth provider exposes one
    pub email: Option<String>,
    /// Name shown on receipts
    pub display_name: Option<String>,
    /// Current point balance
    pub total_points: i64,
    /// Whether this user may use the admin surface
    pub is_admin: bool,
    /// When the profile was created
    pub created_at: DateTimeUtc,
}

/// `Profile` has no foreign keys; other tables reference it by `user_id`.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
