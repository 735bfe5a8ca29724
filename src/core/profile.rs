//! Profile business logic - user records and point balances.
//!
//! Provides functions for creating and retrieving profiles. Balances are only
//! changed by the redemption workflow and by admin adjustments; nothing in this
//! module writes `total_points` after creation.

use crate::{
    config::store::AdminConfig,
    core::session::{Session, SessionUser},
    entities::{Profile, profile},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, prelude::*};

/// Finds the profile for an auth provider user ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_profile<C>(db: &C, user_id: &str) -> Result<Option<profile::Model>>
where
    C: ConnectionTrait,
{
    Profile::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists every profile ordered by user ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn get_all_profiles(db: &DatabaseConnection) -> Result<Vec<profile::Model>> {
    Profile::find()
        .order_by_asc(profile::Column::UserId)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Creates a profile with a zero balance and no admin rights.
///
/// # Errors
/// Returns an error if the user ID is blank or the insert fails (including a
/// duplicate user ID).
pub async fn create_profile(
    db: &DatabaseConnection,
    user_id: String,
    email: Option<String>,
    display_name: Option<String>,
) -> Result<profile::Model> {
    if user_id.trim().is_empty() {
        return Err(Error::validation("User ID cannot be empty"));
    }

    let profile = profile::ActiveModel {
        user_id: Set(user_id.trim().to_string()),
        email: Set(email),
        display_name: Set(display_name),
        total_points: Set(0),
        is_admin: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    profile.insert(db).await.map_err(Into::into)
}

/// Returns the profile for `user`, creating it on first sight.
///
/// Users listed in the admin bootstrap configuration get admin rights when their
/// profile is created. Existing profiles are returned untouched.
///
/// # Errors
/// Returns an error if a query or insert fails.
pub async fn ensure_profile(
    db: &DatabaseConnection,
    user: &SessionUser,
    display_name: Option<String>,
    admins: &AdminConfig,
) -> Result<profile::Model> {
    if let Some(existing) = get_profile(db, &user.id).await? {
        return Ok(existing);
    }

    let created = create_profile(db, user.id.clone(), user.email.clone(), display_name).await?;

    if admins.is_bootstrap_admin(&created.user_id) {
        tracing::info!(user_id = %created.user_id, "Granting bootstrap admin rights");
        return set_admin(db, &created.user_id, true).await;
    }

    tracing::info!(user_id = %created.user_id, "Created profile");
    Ok(created)
}

/// Grants or revokes admin rights.
///
/// # Errors
/// Returns [`Error::ProfileNotFound`] if the user has no profile.
pub async fn set_admin(
    db: &DatabaseConnection,
    user_id: &str,
    is_admin: bool,
) -> Result<profile::Model> {
    let mut profile: profile::ActiveModel = get_profile(db, user_id)
        .await?
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user_id.to_string(),
        })?
        .into();

    profile.is_admin = Set(is_admin);
    profile.update(db).await.map_err(Into::into)
}

/// Current balance of the signed-in user.
///
/// # Errors
/// - [`Error::Unauthenticated`] for an anonymous session
/// - [`Error::ProfileNotFound`] if the user has no profile
pub async fn get_balance(db: &DatabaseConnection, session: &Session) -> Result<i64> {
    let user = session.require_user()?;
    get_profile(db, &user.id)
        .await?
        .map(|p| p.total_points)
        .ok_or_else(|| Error::ProfileNotFound {
            user_id: user.id.clone(),
        })
}
