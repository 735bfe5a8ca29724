//! Session handling - who is calling a workflow.
//!
//! The auth provider hands us at most one signed-in user per interaction.
//! User-scoped workflows call [`Session::require_user`]; admin workflows call
//! [`require_admin`], which re-reads the caller's own profile every time instead
//! of trusting anything cached on the session.

use crate::{
    core::profile,
    entities::profile as profile_entity,
    errors::{Error, Result},
};
use sea_orm::ConnectionTrait;

/// Identity reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    /// Auth provider user ID
    pub id: String,
    /// Email address, when known
    pub email: Option<String>,
}

impl SessionUser {
    /// Creates a user with no email.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }
}

/// The caller of a workflow: signed in or anonymous.
#[derive(Debug, Clone, Default)]
pub struct Session {
    user: Option<SessionUser>,
}

impl Session {
    /// A session with nobody signed in.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user: None }
    }

    /// A session for `user`.
    #[must_use]
    pub const fn signed_in(user: SessionUser) -> Self {
        Self { user: Some(user) }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    /// The signed-in user, or [`Error::Unauthenticated`].
    ///
    /// # Errors
    /// Returns [`Error::Unauthenticated`] for an anonymous session.
    pub fn require_user(&self) -> Result<&SessionUser> {
        self.current_user().ok_or(Error::Unauthenticated)
    }
}

/// Confirms the caller is a signed-in administrator and returns their profile.
///
/// # Errors
/// - [`Error::Unauthorized`] when nobody is signed in
/// - [`Error::Forbidden`] when the caller has no profile or is not an admin
/// - [`Error::Database`] if the profile lookup fails
pub async fn require_admin<C>(db: &C, session: &Session) -> Result<profile_entity::Model>
where
    C: ConnectionTrait,
{
    let user = session.current_user().ok_or(Error::Unauthorized)?;

    let caller = profile::get_profile(db, &user.id)
        .await?
        .ok_or(Error::Forbidden)?;

    if !caller.is_admin {
        tracing::warn!(user_id = %user.id, "Non-admin attempted an admin operation");
        return Err(Error::Forbidden);
    }

    Ok(caller)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_anonymous_session_is_unauthenticated() {
        let session = Session::anonymous();
        assert!(session.current_user().is_none());
        assert!(matches!(session.require_user(), Err(Error::Unauthenticated)));
    }

    #[test]
    fn test_signed_in_session_returns_user() -> Result<()> {
        let session = Session::signed_in(SessionUser::new("u1"));
        assert_eq!(session.require_user()?.id, "u1");
        Ok(())
    }

    #[tokio::test]
    async fn test_require_admin_checks() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_profile(&db, "member", 0).await?;
        create_test_admin(&db, "boss").await?;

        let result = require_admin(&db, &Session::anonymous()).await;
        assert!(matches!(result, Err(Error::Unauthorized)));

        let result = require_admin(&db, &session_for("member")).await;
        assert!(matches!(result, Err(Error::Forbidden)));

        let result = require_admin(&db, &session_for("stranger")).await;
        assert!(matches!(result, Err(Error::Forbidden)));

        let admin = require_admin(&db, &session_for("boss")).await?;
        assert_eq!(admin.user_id, "boss");
        Ok(())
    }
}
