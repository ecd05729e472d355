//! Customer session extractors.
//!
//! Browsing and the cart work anonymously; only checkout takes
//! [`RequireAuth`]. Pages that greet the customer take [`OptionalAuth`].

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};

/// A signed-in customer.
pub struct RequireAuth(pub CurrentUser);

/// The customer, when someone is signed in.
pub struct OptionalAuth(pub Option<CurrentUser>);

/// Why [`RequireAuth`] turned a request away.
#[derive(Debug)]
pub enum AuthRejection {
    /// Nobody is signed in.
    NotSignedIn,
    /// The router has no session layer.
    NoSession,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotSignedIn => Redirect::to("/auth/login").into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// The customer stored in the session. Unreadable entries count as none.
async fn current_user(session: &Session) -> Option<CurrentUser> {
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .inspect_err(|e| tracing::warn!("Unreadable customer session: {e}"))
        .ok()
        .flatten()
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::NoSession)?;

        current_user(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::NotSignedIn)
    }
}

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = match parts.extensions.get::<Session>() {
            Some(session) => current_user(session).await,
            None => None,
        };
        Ok(Self(user))
    }
}

/// Store the customer after login, under a fresh session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Forget the customer. The cart stays unless the session is flushed.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .map(|_| ())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use devburger_api::AuthToken;
    use devburger_core::{Email, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn parts_with(session: Session) -> Parts {
        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(session);
        parts
    }

    #[tokio::test]
    async fn test_login_and_logout_round_trip() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let user = CurrentUser {
            id: UserId::new("u-1"),
            name: "Maria Silva".to_string(),
            email: Email::parse("maria@devburger.com").unwrap(),
            admin: false,
            token: AuthToken::new("t"),
        };

        set_current_user(&session, &user).await.unwrap();
        let RequireAuth(found) = RequireAuth::from_request_parts(&mut parts_with(session.clone()), &())
            .await
            .unwrap();
        assert_eq!(found, user);

        clear_current_user(&session).await.unwrap();
        let OptionalAuth(found) = OptionalAuth::from_request_parts(&mut parts_with(session.clone()), &())
            .await
            .unwrap();
        assert!(found.is_none());
        assert!(matches!(
            RequireAuth::from_request_parts(&mut parts_with(session), &()).await,
            Err(AuthRejection::NotSignedIn)
        ));
    }
}
