//! Admin session guard.
//!
//! Pages take [`RequireAdminAuth`] as their first extractor. The session
//! holds the user returned by `POST /sessions`; only users whose `admin`
//! flag is set get through.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentAdmin, session_keys};

/// The signed-in admin.
pub struct RequireAdminAuth(pub CurrentAdmin);

/// Why a request was turned away.
#[derive(Debug)]
pub enum AdminAuthRejection {
    /// Nobody is signed in.
    NotSignedIn,
    /// The router has no session layer.
    NoSession,
    /// A session exists but its user lacks the admin flag.
    NotAnAdmin,
}

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::NotSignedIn => Redirect::to("/auth/login").into_response(),
            Self::NoSession => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            Self::NotAnAdmin => {
                (StatusCode::FORBIDDEN, "Acesso restrito a administradores").into_response()
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdminAuth
where
    S: Send + Sync,
{
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection::NoSession)?;

        match current_admin(session).await {
            Some(admin) if admin.admin => Ok(Self(admin)),
            Some(user) => {
                tracing::warn!(user_id = %user.id, "Non-admin user in admin session");
                Err(AdminAuthRejection::NotAnAdmin)
            }
            None => Err(AdminAuthRejection::NotSignedIn),
        }
    }
}

/// The user stored in the session, if any. Unreadable entries count as none.
pub async fn current_admin(session: &Session) -> Option<CurrentAdmin> {
    session
        .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .inspect_err(|e| tracing::warn!("Unreadable admin session: {e}"))
        .ok()
        .flatten()
}

/// Store the admin after a successful login, under a fresh session id.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Forget the admin (logout or a rejected API token).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
        .await
        .map(|_| ())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use devburger_api::{AuthToken, SessionUser};
    use devburger_core::{Email, UserId};
    use tower_sessions::MemoryStore;

    use super::*;

    fn user(admin: bool) -> SessionUser {
        SessionUser {
            id: UserId::new("u-9"),
            name: "Rodolfo".to_string(),
            email: Email::parse("rodolfo@devburger.com").unwrap(),
            admin,
            token: AuthToken::new("t"),
        }
    }

    async fn extract(stored: Option<SessionUser>) -> Result<RequireAdminAuth, AdminAuthRejection> {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        if let Some(user) = stored {
            session.insert(session_keys::CURRENT_ADMIN, user).await.unwrap();
        }
        let (mut parts, ()) = axum::http::Request::new(()).into_parts();
        parts.extensions.insert(session);
        RequireAdminAuth::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_admin_passes() {
        let RequireAdminAuth(admin) = extract(Some(user(true))).await.unwrap();
        assert_eq!(admin.name, "Rodolfo");
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() {
        assert!(matches!(
            extract(Some(user(false))).await,
            Err(AdminAuthRejection::NotAnAdmin)
        ));
    }

    #[tokio::test]
    async fn test_anonymous_is_sent_to_login() {
        assert!(matches!(
            extract(None).await,
            Err(AdminAuthRejection::NotSignedIn)
        ));
    }
}
