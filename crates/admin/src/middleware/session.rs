//! Admin sessions.
//!
//! In-memory like the storefront's, but `SameSite=Strict` and a one-day idle
//! timeout. A restart signs every admin out.

use devburger_core::Flash;
use tower_sessions::{
    Expiry, MemoryStore, Session, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

use crate::config::AdminConfig;
use crate::models::session_keys;

pub const SESSION_COOKIE_NAME: &str = "devburger_admin_session";

/// Admins sign in again after a day away.
const IDLE_TIMEOUT: Duration = Duration::days(1);

#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_TIMEOUT))
        .with_same_site(SameSite::Strict)
        .with_secure(config.is_secure())
        .with_http_only(true)
}

/// Queue a one-shot message for the next page this session renders.
pub async fn set_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::error!("Failed to store flash message: {e}");
    }
}

/// The pending flash, removed from the session as it is read.
pub async fn take_flash(session: &Session) -> Option<Flash> {
    match session.remove::<Flash>(session_keys::FLASH).await {
        Ok(flash) => flash,
        Err(e) => {
            tracing::warn!("Unreadable flash message: {e}");
            None
        }
    }
}
