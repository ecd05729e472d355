//! Customer sessions.
//!
//! The in-memory store holds the signed-in customer, the cart and the flash
//! message. A restart empties carts and signs everyone out.

use devburger_core::Flash;
use tower_sessions::{
    Expiry, MemoryStore, Session, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

use crate::config::StorefrontConfig;
use crate::models::session_keys;

pub const SESSION_COOKIE_NAME: &str = "devburger_session";

/// A week without requests drops the cart.
const IDLE_TIMEOUT: Duration = Duration::days(7);

#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(IDLE_TIMEOUT))
        .with_same_site(SameSite::Lax)
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
