//! Data every full page needs for the shared header.

use devburger_core::{Cart, Flash};
use tower_sessions::Session;

use crate::middleware::take_flash;
use crate::models::{CurrentUser, session_keys};

/// Header state: who is logged in, cart badge, pending flash message.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub user_name: Option<String>,
    pub cart_count: u32,
    pub flash: Option<Flash>,
}

impl Layout {
    /// Build the header state, consuming any pending flash message.
    pub async fn load(session: &Session, user: Option<&CurrentUser>) -> Self {
        let cart_count = session
            .get::<Cart>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .map_or(0, |cart| cart.item_count());

        Self {
            user_name: user.map(|u| u.name.clone()),
            cart_count,
            flash: take_flash(session).await,
        }
    }
}
