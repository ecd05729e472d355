//! Session-related types.
//!
//! The storefront has no local database; everything per-visitor lives in the
//! session: the logged-in user (with their API token), the cart, and a
//! one-shot flash message.

/// Session-stored user identity, exactly as `POST /sessions` returned it.
pub use devburger_api::SessionUser as CurrentUser;

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart.
    pub const CART: &str = "cart";

    /// Key for the one-shot flash message.
    pub const FLASH: &str = "flash";
}
