//! What the admin session stores.

/// The API user behind the session. Only users with `admin` set are stored.
pub use devburger_api::SessionUser as CurrentAdmin;

pub mod keys {
    pub const CURRENT_ADMIN: &str = "current_admin";
    pub const FLASH: &str = "flash";
}
