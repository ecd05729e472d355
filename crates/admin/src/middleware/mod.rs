//! Request middleware.
//!
//! Outermost first, as `app()` stacks them: Sentry hub and transaction,
//! `TraceLayer` span, request id, session, then security headers closest to
//! the handler so every response carries them.
//!
//! Pages enforce sign-in themselves by taking [`RequireAdminAuth`].

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{RequireAdminAuth, clear_current_admin, set_current_admin};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, set_flash, take_flash};
