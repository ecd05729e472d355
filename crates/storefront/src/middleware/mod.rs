//! Request middleware.
//!
//! Outermost first, as `app()` stacks them: Sentry hub and transaction,
//! `TraceLayer` span, request id, session, then security headers closest to
//! the handler so every response carries them.
//!
//! Rate limiting is not global: [`auth_rate_limiter`] wraps the login and
//! signup posts and [`api_rate_limiter`] the cart and checkout routes.

pub mod auth;
pub mod rate_limit;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{OptionalAuth, RequireAuth, clear_current_user, set_current_user};
pub use rate_limit::{api_rate_limiter, auth_rate_limiter};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{create_session_layer, set_flash, take_flash};
