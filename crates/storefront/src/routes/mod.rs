//! Storefront routes.
//!
//! ```text
//! GET  /                       - Home page (categories, offers)
//! GET  /menu                   - Menu, optional ?categoria=<id>
//!
//! # Cart (fragments for fetch calls, redirects otherwise)
//! GET  /cart                   - Cart page
//! POST /cart/add               - Add one unit (returns cart_count fragment)
//! POST /cart/increase          - +1 unit (returns cart_items fragment)
//! POST /cart/decrease          - -1 unit (returns cart_items fragment)
//! POST /cart/remove            - Drop line (returns cart_items fragment)
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout (requires auth)
//! POST /checkout               - Place order with the DevBurger API
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod layout;
pub mod menu;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Login and signup posts share one per-IP limiter.
fn auth_routes() -> Router<AppState> {
    let limiter = auth_rate_limiter();
    let login = get(auth::login_page).merge(post(auth::login).layer(limiter.clone()));
    let register = get(auth::register_page).merge(post(auth::register).layer(limiter));

    Router::new()
        .route("/login", login)
        .route("/register", register)
        .route("/logout", post(auth::logout))
}

/// Cart mutations and checkout are limited per IP; reads are not.
fn cart_routes() -> Router<AppState> {
    let limiter = api_rate_limiter();

    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add).layer(limiter.clone()))
        .route("/increase", post(cart::increase).layer(limiter.clone()))
        .route("/decrease", post(cart::decrease).layer(limiter.clone()))
        .route("/remove", post(cart::remove).layer(limiter))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/menu", get(menu::show))
        .nest("/cart", cart_routes())
        .route("/checkout", post(checkout::checkout).layer(api_rate_limiter()))
        .nest("/auth", auth_routes())
}
