//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to /orders
//!
//! # Orders
//! GET  /orders                 - Order table, optional ?status=<filter id>
//! POST /orders/{id}/status     - Change an order's status
//!
//! # Products (multipart forms)
//! GET  /products               - Product listing
//! GET  /products/new           - New product form
//! POST /products               - Create product
//! GET  /products/{id}/edit     - Edit product form
//! POST /products/{id}          - Save product
//!
//! # Categories (multipart forms)
//! GET  /categories             - Category listing
//! GET  /categories/new         - New category form
//! POST /categories             - Create category
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action (admins only)
//! POST /auth/logout            - Logout action
//! ```

pub mod auth;
pub mod categories;
pub mod layout;
pub mod orders;
pub mod products;

use askama::Template;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use devburger_core::Flash;
use tower_sessions::Session;

use crate::middleware::{clear_current_admin, set_flash};
use crate::state::AppState;

/// Upload size cap for catalog forms.
const UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

pub const SESSION_EXPIRED: &str = "Sua sessão expirou, faça login novamente";

/// Render a template, logging failures instead of panicking.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// The API rejected the stored token: drop the admin and send them to login.
pub async fn session_expired(session: &Session) -> Response {
    tracing::info!("API token rejected, ending admin session");
    if let Err(e) = clear_current_admin(session).await {
        tracing::error!("Failed to clear session: {e}");
    }
    set_flash(session, Flash::error(SESSION_EXPIRED)).await;
    Redirect::to("/auth/login").into_response()
}

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/orders") }))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/auth", auth_routes())
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/new", get(products::new))
        .route("/{id}/edit", get(products::edit))
        .route("/{id}", post(products::update))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::index).post(categories::create))
        .route("/new", get(categories::new))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}
