//! Checkout route handler.
//!
//! Turns the session cart into `POST /orders`. The API re-prices every line;
//! the cart only sends product ids and quantities.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use devburger_api::ApiError;
use devburger_core::Flash;
use tower_sessions::Session;
use tracing::instrument;

use super::cart::{load_cart, save_cart};
use crate::error::add_breadcrumb;
use crate::middleware::{RequireAuth, clear_current_user, set_flash};
use crate::state::AppState;

pub const ORDER_PLACED: &str = "Pedido realizado com sucesso";
pub const ORDER_FAILED: &str = "Falha ao realizar o seu pedido, tente novamente";
pub const SESSION_EXPIRED: &str = "Sua sessão expirou, faça login novamente";

/// Place the order for the current cart.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Response {
    let mut cart = load_cart(&session).await;
    if cart.is_empty() {
        return Redirect::to("/cart").into_response();
    }

    let order = cart.to_order_request();
    match state.api().create_order(&user.token, &order).await {
        Ok(()) => {
            tracing::info!(lines = order.products.len(), "Order placed");
            add_breadcrumb(
                "checkout",
                "Order placed",
                &[
                    ("lines", order.products.len().to_string()),
                    ("total", cart.total().display()),
                ],
            );

            cart.clear();
            if let Err(e) = save_cart(&session, &cart).await {
                tracing::error!("Failed to clear cart after checkout: {e}");
            }
            set_flash(&session, Flash::success(ORDER_PLACED)).await;
            Redirect::to("/").into_response()
        }
        Err(ApiError::Unauthorized) => {
            tracing::info!("API token rejected at checkout");
            if let Err(e) = clear_current_user(&session).await {
                tracing::error!("Failed to clear session user: {e}");
            }
            set_flash(&session, Flash::error(SESSION_EXPIRED)).await;
            Redirect::to("/auth/login").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to place order: {e}");
            set_flash(&session, Flash::error(ORDER_FAILED)).await;
            Redirect::to("/cart").into_response()
        }
    }
}
