//! The session cart.
//!
//! Mutations posted by `static/js/app.js` carry [`FRAGMENT_HEADER`] and get
//! back the HTML to swap in, tagged with a [`EVENT_HEADER`] so the script
//! refreshes the badge. Plain form posts get a redirect instead.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use devburger_core::{Cart, CartLine, Flash, ProductId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Layout;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{OptionalAuth, set_flash};
use crate::models::session_keys;
use crate::state::AppState;

const ADD_FAILED: &str = "Falha ao adicionar o produto ao carrinho";

/// Request header set by the page script when it wants a fragment back.
pub const FRAGMENT_HEADER: &str = "x-fragment";
pub const EVENT_HEADER: &str = "x-event";
const CART_UPDATED: (&str, &str) = (EVENT_HEADER, "cart-updated");

/// One cart line, formatted for display.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub product_id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.as_i32(),
            name: line.name.clone(),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.display(),
            line_total: line.line_total().display(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub delivery_fee: String,
    pub total: String,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartItemView::from).collect(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal().display(),
            delivery_fee: cart.delivery_fee().display(),
            total: cart.total().display(),
        }
    }
}

/// The session cart; a missing or unreadable one is empty.
pub async fn load_cart(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            tracing::warn!("Unreadable cart, starting over: {e}");
            Cart::new()
        }
    }
}

/// Write the cart back to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

fn wants_fragment(headers: &HeaderMap) -> bool {
    headers.contains_key(FRAGMENT_HEADER)
}

/// Form body for every cart mutation.
#[derive(Debug, Deserialize)]
pub struct CartProductForm {
    pub product_id: i32,
}

#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub layout: Layout,
    pub cart: CartView,
}

/// The `#cart-items` block, swapped in after a mutation.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// The `#cart-count` badge.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

#[instrument(skip(session, user))]
pub async fn show(session: Session, OptionalAuth(user): OptionalAuth) -> CartShowTemplate {
    let cart = load_cart(&session).await;

    CartShowTemplate {
        layout: Layout::load(&session, user.as_ref()).await,
        cart: CartView::from(&cart),
    }
}

/// Add one unit of a product.
///
/// The product is looked up in the (cached) catalog so the cart stores the
/// current name, price and image.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response> {
    let product = match state.api().find_product(ProductId::new(form.product_id)).await {
        Ok(Some(product)) => product,
        Ok(None) => {
            tracing::warn!(product_id = form.product_id, "Add to cart for unknown product");
            return Err(AppError::NotFound(format!("product {}", form.product_id)));
        }
        Err(e) if wants_fragment(&headers) => return Err(e.into()),
        Err(e) => {
            tracing::error!("Failed to look up product for cart: {e}");
            set_flash(&session, Flash::error(ADD_FAILED)).await;
            return Ok(Redirect::to("/menu").into_response());
        }
    };

    let mut cart = load_cart(&session).await;
    cart.add(&product);
    save_cart(&session, &cart).await?;

    if wants_fragment(&headers) {
        return Ok((
            AppendHeaders([CART_UPDATED]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response());
    }

    set_flash(&session, Flash::success(format!("{} adicionado ao carrinho", product.name))).await;
    Ok(Redirect::to("/menu").into_response())
}

/// Add one more unit of a product already in the cart.
#[instrument(skip(session, headers))]
pub async fn increase(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response> {
    mutate(&session, &headers, |cart| {
        cart.increase(ProductId::new(form.product_id))
    })
    .await
}

/// Remove one unit; the line disappears when its last unit goes.
#[instrument(skip(session, headers))]
pub async fn decrease(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response> {
    mutate(&session, &headers, |cart| {
        cart.decrease(ProductId::new(form.product_id))
    })
    .await
}

/// Remove a line entirely.
#[instrument(skip(session, headers))]
pub async fn remove(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartProductForm>,
) -> Result<Response> {
    mutate(&session, &headers, |cart| {
        cart.remove(ProductId::new(form.product_id))
    })
    .await
}

#[instrument(skip(session))]
pub async fn count(session: Session) -> CartCountTemplate {
    CartCountTemplate {
        count: load_cart(&session).await.item_count(),
    }
}

/// Apply `op` to the session cart and answer with the refreshed items.
async fn mutate(
    session: &Session,
    headers: &HeaderMap,
    op: impl FnOnce(&mut Cart) -> bool,
) -> Result<Response> {
    let mut cart = load_cart(session).await;

    if op(&mut cart) {
        save_cart(session, &cart).await?;
    } else {
        tracing::debug!("Cart mutation for product not in cart");
    }

    if wants_fragment(headers) {
        return Ok((
            AppendHeaders([CART_UPDATED]),
            CartItemsTemplate {
                cart: CartView::from(&cart),
            },
        )
            .into_response());
    }

    Ok(Redirect::to("/cart").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use devburger_core::{CategoryId, Price, Product};

    use super::*;

    #[test]
    fn test_cart_view_totals() {
        let mut cart = Cart::new();
        let burger = Product {
            id: ProductId::new(1),
            name: "X-Bacon".to_string(),
            price: Price::from_cents(2990),
            category_id: CategoryId::new(1),
            category: None,
            path: None,
            url: None,
            offer: false,
        };
        cart.add(&burger);
        cart.add(&burger);

        let view = CartView::from(&cart);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].line_total, "R$ 59,80");
        assert_eq!(view.subtotal, "R$ 59,80");
        assert_eq!(view.delivery_fee, "R$ 5,00");
        assert_eq!(view.total, "R$ 64,80");
    }

    #[test]
    fn test_fragment_requests_are_detected() {
        let mut headers = HeaderMap::new();
        assert!(!wants_fragment(&headers));
        headers.insert(FRAGMENT_HEADER, "1".parse().unwrap());
        assert!(wants_fragment(&headers));
    }

    #[test]
    fn test_empty_cart_view_has_no_fee() {
        let view = CartView::from(&Cart::new());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.delivery_fee, "R$ 0,00");
        assert_eq!(view.total, "R$ 0,00");
    }
}
