//! Menu page route handler.
//!
//! Categories and products are fetched concurrently; the category tabs are
//! prefixed with a synthetic "Todas" tab (id 0) that shows every product.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use devburger_core::{Category, CategoryId, Product};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Layout;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Id of the synthetic "all categories" tab.
pub const ALL_CATEGORIES_ID: i32 = 0;

/// Label of the synthetic "all categories" tab.
pub const ALL_CATEGORIES_LABEL: &str = "Todas";

/// Product card display data for templates.
#[derive(Debug, Clone)]
pub struct ProductCardView {
    pub id: i32,
    pub name: String,
    /// Formatted currency value, e.g. `R$ 25,90`.
    pub price: String,
    pub image_url: Option<String>,
    pub offer: bool,
}

impl From<&Product> for ProductCardView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.display(),
            image_url: product.url.clone(),
            offer: product.offer,
        }
    }
}

/// Category tab display data.
#[derive(Debug, Clone)]
pub struct CategoryTabView {
    pub id: i32,
    pub name: String,
    pub active: bool,
}

/// `?categoria=<id>` query.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub categoria: Option<i32>,
}

/// Category tabs with "Todas" first, marking `active`.
#[must_use]
pub fn category_tabs(categories: &[Category], active: i32) -> Vec<CategoryTabView> {
    std::iter::once((ALL_CATEGORIES_ID, ALL_CATEGORIES_LABEL.to_string()))
        .chain(categories.iter().map(|c| (c.id.as_i32(), c.name.clone())))
        .map(|(id, name)| CategoryTabView {
            id,
            name,
            active: id == active,
        })
        .collect()
}

/// Products in `category`, or all of them for [`ALL_CATEGORIES_ID`].
#[must_use]
pub fn products_in_category(products: &[Product], category: i32) -> Vec<ProductCardView> {
    products
        .iter()
        .filter(|p| category == ALL_CATEGORIES_ID || p.category_id == CategoryId::new(category))
        .map(ProductCardView::from)
        .collect()
}

/// Menu page template.
#[derive(Template, WebTemplate)]
#[template(path = "menu.html")]
pub struct MenuTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryTabView>,
    pub products: Vec<ProductCardView>,
    pub load_failed: bool,
}

/// Display the menu.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
    Query(query): Query<MenuQuery>,
) -> MenuTemplate {
    let active = query.categoria.unwrap_or(ALL_CATEGORIES_ID);

    let (categories, products) =
        tokio::join!(state.api().list_categories(), state.api().list_products());

    let mut load_failed = false;
    let categories = categories.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch categories: {e}");
        load_failed = true;
        Vec::new()
    });
    let products = products.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch products: {e}");
        load_failed = true;
        Vec::new()
    });

    MenuTemplate {
        layout: Layout::load(&session, user.as_ref()).await,
        categories: category_tabs(&categories, active),
        products: products_in_category(&products, active),
        load_failed,
    }
}
