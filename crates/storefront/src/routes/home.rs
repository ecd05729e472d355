//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::Layout;
use super::menu::ProductCardView;
use crate::filters;
use crate::middleware::OptionalAuth;
use crate::state::AppState;

/// Category shortcut shown on the home page.
#[derive(Debug, Clone)]
pub struct CategoryCardView {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryCardView>,
    pub offers: Vec<ProductCardView>,
}

/// Display the home page: category shortcuts and the offers carousel.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalAuth(user): OptionalAuth,
) -> HomeTemplate {
    let (categories, products) =
        tokio::join!(state.api().list_categories(), state.api().list_products());

    let categories = match categories {
        Ok(categories) => categories
            .iter()
            .map(|c| CategoryCardView {
                id: c.id.as_i32(),
                name: c.name.clone(),
                image_url: c.url.clone(),
            })
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch categories: {e}");
            Vec::new()
        }
    };

    let offers = match products {
        Ok(products) => products
            .iter()
            .filter(|p| p.offer)
            .map(ProductCardView::from)
            .collect(),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            Vec::new()
        }
    };

    HomeTemplate {
        layout: Layout::load(&session, user.as_ref()).await,
        categories,
        offers,
    }
}
