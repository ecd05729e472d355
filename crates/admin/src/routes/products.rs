//! Product management route handlers.
//!
//! New and edit share one form template. Both submit multipart bodies that
//! are validated locally before anything is sent to the API; a failed
//! submission re-renders the form with the admin's input.

use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use devburger_api::ApiError;
use devburger_core::{Category, FieldErrors, Flash, Product, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::AdminLayout;
use super::{render, session_expired};
use crate::error::Result;
use crate::forms::ProductForm;
use crate::{filters, middleware::RequireAdminAuth, middleware::set_flash, state::AppState};

pub const PRODUCT_CREATED: &str = "Produto criado com sucesso";
pub const PRODUCT_CREATE_FAILED: &str = "Falha ao adicionar o produto";
pub const PRODUCT_UPDATED: &str = "Produto editado com sucesso";
pub const PRODUCT_UPDATE_FAILED: &str = "Falha ao editar o produto, tente novamente";

/// `Refresh` header sent after a successful edit.
pub const REFRESH_TO_LIST: &str = "2; url=/products";

/// Product row view for the list page.
#[derive(Debug, Clone)]
pub struct ProductRowView {
    pub id: i32,
    pub name: String,
    pub price: String,
    pub category: String,
    pub image_url: Option<String>,
    pub offer: bool,
}

impl From<&Product> for ProductRowView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.as_i32(),
            name: product.name.clone(),
            price: product.price.display(),
            category: product.category_name().unwrap_or_default().to_string(),
            image_url: product.url.clone(),
            offer: product.offer,
        }
    }
}

/// Category `<option>` view.
#[derive(Debug, Clone)]
pub struct CategoryOptionView {
    pub id: i32,
    pub name: String,
    pub selected: bool,
}

/// Category options with `selected` preselected.
#[must_use]
pub fn category_options(categories: &[Category], selected: Option<i32>) -> Vec<CategoryOptionView> {
    categories
        .iter()
        .map(|c| CategoryOptionView {
            id: c.id.as_i32(),
            name: c.name.clone(),
            selected: Some(c.id.as_i32()) == selected,
        })
        .collect()
}

/// Products list page template.
#[derive(Template)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub layout: AdminLayout,
    pub products: Vec<ProductRowView>,
    pub load_failed: bool,
}

/// New/edit product form template.
#[derive(Template)]
#[template(path = "products/form.html")]
pub struct ProductFormTemplate {
    pub layout: AdminLayout,
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub categories: Vec<CategoryOptionView>,
    pub name: String,
    pub price: String,
    pub offer: bool,
    pub image_required: bool,
    pub current_image: Option<String>,
    pub errors: FieldErrors,
}

/// Which form is being rendered.
#[derive(Debug, Clone, Copy)]
enum FormMode {
    New,
    Edit(ProductId),
}

impl FormMode {
    const fn heading(self) -> &'static str {
        match self {
            Self::New => "Novo produto",
            Self::Edit(_) => "Editar produto",
        }
    }

    const fn submit_label(self) -> &'static str {
        match self {
            Self::New => "Adicionar Produto",
            Self::Edit(_) => "Editar Produto",
        }
    }

    fn action(self) -> String {
        match self {
            Self::New => "/products".to_string(),
            Self::Edit(id) => format!("/products/{id}"),
        }
    }
}

/// Build the form template from raw form values.
fn form_template(
    layout: AdminLayout,
    mode: FormMode,
    categories: &[Category],
    form: &ProductForm,
    current_image: Option<String>,
    errors: FieldErrors,
) -> ProductFormTemplate {
    ProductFormTemplate {
        layout,
        heading: mode.heading(),
        action: mode.action(),
        submit_label: mode.submit_label(),
        categories: category_options(categories, form.selected_category()),
        name: form.name.clone(),
        price: form.price.clone(),
        offer: form.offer,
        image_required: matches!(mode, FormMode::New),
        current_image,
        errors,
    }
}

/// Fetch categories for the dropdown; an outage leaves it empty.
async fn load_categories(state: &AppState) -> Vec<Category> {
    state.api().list_categories().await.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch categories: {e}");
        Vec::new()
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// Products list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let (products, load_failed) = match state.api().list_products().await {
        Ok(products) => (products.iter().map(ProductRowView::from).collect(), false),
        Err(e) => {
            tracing::error!("Failed to fetch products: {e}");
            (Vec::new(), true)
        }
    };

    render(&ProductsIndexTemplate {
        layout: AdminLayout::load(&session, &admin, "/products").await,
        products,
        load_failed,
    })
    .into_response()
}

/// Empty new-product form.
#[instrument(skip(admin, state, session))]
pub async fn new(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let categories = load_categories(&state).await;
    let layout = AdminLayout::load(&session, &admin, "/products").await;

    render(&form_template(
        layout,
        FormMode::New,
        &categories,
        &ProductForm::default(),
        None,
        FieldErrors::new(),
    ))
    .into_response()
}

/// Create a product.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form = ProductForm::from_multipart(multipart).await?;

    let rerender = async |errors: FieldErrors, flash: Option<Flash>| {
        let categories = load_categories(&state).await;
        let layout = AdminLayout::new(&admin, "/products", flash);
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            render(&form_template(layout, FormMode::New, &categories, &form, None, errors)),
        )
            .into_response()
    };

    let payload = match form.validate(true) {
        Ok(payload) => payload,
        Err(errors) => return Ok(rerender(errors, None).await),
    };

    match state.api().create_product(&admin.token, payload).await {
        Ok(()) => {
            tracing::info!(name = %form.name, "Product created");
            set_flash(&session, Flash::success(PRODUCT_CREATED)).await;
            Ok(Redirect::to("/products").into_response())
        }
        Err(ApiError::Unauthorized) => Ok(session_expired(&session).await),
        Err(e) => {
            tracing::error!("Failed to create product: {e}");
            Ok(rerender(FieldErrors::new(), Some(Flash::error(PRODUCT_CREATE_FAILED))).await)
        }
    }
}

/// Edit form, prefilled from the product list.
///
/// Unknown product ids go back to the list.
#[instrument(skip(admin, state, session))]
pub async fn edit(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Response {
    let id = ProductId::new(id);

    let (product, categories) =
        tokio::join!(state.api().find_product(id), load_categories(&state));

    let product = match product {
        Ok(Some(product)) => product,
        Ok(None) => {
            tracing::info!(product_id = %id, "Edit requested for unknown product");
            return Redirect::to("/products").into_response();
        }
        Err(e) => {
            tracing::error!("Failed to fetch product: {e}");
            set_flash(&session, Flash::error("Falha ao carregar o produto")).await;
            return Redirect::to("/products").into_response();
        }
    };

    let layout = AdminLayout::load(&session, &admin, "/products").await;

    render(&form_template(
        layout,
        FormMode::Edit(id),
        &categories,
        &ProductForm::from_product(&product),
        product.url.clone(),
        FieldErrors::new(),
    ))
    .into_response()
}

/// Save an edited product.
///
/// On success the confirmation is shown on this response and the browser
/// moves to the product list two seconds later.
#[instrument(skip(admin, state, session, multipart))]
pub async fn update(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response> {
    let id = ProductId::new(id);
    let form = ProductForm::from_multipart(multipart).await?;

    let page = async |status: StatusCode, errors: FieldErrors, flash: Option<Flash>| {
        let categories = load_categories(&state).await;
        let layout = AdminLayout::new(&admin, "/products", flash);
        (
            status,
            render(&form_template(
                layout,
                FormMode::Edit(id),
                &categories,
                &form,
                None,
                errors,
            )),
        )
    };

    let payload = match form.validate(false) {
        Ok(payload) => payload,
        Err(errors) => {
            return Ok(page(StatusCode::UNPROCESSABLE_ENTITY, errors, None)
                .await
                .into_response());
        }
    };

    match state.api().update_product(&admin.token, id, payload).await {
        Ok(_) => {
            tracing::info!(product_id = %id, "Product updated");
            let (status, body) = page(
                StatusCode::OK,
                FieldErrors::new(),
                Some(Flash::success(PRODUCT_UPDATED)),
            )
            .await;
            Ok((
                status,
                [(header::REFRESH, HeaderValue::from_static(REFRESH_TO_LIST))],
                body,
            )
                .into_response())
        }
        Err(ApiError::Unauthorized) => Ok(session_expired(&session).await),
        Err(e) => {
            tracing::error!(product_id = %id, "Failed to update product: {e}");
            Ok(page(
                StatusCode::BAD_GATEWAY,
                FieldErrors::new(),
                Some(Flash::error(PRODUCT_UPDATE_FAILED)),
            )
            .await
            .into_response())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use devburger_core::{CategoryId, CategoryRef, Price};

    use super::*;

    #[test]
    fn test_row_view() {
        let product = Product {
            id: ProductId::new(4),
            name: "Batata frita".to_string(),
            price: Price::from_cents(1290),
            category_id: CategoryId::new(2),
            category: Some(CategoryRef {
                id: CategoryId::new(2),
                name: "Acompanhamentos".to_string(),
            }),
            path: Some("batata.png".to_string()),
            url: Some("http://localhost:3333/product-file/batata.png".to_string()),
            offer: true,
        };

        let row = ProductRowView::from(&product);
        assert_eq!(row.price, "R$ 12,90");
        assert_eq!(row.category, "Acompanhamentos");
        assert!(row.offer);
    }

    #[test]
    fn test_current_category_is_preselected() {
        let categories = vec![
            Category {
                id: CategoryId::new(1),
                name: "Hambúrgueres".to_string(),
                path: None,
                url: None,
            },
            Category {
                id: CategoryId::new(2),
                name: "Bebidas".to_string(),
                path: None,
                url: None,
            },
        ];

        let options = category_options(&categories, Some(2));
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert!(category_options(&categories, None).iter().all(|o| !o.selected));
    }

    #[test]
    fn test_form_actions() {
        assert_eq!(FormMode::New.action(), "/products");
        assert_eq!(FormMode::Edit(ProductId::new(9)).action(), "/products/9");
    }
}
