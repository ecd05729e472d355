//! Category management route handlers.

use askama::Template;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use devburger_api::ApiError;
use devburger_core::{Category, FieldErrors, Flash};
use tower_sessions::Session;
use tracing::instrument;

use super::layout::AdminLayout;
use super::{render, session_expired};
use crate::error::Result;
use crate::forms::CategoryForm;
use crate::{filters, middleware::RequireAdminAuth, middleware::set_flash, state::AppState};

pub const CATEGORY_CREATED: &str = "Categoria criada com sucesso";
pub const CATEGORY_CREATE_FAILED: &str = "Falha ao adicionar a categoria";

/// Category row view.
#[derive(Debug, Clone)]
pub struct CategoryRowView {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
}

impl From<&Category> for CategoryRowView {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.as_i32(),
            name: category.name.clone(),
            image_url: category.url.clone(),
        }
    }
}

/// Categories list page template.
#[derive(Template)]
#[template(path = "categories/index.html")]
pub struct CategoriesIndexTemplate {
    pub layout: AdminLayout,
    pub categories: Vec<CategoryRowView>,
    pub load_failed: bool,
}

/// New category form template.
#[derive(Template)]
#[template(path = "categories/new.html")]
pub struct NewCategoryTemplate {
    pub layout: AdminLayout,
    pub name: String,
    pub errors: FieldErrors,
}

/// Categories list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
) -> Response {
    let (categories, load_failed) = match state.api().list_categories().await {
        Ok(categories) => (categories.iter().map(CategoryRowView::from).collect(), false),
        Err(e) => {
            tracing::error!("Failed to fetch categories: {e}");
            (Vec::new(), true)
        }
    };

    render(&CategoriesIndexTemplate {
        layout: AdminLayout::load(&session, &admin, "/categories").await,
        categories,
        load_failed,
    })
    .into_response()
}

/// Empty new-category form.
pub async fn new(RequireAdminAuth(admin): RequireAdminAuth, session: Session) -> Response {
    render(&NewCategoryTemplate {
        layout: AdminLayout::load(&session, &admin, "/categories").await,
        name: String::new(),
        errors: FieldErrors::new(),
    })
    .into_response()
}

/// Create a category.
#[instrument(skip(admin, state, session, multipart))]
pub async fn create(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<Response> {
    let form = CategoryForm::from_multipart(multipart).await?;

    let rerender = |errors: FieldErrors, flash: Option<Flash>| {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            render(&NewCategoryTemplate {
                layout: AdminLayout::new(&admin, "/categories", flash),
                name: form.name.clone(),
                errors,
            }),
        )
            .into_response()
    };

    let payload = match form.validate() {
        Ok(payload) => payload,
        Err(errors) => return Ok(rerender(errors, None)),
    };

    match state.api().create_category(&admin.token, payload).await {
        Ok(()) => {
            tracing::info!(name = %form.name, "Category created");
            set_flash(&session, Flash::success(CATEGORY_CREATED)).await;
            Ok(Redirect::to("/categories").into_response())
        }
        Err(ApiError::Unauthorized) => Ok(session_expired(&session).await),
        Err(e) => {
            tracing::error!("Failed to create category: {e}");
            Ok(rerender(
                FieldErrors::new(),
                Some(Flash::error(CATEGORY_CREATE_FAILED)),
            ))
        }
    }
}
