//! Orders management route handlers.
//!
//! The order list is fetched whole on every page load and filtered locally
//! by the status buttons; the filter id travels in `?status=`.

use askama::Template;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use devburger_api::ApiError;
use devburger_core::{Flash, Order, OrderId, OrderLine, OrderStatus, StatusFilter};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::layout::AdminLayout;
use super::{render, session_expired};
use crate::{filters, middleware::RequireAdminAuth, middleware::set_flash, state::AppState};

pub const STATUS_UPDATED: &str = "Status atualizado com sucesso";
pub const STATUS_UPDATE_FAILED: &str = "Falha ao atualizar o status do pedido";

/// Display format for order timestamps.
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// `?status=<filter id>` query. Kept as text so a mangled id shows every
/// order instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct OrdersQuery {
    pub status: Option<String>,
}

impl OrdersQuery {
    fn filter(&self) -> StatusFilter {
        lenient_filter(self.status.as_deref())
    }
}

/// A filter id typed by hand or carried in a form; garbage means "all".
fn lenient_filter(raw: Option<&str>) -> StatusFilter {
    let id = raw
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or_default();
    StatusFilter::from_id(id)
}

/// Filter button view.
#[derive(Debug, Clone)]
pub struct FilterButtonView {
    pub id: u8,
    pub label: String,
    pub active: bool,
}

/// Status `<option>` view.
#[derive(Debug, Clone)]
pub struct StatusChoiceView {
    pub value: String,
    pub selected: bool,
}

/// Line item view inside an expanded order row.
#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub quantity: u32,
    pub price: String,
    pub image_url: Option<String>,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        Self {
            id: line.id.as_i32(),
            name: line.name.clone(),
            category: line.category.clone().unwrap_or_default(),
            quantity: line.quantity,
            price: line.price.display(),
            image_url: line.url.clone(),
        }
    }
}

/// One row of the orders table.
#[derive(Debug, Clone)]
pub struct OrderRowView {
    pub order_id: String,
    pub customer: String,
    pub date: String,
    pub status: String,
    pub status_choices: Vec<StatusChoiceView>,
    pub total: String,
    pub products: Vec<OrderLineView>,
}

/// Status choices for an order's select box.
///
/// Unknown statuses stay selectable so saving the row never silently
/// rewrites them.
fn status_choices(current: &OrderStatus) -> Vec<StatusChoiceView> {
    let mut choices: Vec<StatusChoiceView> = OrderStatus::KNOWN
        .iter()
        .map(|status| StatusChoiceView {
            value: status.as_str().to_string(),
            selected: status == current,
        })
        .collect();

    if let OrderStatus::Other(raw) = current {
        choices.push(StatusChoiceView {
            value: raw.clone(),
            selected: true,
        });
    }

    choices
}

impl From<&Order> for OrderRowView {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id.as_str().to_string(),
            customer: order.user.name.clone(),
            date: order.created_at.format(DATE_FORMAT).to_string(),
            status: order.status.as_str().to_string(),
            status_choices: status_choices(&order.status),
            total: order.total().display(),
            products: order.products.iter().map(OrderLineView::from).collect(),
        }
    }
}

/// Filter buttons with the active one marked.
#[must_use]
pub fn filter_buttons(active: &StatusFilter) -> Vec<FilterButtonView> {
    StatusFilter::options()
        .into_iter()
        .map(|option| FilterButtonView {
            id: option.id,
            label: option.label,
            active: &option.filter == active,
        })
        .collect()
}

/// Orders list page template.
#[derive(Template)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub layout: AdminLayout,
    pub buttons: Vec<FilterButtonView>,
    pub active_filter: u8,
    pub rows: Vec<OrderRowView>,
    pub load_failed: bool,
}

/// Orders list page handler.
#[instrument(skip(admin, state, session))]
pub async fn index(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OrdersQuery>,
) -> Response {
    let filter = query.filter();

    let (orders, load_failed) = match state.api().list_orders(&admin.token).await {
        Ok(orders) => (orders, false),
        Err(ApiError::Unauthorized) => return session_expired(&session).await,
        Err(e) => {
            tracing::error!("Failed to fetch orders: {e}");
            (Vec::new(), true)
        }
    };

    let rows = filter.apply(&orders).iter().map(OrderRowView::from).collect();

    render(&OrdersIndexTemplate {
        layout: AdminLayout::load(&session, &admin, "/orders").await,
        buttons: filter_buttons(&filter),
        active_filter: filter.id(),
        rows,
        load_failed,
    })
    .into_response()
}

/// Status change form body.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    /// Filter to return to after the update.
    #[serde(default)]
    pub filter: Option<String>,
}

/// Update an order's status, then return to the list with the same filter.
#[instrument(skip(admin, state, session, form), fields(status = %form.status))]
pub async fn update_status(
    RequireAdminAuth(admin): RequireAdminAuth,
    State(state): State<AppState>,
    session: Session,
    Path(order_id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Response {
    let status = OrderStatus::from(form.status);
    let order_id = OrderId::new(order_id);

    match state
        .api()
        .update_order_status(&admin.token, &order_id, &status)
        .await
    {
        Ok(()) => {
            tracing::info!(order_id = %order_id, "Order status updated");
            set_flash(&session, Flash::success(STATUS_UPDATED)).await;
        }
        Err(ApiError::Unauthorized) => return session_expired(&session).await,
        Err(e) => {
            tracing::error!(order_id = %order_id, "Failed to update order status: {e}");
            set_flash(&session, Flash::error(STATUS_UPDATE_FAILED)).await;
        }
    }

    let filter = lenient_filter(form.filter.as_deref());
    Redirect::to(&back_to_list(filter.id())).into_response()
}

/// The orders list URL for a filter id.
#[must_use]
pub fn back_to_list(filter: u8) -> String {
    if filter == 0 {
        "/orders".to_string()
    } else {
        format!("/orders?status={filter}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};
    use devburger_core::{OrderUser, Price, ProductId, UserId};

    use super::*;

    fn order(status: &str) -> Order {
        Order {
            id: OrderId::new("665f1c"),
            user: OrderUser {
                id: UserId::new("u-1"),
                name: "Maria Silva".to_string(),
            },
            products: vec![OrderLine {
                id: ProductId::new(1),
                name: "X-Salada".to_string(),
                price: Price::from_cents(2500),
                category: Some("Hambúrgueres".to_string()),
                url: None,
                quantity: 2,
            }],
            status: OrderStatus::from(status),
            created_at: Utc.with_ymd_and_hms(2024, 11, 3, 19, 45, 0).unwrap(),
        }
    }

    #[test]
    fn test_row_view() {
        let row = OrderRowView::from(&order("Pedido pronto"));
        assert_eq!(row.order_id, "665f1c");
        assert_eq!(row.customer, "Maria Silva");
        assert_eq!(row.date, "03/11/2024 19:45");
        assert_eq!(row.total, "R$ 50,00");
        assert_eq!(row.products[0].quantity, 2);
        let selected: Vec<_> = row.status_choices.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, "Pedido pronto");
    }

    #[test]
    fn test_unparsable_filter_shows_all() {
        for raw in ["abc", "", "999"] {
            let query = OrdersQuery {
                status: Some(raw.to_string()),
            };
            assert_eq!(query.filter().id(), 0);
        }
        let query = OrdersQuery {
            status: Some("2".to_string()),
        };
        assert_eq!(query.filter().id(), 2);
    }

    #[test]
    fn test_unknown_status_stays_selectable() {
        let row = OrderRowView::from(&order("Cancelado"));
        assert_eq!(row.status_choices.len(), 6);
        assert_eq!(row.status_choices[5].value, "Cancelado");
        assert!(row.status_choices[5].selected);
    }

    #[test]
    fn test_active_filter_button() {
        let buttons = filter_buttons(&StatusFilter::from_id(3));
        assert_eq!(buttons.len(), 6);
        assert!(buttons.iter().filter(|b| b.active).all(|b| b.id == 3));
        assert_eq!(buttons.iter().filter(|b| b.active).count(), 1);
    }

    #[test]
    fn test_malformed_form_filter_returns_to_all() {
        assert_eq!(lenient_filter(Some("x1")).id(), 0);
        assert_eq!(lenient_filter(Some(" 5 ")).id(), 5);
        assert_eq!(lenient_filter(None).id(), 0);
    }

    #[test]
    fn test_back_to_list_keeps_filter() {
        assert_eq!(back_to_list(0), "/orders");
        assert_eq!(back_to_list(2), "/orders?status=2");
    }
}
