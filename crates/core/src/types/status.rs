//! Order status and the admin status filter.
//!
//! Order statuses travel over the wire as human-readable strings. The known
//! values are modelled as variants; anything else the API sends is preserved
//! verbatim in [`OrderStatus::Other`] so an unexpected status never breaks
//! deserialization of the whole order list.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::order::Order;

/// Order progress status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// Order placed by the customer.
    Placed,
    /// Kitchen is preparing the order.
    Preparing,
    /// Ready for pickup by the courier.
    Ready,
    /// Out for delivery.
    OnTheWay,
    /// Delivered to the customer.
    Delivered,
    /// A status string this build does not know about.
    Other(String),
}

impl OrderStatus {
    /// Every known status, in workflow order.
    pub const KNOWN: [Self; 5] = [
        Self::Placed,
        Self::Preparing,
        Self::Ready,
        Self::OnTheWay,
        Self::Delivered,
    ];

    /// The wire/display label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Placed => "Pedido realizado",
            Self::Preparing => "Pedido em preparação",
            Self::Ready => "Pedido pronto",
            Self::OnTheWay => "Pedido a caminho",
            Self::Delivered => "Pedido entregue",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(s: String) -> Self {
        Self::KNOWN
            .into_iter()
            .find(|known| known.as_str() == s)
            .unwrap_or(Self::Other(s))
    }
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the hardcoded filter buttons on the orders page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOption {
    /// Stable numeric id used in the `?status=` query parameter.
    pub id: u8,
    /// Button label.
    pub label: String,
    /// What the button filters by.
    pub filter: StatusFilter,
}

/// Status filter applied to the order list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Show every order.
    #[default]
    All,
    /// Show only orders in this status.
    Only(OrderStatus),
}

impl StatusFilter {
    /// Label of the "show everything" button.
    pub const ALL_LABEL: &'static str = "Todos";

    /// The fixed set of filter buttons, "all" first.
    #[must_use]
    pub fn options() -> Vec<StatusOption> {
        let mut options = vec![StatusOption {
            id: 0,
            label: Self::ALL_LABEL.to_string(),
            filter: Self::All,
        }];

        options.extend((1u8..).zip(OrderStatus::KNOWN).map(|(id, status)| StatusOption {
            id,
            label: status.as_str().to_string(),
            filter: Self::Only(status),
        }));
        options
    }

    /// Resolve a filter button id. Unknown ids fall back to [`StatusFilter::All`].
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        Self::options()
            .into_iter()
            .find(|opt| opt.id == id)
            .map_or(Self::All, |opt| opt.filter)
    }

    /// The button id for this filter.
    #[must_use]
    pub fn id(&self) -> u8 {
        Self::options()
            .into_iter()
            .find(|opt| &opt.filter == self)
            .map_or(0, |opt| opt.id)
    }

    /// Whether an order passes this filter.
    #[must_use]
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => &order.status == status,
        }
    }

    /// Filter the full, unfiltered order list.
    ///
    /// Always re-scans `orders` from the start; the result keeps the input
    /// order. [`StatusFilter::All`] returns every order.
    #[must_use]
    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders
            .iter()
            .filter(|order| self.matches(order))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::id::{OrderId, UserId};
    use crate::types::order::OrderUser;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: OrderId::new(id),
            user: OrderUser {
                id: UserId::new("u-1"),
                name: "Ana".to_string(),
            },
            products: vec![],
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn sample() -> Vec<Order> {
        vec![
            order("a", OrderStatus::Placed),
            order("b", OrderStatus::Delivered),
            order("c", OrderStatus::Placed),
            order("d", OrderStatus::Other("Cancelado".to_string())),
        ]
    }

    #[test]
    fn test_status_wire_roundtrip() {
        let status: OrderStatus = serde_json::from_str("\"Pedido pronto\"").unwrap();
        assert_eq!(status, OrderStatus::Ready);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Pedido pronto\"");
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: OrderStatus = serde_json::from_str("\"Cancelado\"").unwrap();
        assert_eq!(status, OrderStatus::Other("Cancelado".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Cancelado\"");
    }

    #[test]
    fn test_options_are_fixed() {
        let options = StatusFilter::options();
        assert_eq!(options.len(), 6);
        assert_eq!(options[0].label, "Todos");
        assert_eq!(options[0].filter, StatusFilter::All);
        assert_eq!(options[1].filter, StatusFilter::Only(OrderStatus::Placed));
        assert_eq!(options[5].label, "Pedido entregue");
    }

    #[test]
    fn test_option_labels_are_the_status_strings() {
        for option in StatusFilter::options().into_iter().skip(1) {
            let StatusFilter::Only(status) = &option.filter else {
                panic!("only the first option shows everything");
            };
            assert_eq!(option.label, status.as_str());
        }
    }

    #[test]
    fn test_from_id() {
        assert_eq!(StatusFilter::from_id(0), StatusFilter::All);
        assert_eq!(
            StatusFilter::from_id(3),
            StatusFilter::Only(OrderStatus::Ready)
        );
        assert_eq!(StatusFilter::from_id(42), StatusFilter::All);
        assert_eq!(StatusFilter::Only(OrderStatus::OnTheWay).id(), 4);
    }

    #[test]
    fn test_filter_returns_only_matching() {
        let orders = sample();
        let filtered = StatusFilter::Only(OrderStatus::Placed).apply(&orders);
        let ids: Vec<&str> = filtered.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_filter_with_no_matches() {
        let orders = sample();
        assert!(StatusFilter::Only(OrderStatus::Preparing).apply(&orders).is_empty());
    }

    #[test]
    fn test_all_restores_original_set() {
        let orders = sample();
        let narrowed = StatusFilter::Only(OrderStatus::Delivered).apply(&orders);
        assert_eq!(narrowed.len(), 1);

        // Filtering always starts again from the backup list
        let restored = StatusFilter::All.apply(&orders);
        assert_eq!(restored, orders);
    }
}
