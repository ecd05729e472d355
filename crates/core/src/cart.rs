//! Shopping cart held in the storefront session.
//!
//! The cart stores a snapshot of each product (name, price, image) taken when
//! it was added, so rendering the cart never needs an API round-trip. Prices
//! are re-validated by the API when the order is placed.

use serde::{Deserialize, Serialize};

use crate::types::{OrderLineRequest, OrderRequest, Price, Product, ProductId};

/// Flat delivery fee charged on every non-empty cart.
pub const DELIVERY_FEE: Price = Price::from_cents(500);

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub image_url: Option<String>,
    /// Always at least 1; a line that would drop to 0 is removed instead.
    pub quantity: u32,
}

impl CartLine {
    /// `unit_price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// Session cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add one unit of `product`, merging with an existing line.
    pub fn add(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.saturating_add(1);
            return;
        }

        self.lines.push(CartLine {
            product_id: product.id,
            name: product.name.clone(),
            unit_price: product.price,
            image_url: product.url.clone(),
            quantity: 1,
        });
    }

    /// Add one unit of a product already in the cart.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn increase(&mut self, product_id: ProductId) -> bool {
        self.line_mut(product_id).is_some_and(|line| {
            line.quantity = line.quantity.saturating_add(1);
            true
        })
    }

    /// Remove one unit; the line disappears when its last unit goes.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn decrease(&mut self, product_id: ProductId) -> bool {
        let Some(index) = self.position(product_id) else {
            return false;
        };

        match self.lines.get_mut(index) {
            Some(line) if line.quantity > 1 => line.quantity -= 1,
            _ => {
                self.lines.remove(index);
            }
        }
        true
    }

    /// Remove a line entirely.
    ///
    /// Returns `false` if the product is not in the cart.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// [`DELIVERY_FEE`] for a non-empty cart, zero otherwise.
    #[must_use]
    pub fn delivery_fee(&self) -> Price {
        if self.is_empty() {
            Price::ZERO
        } else {
            DELIVERY_FEE
        }
    }

    /// Subtotal plus delivery.
    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal() + self.delivery_fee()
    }

    /// Body for `POST /orders`.
    #[must_use]
    pub fn to_order_request(&self) -> OrderRequest {
        OrderRequest {
            products: self
                .lines
                .iter()
                .map(|line| OrderLineRequest {
                    id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.product_id == product_id)
    }

    fn line_mut(&mut self, product_id: ProductId) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::types::CategoryId;

    fn product(id: i32, cents: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Produto {id}"),
            price: Price::from_cents(cents),
            category_id: CategoryId::new(1),
            category: None,
            path: None,
            url: Some(format!("http://api/product-file/{id}.png")),
            offer: false,
        }
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2500));
        cart.add(&product(2, 800));
        cart.add(&product(1, 2500));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_decrease_removes_at_one() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2500));
        cart.add(&product(1, 2500));

        assert!(cart.decrease(ProductId::new(1)));
        assert_eq!(cart.lines()[0].quantity, 1);

        assert!(cart.decrease(ProductId::new(1)));
        assert!(cart.is_empty());

        assert!(!cart.decrease(ProductId::new(1)));
    }

    #[test]
    fn test_increase_and_remove() {
        let mut cart = Cart::new();
        assert!(!cart.increase(ProductId::new(5)));

        cart.add(&product(5, 1000));
        assert!(cart.increase(ProductId::new(5)));
        assert_eq!(cart.item_count(), 2);

        assert!(cart.remove(ProductId::new(5)));
        assert!(!cart.remove(ProductId::new(5)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals_include_delivery_only_when_non_empty() {
        let mut cart = Cart::new();
        assert_eq!(cart.total(), Price::ZERO);

        cart.add(&product(1, 2500));
        cart.add(&product(1, 2500));
        cart.add(&product(2, 800));

        assert_eq!(cart.subtotal(), Price::from_cents(5800));
        assert_eq!(cart.delivery_fee(), DELIVERY_FEE);
        assert_eq!(cart.total(), Price::from_cents(6300));
    }

    #[test]
    fn test_order_request() {
        let mut cart = Cart::new();
        cart.add(&product(3, 100));
        cart.add(&product(3, 100));
        cart.add(&product(7, 100));

        let request = cart.to_order_request();
        assert_eq!(
            request.products,
            vec![
                OrderLineRequest {
                    id: ProductId::new(3),
                    quantity: 2
                },
                OrderLineRequest {
                    id: ProductId::new(7),
                    quantity: 1
                },
            ]
        );
    }

    #[test]
    fn test_session_roundtrip() {
        let mut cart = Cart::new();
        cart.add(&product(1, 2500));
        let json = serde_json::to_value(&cart).unwrap();
        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }
}
