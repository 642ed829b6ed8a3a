//! Shopping cart arithmetic.
//!
//! The storefront keeps a [`Cart`] of bare lines (product id + quantity) in
//! the session and resolves them against the catalog at render time into
//! [`CartItem`]s. Totals are always computed from resolved items so the
//! current sale price applies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId};

/// One line of a persisted cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// The cart as stored in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// Adding zero units is a no-op.
    pub fn add(&mut self, product_id: &ProductId, quantity: u32) {
        if quantity == 0 {
            return;
        }

        match self.lines.iter_mut().find(|l| l.product_id == *product_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product_id.clone(),
                quantity,
            }),
        }
    }

    /// Add up to `quantity` units without letting the line exceed `limit`.
    ///
    /// Returns the number of units actually added.
    pub fn add_up_to(&mut self, product_id: &ProductId, quantity: u32, limit: u32) -> u32 {
        let room = limit.saturating_sub(self.quantity_of(product_id));
        let added = quantity.min(room);
        self.add(product_id, added);
        added
    }

    /// Set the quantity of an existing line.
    ///
    /// Negative quantities clamp to zero and a zero quantity removes the
    /// line. Unknown products are ignored.
    pub fn update_quantity(&mut self, product_id: &ProductId, quantity: i64) {
        let quantity = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == *product_id) {
            line.quantity = quantity;
        }
        self.lines.retain(|l| l.quantity > 0);
    }

    /// Remove a line. Returns whether the product was in the cart.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != *product_id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == *product_id)
            .map_or(0, |l| l.quantity)
    }

    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.lines.iter().map(|l| l.product_id.clone()).collect()
    }

    /// Pair each line with its product.
    ///
    /// Lines whose product no longer exists are dropped. Order follows the
    /// cart, not `products`.
    #[must_use]
    pub fn resolve(&self, products: &[Product]) -> Vec<CartItem> {
        self.lines
            .iter()
            .filter_map(|line| {
                products
                    .iter()
                    .find(|p| p.id == line.product_id)
                    .map(|product| CartItem {
                        product: product.clone(),
                        quantity: line.quantity,
                    })
            })
            .collect()
    }
}

/// A cart line joined with its product.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    /// Effective unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product.effective_price() * Decimal::from(self.quantity)
    }
}

/// Order summary for a set of cart items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub item_count: u32,
}

impl CartTotals {
    /// Flat shipping charge, in dollars.
    pub const FLAT_SHIPPING: Decimal = Decimal::from_parts(1500, 0, 0, false, 2);

    /// Shipping is only charged on a non-empty cart.
    #[must_use]
    pub fn for_items(items: &[CartItem]) -> Self {
        let subtotal: Decimal = items.iter().map(CartItem::line_total).sum();
        let item_count = items
            .iter()
            .fold(0u32, |acc, i| acc.saturating_add(i.quantity));
        let shipping = if items.is_empty() {
            Decimal::ZERO
        } else {
            Self::FLAT_SHIPPING
        };

        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count,
        }
    }

    #[must_use]
    pub fn subtotal_display(&self) -> String {
        Price::usd(self.subtotal).display()
    }

    #[must_use]
    pub fn shipping_display(&self) -> String {
        Price::usd(self.shipping).display()
    }

    #[must_use]
    pub fn total_display(&self) -> String {
        Price::usd(self.total).display()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CategoryId;

    fn product(id: &str, price: Decimal, sale_price: Option<Decimal>) -> Product {
        Product {
            id: ProductId::new(id),
            name: id.to_uppercase(),
            description: String::new(),
            price,
            sale_price,
            category: CategoryId::new("audio"),
            brand: None,
            stock: 10,
            images: Vec::new(),
            rating: 0.0,
            reviews: 0,
            tags: Vec::new(),
            featured: false,
        }
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = Cart::new();
        let id = ProductId::new("prod1");
        cart.add(&id, 2);
        cart.add(&id, 3);
        cart.add(&ProductId::new("prod2"), 1);

        assert_eq!(cart.lines.len(), 2);
        assert_eq!(cart.quantity_of(&id), 5);
        assert_eq!(cart.item_count(), 6);
    }

    #[test]
    fn test_add_up_to_caps_line_at_limit() {
        let mut cart = Cart::new();
        let id = ProductId::new("prod8");

        assert_eq!(cart.add_up_to(&id, 500, 12), 12);
        assert_eq!(cart.quantity_of(&id), 12);
        assert_eq!(cart.add_up_to(&id, 1, 12), 0);
        assert_eq!(cart.lines.len(), 1);

        let empty = ProductId::new("ghost");
        assert_eq!(cart.add_up_to(&empty, 3, 0), 0);
        assert_eq!(cart.quantity_of(&empty), 0);
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_add_zero_is_noop() {
        let mut cart = Cart::new();
        cart.add(&ProductId::new("prod1"), 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_removing_last_unit_removes_line() {
        let mut cart = Cart::new();
        let id = ProductId::new("prod1");
        cart.add(&id, 1);
        cart.update_quantity(&id, 0);
        assert!(cart.is_empty());

        cart.add(&id, 2);
        cart.update_quantity(&id, -4);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_ignores_unknown_product() {
        let mut cart = Cart::new();
        cart.add(&ProductId::new("prod1"), 1);
        cart.update_quantity(&ProductId::new("missing"), 5);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_remove_reports_presence() {
        let mut cart = Cart::new();
        let id = ProductId::new("prod1");
        cart.add(&id, 1);
        assert!(cart.remove(&id));
        assert!(!cart.remove(&id));
    }

    #[test]
    fn test_resolve_drops_missing_products() {
        let mut cart = Cart::new();
        cart.add(&ProductId::new("prod2"), 1);
        cart.add(&ProductId::new("gone"), 1);
        cart.add(&ProductId::new("prod1"), 2);

        let products = vec![
            product("prod1", Decimal::new(10, 0), None),
            product("prod2", Decimal::new(20, 0), None),
        ];
        let items = cart.resolve(&products);
        let ids: Vec<&str> = items.iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, vec!["prod2", "prod1"]);
    }

    #[test]
    fn test_subtotal_uses_effective_price() {
        let items = vec![
            CartItem {
                product: product("prod2", Decimal::new(349, 0), Some(Decimal::new(299, 0))),
                quantity: 2,
            },
            CartItem {
                product: product("prod3", Decimal::new(6999, 2), None),
                quantity: 1,
            },
        ];
        let totals = CartTotals::for_items(&items);

        assert_eq!(totals.subtotal, Decimal::new(66799, 2));
        assert_eq!(totals.shipping, Decimal::new(15, 0));
        assert_eq!(totals.total, Decimal::new(68299, 2));
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.total_display(), "$682.99");
    }

    #[test]
    fn test_empty_cart_has_no_shipping() {
        let totals = CartTotals::for_items(&[]);
        assert_eq!(totals.subtotal, Decimal::ZERO);
        assert_eq!(totals.shipping, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
    }

    #[test]
    fn test_cart_session_shape() {
        let mut cart = Cart::new();
        cart.add(&ProductId::new("prod1"), 2);
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "lines": [{ "product_id": "prod1", "quantity": 2 }] })
        );
    }
}
