//! Cart store.
//!
//! An ordered collection of line items. Adding a product that is already in
//! the cart merges into the existing line instead of creating a second one,
//! and the store never holds a line with a quantity below one: any change
//! that would take a line to zero or less removes it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::Product;
use crate::types::{Price, ProductId};

/// Product snapshot taken at add-to-cart time.
///
/// Later catalog edits do not reach lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: Option<String>,
}

impl From<&Product> for CartProduct {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
        }
    }
}

/// A cart line: one product and the quantity selected for purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: Option<String>,
    /// Always at least 1.
    pub quantity: u32,
}

impl CartItem {
    fn new(product: CartProduct, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            quantity,
        }
    }

    /// Line total (price × quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

/// Outcome of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended.
    Inserted { quantity: u32 },
    /// An existing line's quantity changed.
    Updated { quantity: u32 },
    /// The line reached zero and was dropped.
    Removed,
    /// Nothing happened (non-positive delta for a product not in the cart,
    /// or a zero delta).
    Unchanged,
}

/// The shopper's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add `delta` units of `product`.
    ///
    /// An existing line for the same id has `delta` added to its quantity
    /// (`delta` may be negative). A line whose quantity would fall to zero or
    /// below is removed. A product not yet in the cart is appended with
    /// quantity `delta` when `delta` is positive and ignored otherwise.
    pub fn add_to_cart(&mut self, product: CartProduct, delta: i64) -> CartChange {
        let Some(index) = self.position(&product.id) else {
            if delta <= 0 {
                debug!(product_id = %product.id, delta, "ignoring non-positive add for new line");
                return CartChange::Unchanged;
            }
            let quantity = u32::try_from(delta).unwrap_or(u32::MAX);
            debug!(product_id = %product.id, quantity, "cart line inserted");
            self.items.push(CartItem::new(product, quantity));
            return CartChange::Inserted { quantity };
        };

        self.adjust_at(index, delta)
    }

    /// Increase the quantity of an existing line by one.
    pub fn increment(&mut self, id: &ProductId) -> CartChange {
        self.position(id)
            .map_or(CartChange::Unchanged, |index| self.adjust_at(index, 1))
    }

    /// Decrease the quantity of an existing line by one, removing it when it
    /// was the last unit.
    pub fn decrement(&mut self, id: &ProductId) -> CartChange {
        self.position(id)
            .map_or(CartChange::Unchanged, |index| self.adjust_at(index, -1))
    }

    /// Remove the line with `id`. Returns whether a line was removed.
    pub fn remove_from_cart(&mut self, id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        let removed = self.items.len() != before;
        if removed {
            debug!(product_id = %id, "cart line removed");
        }
        removed
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        debug!(lines = self.items.len(), "cart cleared");
        self.items.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of price × quantity over all lines. Never negative.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    fn adjust_at(&mut self, index: usize, delta: i64) -> CartChange {
        if delta == 0 {
            return CartChange::Unchanged;
        }

        let Some(item) = self.items.get_mut(index) else {
            return CartChange::Unchanged;
        };

        let next = i64::from(item.quantity).saturating_add(delta);
        if next <= 0 {
            let removed = self.items.remove(index);
            debug!(product_id = %removed.id, "cart line dropped to zero");
            return CartChange::Removed;
        }

        item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
        debug!(product_id = %item.id, quantity = item.quantity, "cart line updated");
        CartChange::Updated {
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn product(id: &str, cents: u32) -> CartProduct {
        CartProduct {
            id: ProductId::new(id),
            title: format!("Product {id}"),
            price: Price::from_cents(cents),
            image: None,
        }
    }

    #[test]
    fn test_repeat_add_merges_into_one_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(product("p1", 1_000), 1);
        let change = cart.add_to_cart(product("p1", 1_000), 1);

        assert_eq!(change, CartChange::Updated { quantity: 2 });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 2);
        assert_eq!(cart.total(), Decimal::from(20));
    }

    #[test]
    fn test_remove_then_add_recreates_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(product("p1", 500), 4);
        assert!(cart.remove_from_cart(&ProductId::new("p1")));
        cart.add_to_cart(product("p1", 500), 3);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().quantity, 3);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add_to_cart(product("p1", 500), 1);
        assert!(!cart.remove_from_cart(&ProductId::new("nope")));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_negative_delta_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_to_cart(product("p1", 500), 2);
        assert_eq!(
            cart.add_to_cart(product("p1", 500), -1),
            CartChange::Updated { quantity: 1 }
        );
        assert_eq!(cart.add_to_cart(product("p1", 500), -5), CartChange::Removed);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_non_positive_add_for_new_line_is_ignored() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_to_cart(product("p1", 500), 0), CartChange::Unchanged);
        assert_eq!(cart.add_to_cart(product("p1", 500), -1), CartChange::Unchanged);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_decrement_last_unit_removes() {
        let mut cart = Cart::new();
        let id = ProductId::new("p1");
        cart.add_to_cart(product("p1", 500), 1);
        assert_eq!(cart.increment(&id), CartChange::Updated { quantity: 2 });
        assert_eq!(cart.decrement(&id), CartChange::Updated { quantity: 1 });
        assert_eq!(cart.decrement(&id), CartChange::Removed);
        assert_eq!(cart.decrement(&id), CartChange::Unchanged);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        for id in ["p3", "p1", "p2"] {
            cart.add_to_cart(product(id, 100), 1);
        }
        cart.increment(&ProductId::new("p1"));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["p3", "p1", "p2"]);
    }

    #[test]
    fn test_snapshot_keeps_add_time_price() {
        let mut cart = Cart::new();
        cart.add_to_cart(product("p1", 1_000), 1);
        cart.add_to_cart(product("p1", 9_999), 1);
        assert_eq!(cart.get(&ProductId::new("p1")).unwrap().price, Price::from_cents(1_000));
    }

    #[test]
    fn test_item_count() {
        let mut cart = Cart::new();
        cart.add_to_cart(product("p1", 100), 2);
        cart.add_to_cart(product("p2", 100), 3);
        assert_eq!(cart.item_count(), 5);
    }

    proptest! {
        #[test]
        fn prop_same_id_quantity_is_sum_of_deltas(deltas in prop::collection::vec(1i64..50, 1..20)) {
            let mut cart = Cart::new();
            for delta in &deltas {
                cart.add_to_cart(product("p1", 1_000), *delta);
            }
            let expected: i64 = deltas.iter().sum();
            prop_assert_eq!(cart.len(), 1);
            prop_assert_eq!(i64::from(cart.items()[0].quantity), expected);
        }

        #[test]
        fn prop_quantity_never_below_one(ops in prop::collection::vec((0usize..3, -3i64..4), 0..40)) {
            let mut cart = Cart::new();
            for (which, delta) in ops {
                cart.add_to_cart(product(&format!("p{which}"), 250), delta);
            }
            prop_assert!(cart.items().iter().all(|item| item.quantity >= 1));
            let mut ids: Vec<&str> = cart.items().iter().map(|i| i.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), cart.len());
        }

        #[test]
        fn prop_clear_always_empties(adds in prop::collection::vec((0usize..10, 1i64..5), 0..30)) {
            let mut cart = Cart::new();
            for (which, delta) in adds {
                cart.add_to_cart(product(&format!("p{which}"), 199), delta);
            }
            cart.clear_cart();
            prop_assert!(cart.is_empty());
            prop_assert_eq!(cart.total(), Decimal::ZERO);
        }

        #[test]
        fn prop_total_is_idempotent_and_non_negative(adds in prop::collection::vec((0usize..5, 1i64..10, 0u32..100_000), 0..20)) {
            let mut cart = Cart::new();
            for (which, delta, cents) in adds {
                cart.add_to_cart(product(&format!("p{which}"), cents), delta);
            }
            let first = cart.total();
            prop_assert_eq!(first, cart.total());
            prop_assert!(first >= Decimal::ZERO);
        }
    }
}
