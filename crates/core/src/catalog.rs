//! Product catalog.
//!
//! The in-memory product list read by the storefront and edited from the
//! back-office. Products added here get a time-based `p<millis>` id.

use chrono::Utc;
use tracing::{debug, info};

use crate::models::{NewProduct, Product, ProductPatch};
use crate::types::{Price, ProductId};

/// Mutable collection of products, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    last_issued_millis: i64,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            products: Vec::new(),
            last_issued_millis: 0,
        }
    }

    /// Create a catalog holding `products` as-is.
    #[must_use]
    pub const fn with_products(products: Vec<Product>) -> Self {
        Self {
            products,
            last_issued_millis: 0,
        }
    }

    /// The demo catalog the storefront ships with.
    #[must_use]
    pub fn seeded() -> Self {
        let seed = [
            ("p1", "Noise Cancelling Headphones", 12_999, "Wireless over-ear ANC", "/wireless.jpg"),
            ("p2", "4K Smart TV 55\u{201d}", 59_900, "Crisp 4K panel with HDR10+", "/smart.jpg"),
            ("p3", "iPhone", 99_900, "Latest iPhone model", "/12.jpg"),
        ];

        Self::with_products(
            seed.into_iter()
                .map(|(id, name, cents, description, image)| {
                    NewProduct::new(name, Price::from_cents(cents), description)
                        .with_image(image)
                        .into_product(ProductId::new(id))
                })
                .collect(),
        )
    }

    /// Append a product under a freshly issued id and return that id.
    pub fn add_product(&mut self, product: NewProduct) -> ProductId {
        let id = self.next_id();
        info!(product_id = %id, name = %product.name, "product added");
        self.products.push(product.into_product(id.clone()));
        id
    }

    /// Shallow-merge `patch` into the product with `id`.
    ///
    /// Returns `false` (and changes nothing) when no such product exists.
    pub fn update_product(&mut self, id: &ProductId, patch: ProductPatch) -> bool {
        let Some(product) = self.products.iter_mut().find(|p| &p.id == id) else {
            debug!(product_id = %id, "update for unknown product ignored");
            return false;
        };
        patch.apply(product);
        info!(product_id = %id, "product updated");
        true
    }

    /// Remove the product with `id`. Returns whether one was removed.
    pub fn delete_product(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| &p.id != id);
        let removed = self.products.len() != before;
        if removed {
            info!(product_id = %id, "product deleted");
        } else {
            debug!(product_id = %id, "delete for unknown product ignored");
        }
        removed
    }

    /// All products in insertion order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product with `id`, if present.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products whose name or description contains `query`, ignoring case.
    ///
    /// A blank query matches nothing.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.products
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Issue the next id: the current time in milliseconds, bumped past the
    /// previous id when the clock has not moved on (or went backwards).
    fn next_id(&mut self) -> ProductId {
        let now = Utc::now().timestamp_millis();
        let millis = now.max(self.last_issued_millis.saturating_add(1));
        self.last_issued_millis = millis;
        ProductId::from_millis(millis)
    }
}
