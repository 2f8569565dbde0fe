//! Application state owned by a front end.
//!
//! Constructed once at startup and dropped at exit. There are no globals:
//! every store lives here and is handed out by reference.

use tracing::{debug, info};

use kapee_core::{Cart, CartChange, CartProduct, Catalog, ProductId};

use crate::api::ApiClient;
use crate::config::ShopConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::auth::AuthService;
use crate::services::checkout::{CartView, CheckoutFlow, OrderConfirmation, ShippingDetails};
use crate::services::newsletter;
use crate::session::SessionStore;
use crate::storage::{FileStorage, Storage};

/// Everything a storefront front end needs.
pub struct Storefront<S> {
    auth: AuthService<S>,
    checkout: CheckoutFlow,
    cart: Cart,
    catalog: Catalog,
}

impl Storefront<FileStorage> {
    /// Open the storefront described by `config`, hydrating the session from
    /// its storage file.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage file cannot be read or the HTTP
    /// client cannot be built.
    pub fn open(config: &ShopConfig) -> Result<Self> {
        let storage = FileStorage::open(&config.storage_path)?;
        let api = ApiClient::new(config.api_base_url.clone())?;
        info!(
            api = %config.api_base_url,
            storage = %config.storage_path.display(),
            "storefront opened"
        );
        Ok(Self::new(api, storage))
    }
}

impl<S: Storage> Storefront<S> {
    /// Assemble a storefront over `storage` with the demo catalog and an
    /// empty cart.
    pub fn new(api: ApiClient, storage: S) -> Self {
        Self::with_catalog(api, storage, Catalog::seeded())
    }

    /// Assemble a storefront with a specific catalog.
    pub fn with_catalog(api: ApiClient, storage: S, catalog: Catalog) -> Self {
        Self {
            checkout: CheckoutFlow::new(api.clone()),
            auth: AuthService::new(api, SessionStore::new(storage)),
            cart: Cart::new(),
            catalog,
        }
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthService<S> {
        &self.auth
    }

    pub const fn auth_mut(&mut self) -> &mut AuthService<S> {
        &mut self.auth
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub const fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    /// Add `quantity` of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product is not in the catalog.
    pub fn add_to_cart(&mut self, id: &ProductId, quantity: i64) -> Result<CartChange> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;
        let change = self.cart.add_to_cart(CartProduct::from(product), quantity);
        debug!(product_id = %id, ?change, "cart updated");
        if let Some(message) = cart_breadcrumb(change) {
            add_breadcrumb("cart", message, Some(&[("product_id", id.as_str())]));
        }
        Ok(change)
    }

    /// Open the cart page (requires a session).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` when nobody is logged in.
    pub fn enter_cart(&self) -> Result<CartView> {
        Ok(self.checkout.enter_cart(self.auth.session(), &self.cart)?)
    }

    /// Place an order for the cart contents.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Checkout` without a session, for an empty cart, or
    /// when the backend refuses; the cart is kept in every failure case.
    pub async fn place_order(&mut self, details: ShippingDetails) -> Result<OrderConfirmation> {
        Ok(self
            .checkout
            .place_order(self.auth.session(), &mut self.cart, details)
            .await?)
    }

    /// Subscribe an address to the newsletter.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Newsletter` for a bad address or a failed request.
    pub async fn subscribe(&self, email: &str) -> Result<&'static str> {
        Ok(newsletter::subscribe(self.auth.api(), email).await?)
    }
}

/// Breadcrumb text for a cart change; `None` when nothing changed.
const fn cart_breadcrumb(change: CartChange) -> Option<&'static str> {
    match change {
        CartChange::Inserted { .. } => Some("Added to cart"),
        CartChange::Updated { .. } => Some("Cart quantity changed"),
        CartChange::Removed => Some("Removed from cart"),
        CartChange::Unchanged => None,
    }
}
