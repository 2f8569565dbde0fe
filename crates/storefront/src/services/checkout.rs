//! Checkout flow.
//!
//! The cart page is gated on a session, and a placed order is handed to the
//! remote order-creation endpoint. Payment happens elsewhere.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, instrument, warn};

use kapee_core::{Cart, CartItem, OrderId, OrderLine, OrderRequest, OrderStatus, format_amount};

use crate::api::{ApiClient, ApiError};
use crate::error::add_breadcrumb;
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::validation::ValidationError;

/// Where an anonymous shopper is sent to log in.
pub const LOGIN_REDIRECT: &str = "/account";

/// Errors raised by the checkout flow.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No session: the shopper has to log in first.
    #[error("please log in to continue (redirect to {redirect})")]
    LoginRequired { redirect: &'static str },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The order endpoint failed or refused; the cart is untouched.
    #[error("order placement failed: {0}")]
    Api(#[from] ApiError),
}

impl CheckoutError {
    const fn login_required() -> Self {
        Self::LoginRequired {
            redirect: LOGIN_REDIRECT,
        }
    }
}

// =============================================================================
// View Types
// =============================================================================

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub item: CartItem,
    pub line_total: Decimal,
    pub line_total_display: String,
}

/// What the cart page shows once the gate lets the shopper through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u64,
    pub total: Decimal,
    pub total_display: String,
}

impl CartView {
    fn from_cart(cart: &Cart) -> Self {
        let lines = cart
            .items()
            .iter()
            .map(|item| {
                let line_total = item.line_total();
                CartLineView {
                    item: item.clone(),
                    line_total,
                    line_total_display: format_amount(line_total),
                }
            })
            .collect();
        let total = cart.total();

        Self {
            lines,
            item_count: cart.item_count(),
            total,
            total_display: format_amount(total),
        }
    }

    /// Whether there is anything to check out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Contact details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingDetails {
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl ShippingDetails {
    fn normalized(self) -> Self {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_owned())
                .filter(|s| !s.is_empty())
        };
        Self {
            phone: clean(self.phone),
            address: clean(self.address),
        }
    }
}

/// Result of a successful hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderConfirmation {
    /// Id assigned by the backend, when it reported one.
    pub order_id: Option<OrderId>,
    pub total: Decimal,
    pub item_count: u64,
}

// =============================================================================
// Flow
// =============================================================================

/// Gate and order hand-off.
#[derive(Clone)]
pub struct CheckoutFlow {
    api: ApiClient,
}

impl CheckoutFlow {
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Open the cart page.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::LoginRequired` when nobody is logged in; the
    /// cart contents are not exposed in that case.
    pub fn enter_cart<S: Storage>(
        &self,
        session: &SessionStore<S>,
        cart: &Cart,
    ) -> Result<CartView, CheckoutError> {
        if session.current_user().is_none() {
            info!("cart access refused without session");
            return Err(CheckoutError::login_required());
        }
        Ok(CartView::from_cart(cart))
    }

    /// Hand the cart to the order-creation endpoint.
    ///
    /// The cart is cleared only after the backend accepts the order.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::LoginRequired` without a session
    /// - `CheckoutError::Validation(EmptyCart)` for an empty cart (no request is sent)
    /// - `CheckoutError::Api` when the request fails or is refused
    #[instrument(skip_all, fields(lines = cart.len()))]
    pub async fn place_order<S: Storage>(
        &self,
        session: &SessionStore<S>,
        cart: &mut Cart,
        details: ShippingDetails,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let user = session
            .current_user()
            .ok_or_else(CheckoutError::login_required)?;
        if cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }

        let details = details.normalized();
        let total = cart.total();
        let item_count = cart.item_count();
        let request = OrderRequest {
            customer_name: user.fullname.clone(),
            email: user.email.as_str().to_owned(),
            phone: details.phone,
            address: details.address,
            products: cart.items().iter().map(OrderLine::from).collect(),
            total_price: total,
            status: OrderStatus::Pending,
        };

        let created = match self.api.create_order(session.token(), &request).await {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, "order placement failed, cart kept");
                return Err(e.into());
            }
        };

        cart.clear_cart();
        add_breadcrumb("checkout", "Order placed", None);
        info!(
            order_id = ?created.id,
            total = %total,
            items = item_count,
            "order placed"
        );

        Ok(OrderConfirmation {
            order_id: created.id,
            total,
            item_count,
        })
    }
}
