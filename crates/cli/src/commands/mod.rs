//! Command implementations.

pub mod account;
pub mod admin;
pub mod backoffice;
pub mod shop;

use thiserror::Error;

use kapee_admin::AdminError;
use kapee_core::{InboxError, ProductId};
use kapee_storefront::AppError;

/// A failed command, displayed as the message a user should see.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{}", .0.user_message())]
    Shop(AppError),

    #[error("{}", .0.user_message())]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Inbox(#[from] InboxError),
}

/// Log (and possibly capture) a storefront failure before surfacing it.
pub fn shop_err(err: impl Into<AppError>) -> CommandError {
    let err = err.into();
    err.report();
    CommandError::Shop(err)
}

/// Print a line of command output.
#[allow(clippy::print_stdout)]
pub fn say(line: impl std::fmt::Display) {
    println!("{line}");
}

/// A product and quantity given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: ProductId,
    pub quantity: i64,
}

/// Parse `<product-id>[:<quantity>]`; the quantity defaults to 1.
///
/// # Errors
///
/// Returns a message for an empty id or a quantity that is not a positive
/// integer.
pub fn parse_cart_line(raw: &str) -> Result<CartLine, String> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, qty)) => {
            let qty = qty
                .trim()
                .parse::<i64>()
                .map_err(|_| format!("invalid quantity in {raw:?}"))?;
            (id, qty)
        }
        None => (raw, 1),
    };

    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing product id in {raw:?}"));
    }
    if quantity < 1 {
        return Err(format!("quantity must be at least 1 in {raw:?}"));
    }

    Ok(CartLine {
        id: ProductId::new(id),
        quantity,
    })
}
