//! Back-office commands.
//!
//! # Usage
//!
//! ```bash
//! kapee admin users create -u sam -e sam@example.com -p secret -r admin
//! kapee admin orders status 65f0c1 processing
//! ```
//!
//! The bearer token comes from the stored session, so log in first.

use secrecy::{ExposeSecret, SecretString};

use kapee_admin::{AdminClient, UserDraft};
use kapee_core::{OrderId, OrderStatus, UserId, UserRole};
use kapee_storefront::Storefront;
use kapee_storefront::config::ShopConfig;

use super::{CommandError, say, shop_err};

/// Build a client carrying the stored session token, if any.
///
/// # Errors
///
/// Returns error if the storage file cannot be read or the HTTP client
/// cannot be built.
pub fn client(config: &ShopConfig) -> Result<AdminClient, CommandError> {
    let shop = Storefront::open(config).map_err(shop_err)?;
    let token = shop
        .auth()
        .session()
        .token()
        .map(|t| SecretString::from(t.expose_secret().to_owned()));
    Ok(AdminClient::new(config.api_base_url.clone(), token)?)
}

pub async fn me(client: &AdminClient) {
    let name = client.me().await;
    say(format_args!("Welcome, {name}"));
}

/// # Errors
///
/// Returns error without a token or if the request fails.
pub async fn list_users(client: &AdminClient) -> Result<(), CommandError> {
    let users = client.list_users().await?;
    if users.is_empty() {
        say("No users");
    }
    for user in users {
        say(format_args!(
            "{:<26} {:<20} {:<30} {}",
            user.id.as_str(),
            user.username,
            user.email,
            user.role
        ));
    }
    Ok(())
}

/// # Errors
///
/// Returns error without a token or if the account is refused.
pub async fn create_user(
    client: &AdminClient,
    username: String,
    email: String,
    password: Option<String>,
    role: UserRole,
) -> Result<(), CommandError> {
    let draft = UserDraft {
        username,
        email,
        password: password.map(SecretString::from),
        role,
    };
    client.create_user(&draft).await?;
    say(format_args!("Created {} ({})", draft.email, draft.role));
    Ok(())
}

/// # Errors
///
/// Returns error without a token or if the update is refused.
pub async fn update_user(
    client: &AdminClient,
    id: &UserId,
    username: String,
    email: String,
    password: Option<String>,
    role: UserRole,
) -> Result<(), CommandError> {
    let draft = UserDraft {
        username,
        email,
        password: password.map(SecretString::from),
        role,
    };
    client.update_user(id, &draft).await?;
    say(format_args!("Updated {id}"));
    Ok(())
}

/// # Errors
///
/// Returns error without a token or if the delete is refused.
pub async fn delete_user(client: &AdminClient, id: &UserId) -> Result<(), CommandError> {
    client.delete_user(id).await?;
    say(format_args!("Deleted user {id}"));
    Ok(())
}

/// # Errors
///
/// Returns error if the request fails.
pub async fn list_orders(client: &AdminClient) -> Result<(), CommandError> {
    let orders = client.list_orders().await?;
    if orders.is_empty() {
        say("No orders");
    }
    for order in orders {
        say(format_args!(
            "{:<26} {:<20} {:<30} {:>10} {}",
            order.id.as_str(),
            order.customer_name,
            order.email,
            kapee_core::format_amount(order.total_price),
            order.status
        ));
        for line in &order.products {
            say(format_args!("    {} x{}", line.name, line.quantity));
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns error if the request fails or is refused.
pub async fn set_order_status(
    client: &AdminClient,
    id: &OrderId,
    status: OrderStatus,
) -> Result<(), CommandError> {
    client.update_order_status(id, status).await?;
    say(format_args!("Order {id} is now {status}"));
    Ok(())
}

/// # Errors
///
/// Returns error if the request fails or is refused.
pub async fn delete_order(client: &AdminClient, id: &OrderId) -> Result<(), CommandError> {
    client.delete_order(id).await?;
    say(format_args!("Deleted order {id}"));
    Ok(())
}
