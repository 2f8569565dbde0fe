//! Local back-office tools: product catalog and customer inbox.
//!
//! Both live in memory and start from the shop's seed data on every run;
//! each command applies its change and prints the resulting listing.
//!
//! # Usage
//!
//! ```bash
//! kapee admin products add -n "Speaker" --price 49.99 -d "Loud"
//! kapee admin messages reply 1 "Your order ships tomorrow."
//! ```

use kapee_core::{Catalog, Inbox, MessageId, NewProduct, ProductId, ProductPatch};
use kapee_storefront::AppError;

use super::shop::product_line;
use super::{CommandError, say, shop_err};

// =============================================================================
// Products
// =============================================================================

pub fn list_products(catalog: &Catalog) {
    if catalog.is_empty() {
        say("No products");
    }
    for product in catalog.products() {
        say(product_line(product));
    }
}

pub fn add_product(catalog: &mut Catalog, product: NewProduct) {
    let id = catalog.add_product(product);
    say(format_args!("Added product {id}"));
    list_products(catalog);
}

/// # Errors
///
/// Returns error if no product has `id`.
pub fn update_product(
    catalog: &mut Catalog,
    id: &ProductId,
    patch: ProductPatch,
) -> Result<(), CommandError> {
    if !catalog.update_product(id, patch) {
        return Err(shop_err(AppError::NotFound(id.to_string())));
    }
    say(format_args!("Updated product {id}"));
    list_products(catalog);
    Ok(())
}

/// # Errors
///
/// Returns error if no product has `id`.
pub fn delete_product(catalog: &mut Catalog, id: &ProductId) -> Result<(), CommandError> {
    if !catalog.delete_product(id) {
        return Err(shop_err(AppError::NotFound(id.to_string())));
    }
    say(format_args!("Deleted product {id}"));
    list_products(catalog);
    Ok(())
}

// =============================================================================
// Messages
// =============================================================================

pub fn list_messages(inbox: &Inbox) {
    if inbox.messages().is_empty() {
        say("No messages");
    }
    for message in inbox.messages() {
        say(format_args!(
            "{:>3} {:<14} {:<20} {:<16} {} {}",
            message.id,
            message.sender,
            message.email,
            message.subject,
            message.date,
            if message.read { "Read" } else { "Unread" }
        ));
    }
    say(format_args!("{} unread", inbox.unread_count()));
}

/// # Errors
///
/// Returns error if no message has `id`.
pub fn show_message(inbox: &Inbox, id: MessageId) -> Result<(), CommandError> {
    let message = inbox.get(id).ok_or(kapee_core::InboxError::NotFound(id))?;
    say(&message.subject);
    say(format_args!("From: {} ({})", message.sender, message.email));
    say(format_args!("Date: {}", message.date));
    say("");
    say(&message.content);
    Ok(())
}

/// # Errors
///
/// Returns error if no message has `id`.
pub fn toggle_message(inbox: &mut Inbox, id: MessageId) -> Result<(), CommandError> {
    let read = inbox.toggle_read(id)?;
    say(format_args!(
        "Message {id} marked {}",
        if read { "read" } else { "unread" }
    ));
    list_messages(inbox);
    Ok(())
}

/// # Errors
///
/// Returns error if no message has `id`.
pub fn delete_message(inbox: &mut Inbox, id: MessageId) -> Result<(), CommandError> {
    if !inbox.delete(id) {
        return Err(kapee_core::InboxError::NotFound(id).into());
    }
    say(format_args!("Deleted message {id}"));
    list_messages(inbox);
    Ok(())
}

/// # Errors
///
/// Returns error for a blank reply or an unknown message.
pub fn reply_message(inbox: &Inbox, id: MessageId, body: &str) -> Result<(), CommandError> {
    let reply = inbox.reply(id, body)?;
    say(format_args!("Reply sent to {}: {}", reply.to, reply.body));
    Ok(())
}
