//! Catalog, cart, checkout and newsletter commands.

use kapee_core::Product;
use kapee_storefront::config::ShopConfig;
use kapee_storefront::services::checkout::{CartView, ShippingDetails};
use kapee_storefront::storage::Storage;
use kapee_storefront::{Result as ShopResult, Storefront};

use super::{CartLine, CommandError, say, shop_err};

/// Subscribe an address to the newsletter.
///
/// # Errors
///
/// Returns error for a malformed address or a refused signup.
pub async fn subscribe(config: &ShopConfig, email: &str) -> Result<(), CommandError> {
    let shop = Storefront::open(config).map_err(shop_err)?;
    let message = shop.subscribe(email).await.map_err(shop_err)?;
    say(message);
    Ok(())
}

/// List the catalog, or only the products matching `search`.
///
/// # Errors
///
/// Returns error if the storage file cannot be read.
pub fn catalog(config: &ShopConfig, search: Option<&str>) -> Result<(), CommandError> {
    let shop = Storefront::open(config).map_err(shop_err)?;
    let products: Vec<&Product> = match search {
        Some(query) => shop.catalog().search(query),
        None => shop.catalog().products().iter().collect(),
    };

    if products.is_empty() {
        say("No products found");
    }
    for product in products {
        say(product_line(product));
    }
    Ok(())
}

/// One-line catalog entry: id, name, price and any promotion.
pub fn product_line(product: &Product) -> String {
    let mut line = format!(
        "{:<15} {:<28} {:>10}",
        product.id.as_str(),
        product.name,
        product.price
    );
    if let Some(compare_at) = product.compare_at {
        line.push_str(&format!("  (was {compare_at})"));
    }
    if let Some(badge) = &product.badge {
        line.push_str(&format!("  [{}]", badge.label));
    }
    line
}

/// Show the cart page for `items`.
///
/// # Errors
///
/// Returns error when not logged in or an item is not in the catalog.
pub fn cart(config: &ShopConfig, items: &[CartLine]) -> Result<(), CommandError> {
    let mut shop = Storefront::open(config).map_err(shop_err)?;
    fill_cart(&mut shop, items).map_err(shop_err)?;
    let view = shop.enter_cart().map_err(shop_err)?;
    print_cart(&view);
    Ok(())
}

/// Place an order for `items`.
///
/// # Errors
///
/// Returns error when not logged in, the cart is empty, an item is unknown,
/// or the order is refused.
pub async fn checkout(
    config: &ShopConfig,
    items: &[CartLine],
    phone: Option<String>,
    address: Option<String>,
) -> Result<(), CommandError> {
    let mut shop = Storefront::open(config).map_err(shop_err)?;
    fill_cart(&mut shop, items).map_err(shop_err)?;
    let view = shop.enter_cart().map_err(shop_err)?;
    print_cart(&view);

    let confirmation = shop
        .place_order(ShippingDetails { phone, address })
        .await
        .map_err(shop_err)?;

    match confirmation.order_id {
        Some(id) => say(format_args!("Order {id} placed")),
        None => say("Order placed"),
    }
    Ok(())
}

fn fill_cart<S: Storage>(shop: &mut Storefront<S>, items: &[CartLine]) -> ShopResult<()> {
    for line in items {
        shop.add_to_cart(&line.id, line.quantity)?;
    }
    Ok(())
}

fn print_cart(view: &CartView) {
    if view.is_empty() {
        say("Your cart is empty");
        return;
    }
    for line in &view.lines {
        say(format_args!(
            "{:<28} {:>3} x {:>10} = {:>10}",
            line.item.title, line.item.quantity, line.item.price, line.line_total_display
        ));
    }
    say(format_args!(
        "{} item(s), total {}",
        view.item_count, view.total_display
    ));
}
