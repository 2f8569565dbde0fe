//! Orders as seen by checkout and the back-office.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::cart::CartItem;
use crate::types::{OrderId, OrderStatus, Price, ProductId};

/// A purchased line inside an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Older orders carry numeric product ids; they are kept as their
    /// decimal text.
    #[serde(deserialize_with = "product_id_from_text_or_number")]
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

impl OrderLine {
    /// Line total (price × quantity).
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.price.times(self.quantity)
    }
}

fn product_id_from_text_or_number<'de, D>(deserializer: D) -> Result<ProductId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => ProductId::new(id),
        RawId::Number(n) => ProductId::new(n.to_string()),
    })
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.title.clone(),
            price: item.price,
            image: item.image.clone(),
            quantity: item.quantity,
        }
    }
}

/// An order stored by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    pub customer_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
}

/// Order hand-off payload sent by checkout to the order-creation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub products: Vec<OrderLine>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub status: OrderStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_accepts_string_prices() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "o1",
            "customerName": "Ada",
            "email": "ada@example.com",
            "phone": "555-0100",
            "address": "1 Analytical Way",
            "products": [
                { "id": "p1", "name": "Headphones", "price": "10", "image": "/w.jpg", "quantity": 2 }
            ],
            "totalPrice": 20,
            "status": "processing"
        }))
        .unwrap();

        assert_eq!(order.id, OrderId::new("o1"));
        assert_eq!(order.status, OrderStatus::Processing);
        assert_eq!(order.products.first().map(OrderLine::total), Some(Decimal::from(20)));
        assert_eq!(order.total_price, Decimal::from(20));
    }

    #[test]
    fn test_order_from_admin_dashboard_payload() {
        // Numeric line ids, string prices and a capitalised status.
        let orders: Vec<Order> = serde_json::from_value(serde_json::json!([
            {
                "_id": "66f1a2b3c4d5e6f7a8b9c0d1",
                "customerName": "John Doe",
                "email": "john@example.com",
                "phone": "555-0101",
                "address": "12 Market St",
                "products": [
                    { "id": 1, "name": "Noise Cancelling Headphones", "price": "129.99", "image": "/wireless.jpg", "quantity": 2 },
                    { "id": 3, "name": "iPhone", "price": "999", "image": "/12.jpg", "quantity": 1 }
                ],
                "totalPrice": 1258.98,
                "status": "Pending"
            },
            {
                "_id": "66f1a2b3c4d5e6f7a8b9c0d2",
                "customerName": "Jane Smith",
                "email": "jane@example.com",
                "phone": "",
                "address": "",
                "products": [],
                "totalPrice": 0,
                "status": "SHIPPED"
            }
        ]))
        .unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].status, OrderStatus::Pending);
        assert_eq!(orders[0].products[0].id, ProductId::new("1"));
        assert_eq!(orders[0].products[1].id, ProductId::new("3"));
        assert_eq!(orders[0].products[0].total(), "259.98".parse::<Decimal>().unwrap());
        assert_eq!(orders[1].status, OrderStatus::Pending);
    }

    #[test]
    fn test_order_status_defaults_to_pending() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "o2",
            "customerName": "Bob",
            "email": "bob@example.com",
            "totalPrice": 0
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.products.is_empty());
    }
}
