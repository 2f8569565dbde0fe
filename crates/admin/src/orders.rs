//! Order management endpoints.
//!
//! The backend serves these without requiring a token; one is sent when the
//! client has it.

use reqwest::Method;
use serde::Serialize;
use tracing::{info, instrument};

use kapee_core::{Order, OrderId, OrderStatus};

use crate::client::{AdminClient, Auth};
use crate::error::Result;

#[derive(Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

impl AdminClient {
    /// List all orders.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.send_json::<(), _>(
            Method::GET,
            "api/orders/create",
            None,
            Auth::IfPresent,
            "Failed to fetch orders",
        )
        .await
    }

    /// Move an order to `status`.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects it.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<()> {
        self.send(
            Method::PUT,
            &format!("api/orders/create/{id}"),
            Some(&StatusUpdate { status }),
            Auth::IfPresent,
            "Failed to update status",
        )
        .await?;
        info!("order status updated");
        Ok(())
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the API rejects it.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<()> {
        self.send::<()>(
            Method::DELETE,
            &format!("api/orders/create/{id}"),
            None,
            Auth::IfPresent,
            "Failed to delete order",
        )
        .await?;
        info!("order deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_update_body() {
        let body = serde_json::to_string(&StatusUpdate {
            status: OrderStatus::Completed,
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"completed"}"#);
    }
}
