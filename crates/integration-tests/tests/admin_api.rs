//! Integration tests for the back-office client.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use kapee_admin::{AdminClient, AdminError, FALLBACK_ADMIN_NAME, UserDraft};
use kapee_core::{OrderId, OrderStatus, ProductId, UserId, UserRole};
use kapee_integration_tests::{ADMIN_EMAIL, MockApi, SHOPPER_EMAIL, SHOPPER_PASSWORD};
use kapee_storefront::Storefront;
use kapee_storefront::services::checkout::ShippingDetails;
use kapee_storefront::storage::MemoryStorage;

fn client_as(mock: &MockApi, email: Option<&str>) -> AdminClient {
    let token = email
        .and_then(|e| mock.token_for(e))
        .map(SecretString::from);
    AdminClient::new(mock.base_url(), token).unwrap()
}

// =============================================================================
// Tokens
// =============================================================================

#[tokio::test]
async fn test_missing_token_fails_without_request() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, None);

    let err = client.list_users().await.unwrap_err();
    assert!(matches!(err, AdminError::MissingToken));
    assert_eq!(err.to_string(), "No token found. Please login.");

    let draft = UserDraft {
        username: "sam".to_owned(),
        email: "sam@example.com".to_owned(),
        password: Some(SecretString::from("pw")),
        role: UserRole::User,
    };
    assert!(matches!(
        client.create_user(&draft).await,
        Err(AdminError::MissingToken)
    ));

    assert_eq!(mock.hits("GET /api/users/users"), 0);
    assert_eq!(mock.hits("POST /api/users/register"), 0);
}

#[tokio::test]
async fn test_me_without_token_asks_backend_then_falls_back() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, None);

    assert_eq!(client.me().await, FALLBACK_ADMIN_NAME);
    assert_eq!(mock.hits("GET /api/admin/me"), 1);
}

#[tokio::test]
async fn test_shopper_token_is_refused() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, Some(SHOPPER_EMAIL));

    match client.list_users().await.unwrap_err() {
        AdminError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Admin access required");
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(client.me().await, FALLBACK_ADMIN_NAME);
}

#[tokio::test]
async fn test_me_returns_admin_name() {
    let mock = MockApi::start().await;
    assert_eq!(
        client_as(&mock, Some(ADMIN_EMAIL)).me().await,
        "Grace Hopper"
    );
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_user_lifecycle() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, Some(ADMIN_EMAIL));

    let users = client.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    let grace = users.iter().find(|u| u.email == ADMIN_EMAIL).unwrap();
    // Stored as "Admin" by the backend.
    assert_eq!(grace.role, UserRole::Admin);

    client
        .create_user(&UserDraft {
            username: "sam".to_owned(),
            email: "sam@example.com".to_owned(),
            password: Some(SecretString::from("pw")),
            role: UserRole::Admin,
        })
        .await
        .unwrap();

    let sam = client
        .list_users()
        .await
        .unwrap()
        .into_iter()
        .find(|u| u.email == "sam@example.com")
        .unwrap();
    assert_eq!(sam.role, UserRole::Admin);
    assert_eq!(sam.username, "sam");

    client
        .update_user(
            &sam.id,
            &UserDraft {
                username: "samantha".to_owned(),
                email: "sam@example.com".to_owned(),
                password: None,
                role: UserRole::User,
            },
        )
        .await
        .unwrap();

    let users = client.list_users().await.unwrap();
    let sam = users.iter().find(|u| u.id == sam.id).unwrap();
    assert_eq!(sam.username, "samantha");
    assert_eq!(sam.role, UserRole::User);

    client.delete_user(&sam.id).await.unwrap();
    assert_eq!(client.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_user_message() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, Some(ADMIN_EMAIL));

    let err = client
        .create_user(&UserDraft {
            username: "ada".to_owned(),
            email: SHOPPER_EMAIL.to_owned(),
            password: Some(SecretString::from("pw")),
            role: UserRole::User,
        })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "User already exists");
}

#[tokio::test]
async fn test_delete_unknown_user() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, Some(ADMIN_EMAIL));

    let err = client.delete_user(&UserId::new("u404")).await.unwrap_err();
    assert!(matches!(err, AdminError::Status { status: 404, .. }));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_review_flow() {
    let mock = MockApi::start().await;

    let mut shop = Storefront::new(mock.api_client(), MemoryStorage::new());
    shop.auth_mut()
        .login(SHOPPER_EMAIL, &SecretString::from(SHOPPER_PASSWORD))
        .await
        .unwrap();
    shop.add_to_cart(&ProductId::new("p2"), 1).unwrap();
    shop.place_order(ShippingDetails::default()).await.unwrap();

    let client = client_as(&mock, Some(ADMIN_EMAIL));
    let orders = client.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.customer_name, "Ada Lovelace");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.products.len(), 1);
    assert_eq!(order.products[0].id, ProductId::new("p2"));
    assert_eq!(kapee_core::format_amount(order.total_price), "$599.00");

    client
        .update_order_status(&order.id, OrderStatus::Completed)
        .await
        .unwrap();
    assert_eq!(
        client.list_orders().await.unwrap()[0].status,
        OrderStatus::Completed
    );

    client.delete_order(&order.id).await.unwrap();
    assert!(client.list_orders().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_lists_orders_from_older_dashboard() {
    let mock = MockApi::start().await;
    mock.insert_order(serde_json::json!({
        "_id": "66f1a2b3c4d5e6f7a8b9c0d1",
        "customerName": "John Doe",
        "email": "john@example.com",
        "phone": "555-0101",
        "address": "12 Market St",
        "products": [
            { "id": 2, "name": "4K Smart TV", "price": "599", "image": "/smart.jpg", "quantity": 1 }
        ],
        "totalPrice": 599,
        "status": "Processing"
    }));

    let client = client_as(&mock, None);
    let orders = client.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].status, OrderStatus::Processing);
    assert_eq!(orders[0].products[0].id, ProductId::new("2"));
    assert_eq!(kapee_core::format_amount(orders[0].total_price), "$599.00");
}

#[tokio::test]
async fn test_update_unknown_order() {
    let mock = MockApi::start().await;
    let client = client_as(&mock, None);

    let err = client
        .update_order_status(&OrderId::new("nope"), OrderStatus::Cancelled)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Order not found");
}
