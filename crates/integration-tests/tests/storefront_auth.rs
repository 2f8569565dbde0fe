//! Integration tests for storefront authentication and session persistence.
//!
//! Every test runs against its own [`MockApi`] instance.

#![allow(clippy::unwrap_used)]

use secrecy::{ExposeSecret, SecretString};
use tempfile::TempDir;

use kapee_core::UserRole;
use kapee_integration_tests::{
    ADMIN_EMAIL, ADMIN_PASSWORD, MockApi, SHOPPER_EMAIL, SHOPPER_PASSWORD,
};
use kapee_storefront::Storefront;
use kapee_storefront::services::auth::AuthError;
use kapee_storefront::session::keys;
use kapee_storefront::storage::{FileStorage, MemoryStorage, Storage};
use kapee_storefront::validation::{RegistrationForm, ValidationError};

fn open(mock: &MockApi, dir: &TempDir) -> Storefront<FileStorage> {
    let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
    Storefront::new(mock.api_client(), storage)
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_lowercases_role_and_survives_reload() {
    let mock = MockApi::start().await;
    let dir = TempDir::new().unwrap();

    {
        let mut shop = open(&mock, &dir);
        let user = shop
            .auth_mut()
            .login(ADMIN_EMAIL, &SecretString::from(ADMIN_PASSWORD))
            .await
            .unwrap();
        // The mock reports the role as "Admin".
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.fullname, "Grace Hopper");
    }

    let shop = open(&mock, &dir);
    let session = shop.auth().session();
    let user = session.current_user().unwrap();
    assert_eq!(user.role, UserRole::Admin);
    assert_eq!(user.email.as_str(), ADMIN_EMAIL);
    assert_eq!(
        session.token().unwrap().expose_secret(),
        mock.token_for(ADMIN_EMAIL).unwrap()
    );
}

#[tokio::test]
async fn test_rejected_login_surfaces_server_message() {
    let mock = MockApi::start().await;
    let mut shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    let err = shop
        .auth_mut()
        .login(SHOPPER_EMAIL, &SecretString::from("wrong"))
        .await
        .unwrap_err();

    match err {
        AuthError::Rejected { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(shop.auth().current_user().is_none());
}

#[tokio::test]
async fn test_failed_login_keeps_previous_session() {
    let mock = MockApi::start().await;
    let mut shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    shop.auth_mut()
        .login(SHOPPER_EMAIL, &SecretString::from(SHOPPER_PASSWORD))
        .await
        .unwrap();
    shop.auth_mut()
        .login(ADMIN_EMAIL, &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert_eq!(
        shop.auth().current_user().unwrap().email.as_str(),
        SHOPPER_EMAIL
    );
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_mismatch_never_calls_remote() {
    let mock = MockApi::start().await;
    let mut shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    let err = shop
        .auth_mut()
        .register_form(RegistrationForm {
            fullname: "Katherine Johnson".to_owned(),
            email: "katherine@example.com".to_owned(),
            password: SecretString::from("orbit-1962"),
            confirm_password: SecretString::from("orbit-1963"),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthError::Validation(ValidationError::PasswordMismatch)
    ));
    assert_eq!(mock.hits("POST /api/users/register"), 0);
    assert!(shop.auth().current_user().is_none());
}

#[tokio::test]
async fn test_register_logs_in_as_user() {
    let mock = MockApi::start().await;
    let mut shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    let user = shop
        .auth_mut()
        .register_form(RegistrationForm {
            fullname: "Katherine Johnson".to_owned(),
            email: "katherine@example.com".to_owned(),
            password: SecretString::from("orbit-1962"),
            confirm_password: SecretString::from("orbit-1962"),
        })
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::User);
    assert_eq!(mock.hits("POST /api/users/register"), 1);
    assert!(shop.auth().session().is_authenticated());
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let mock = MockApi::start().await;
    let mut shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    let err = shop
        .auth_mut()
        .register_form(RegistrationForm {
            fullname: "Ada Again".to_owned(),
            email: SHOPPER_EMAIL.to_owned(),
            password: SecretString::from("x"),
            confirm_password: SecretString::from("x"),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "User already exists");
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_removes_both_keys_and_is_idempotent() {
    let mock = MockApi::start().await;
    let dir = TempDir::new().unwrap();

    {
        let mut shop = open(&mock, &dir);
        shop.auth_mut()
            .login(SHOPPER_EMAIL, &SecretString::from(SHOPPER_PASSWORD))
            .await
            .unwrap();
        shop.auth_mut().logout().unwrap();
        shop.auth_mut().logout().unwrap();
        assert!(shop.auth().current_user().is_none());
    }

    let storage = FileStorage::open(dir.path().join("storage.json")).unwrap();
    assert_eq!(storage.get(keys::USER).unwrap(), None);
    assert_eq!(storage.get(keys::TOKEN).unwrap(), None);
    assert_eq!(mock.hits("POST /api/users/login"), 1);
}

// =============================================================================
// Newsletter
// =============================================================================

#[tokio::test]
async fn test_subscribe_then_duplicate() {
    let mock = MockApi::start().await;
    let shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    assert_eq!(
        shop.subscribe("reader@example.com").await.unwrap(),
        "Subscribed successfully!"
    );
    assert_eq!(mock.subscribers(), vec!["reader@example.com".to_owned()]);

    let err = shop.subscribe("reader@example.com").await.unwrap_err();
    assert_eq!(err.user_message(), "Email already subscribed");
}

#[tokio::test]
async fn test_subscribe_invalid_email_not_sent() {
    let mock = MockApi::start().await;
    let shop = Storefront::new(mock.api_client(), MemoryStorage::new());

    shop.subscribe("nobody").await.unwrap_err();
    assert_eq!(mock.hits("POST /api/subscribe"), 0);
}
