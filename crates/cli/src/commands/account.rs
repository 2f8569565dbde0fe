//! Account session commands.
//!
//! # Environment Variables
//!
//! - `KAPEE_STORAGE_PATH` - Where the session is stored
//! - `KAPEE_PASSWORD` - Password for `login` when `-p` is omitted

use secrecy::SecretString;

use kapee_storefront::Storefront;
use kapee_storefront::config::ShopConfig;
use kapee_storefront::validation::RegistrationForm;

use super::{CommandError, say, shop_err};

/// Log in and persist the session.
///
/// # Errors
///
/// Returns error if the credentials are rejected or the session cannot be
/// stored.
pub async fn login(config: &ShopConfig, email: &str, password: String) -> Result<(), CommandError> {
    let mut shop = Storefront::open(config).map_err(shop_err)?;
    let user = shop
        .auth_mut()
        .login(email, &SecretString::from(password))
        .await
        .map_err(shop_err)?;

    say(format_args!("Logged in as {} ({})", user.fullname, user.role));
    Ok(())
}

/// Register an account and log into it.
///
/// # Errors
///
/// Returns error for a local validation failure (nothing is sent) or a
/// rejected registration.
pub async fn register(
    config: &ShopConfig,
    fullname: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<(), CommandError> {
    let mut shop = Storefront::open(config).map_err(shop_err)?;
    let user = shop
        .auth_mut()
        .register_form(RegistrationForm {
            fullname,
            email,
            password: SecretString::from(password),
            confirm_password: SecretString::from(confirm_password),
        })
        .await
        .map_err(shop_err)?;

    say(format_args!("Welcome, {}! You are logged in.", user.fullname));
    Ok(())
}

/// Forget the stored session.
///
/// # Errors
///
/// Returns error if the storage file cannot be updated.
pub fn logout(config: &ShopConfig) -> Result<(), CommandError> {
    let mut shop = Storefront::open(config).map_err(shop_err)?;
    shop.auth_mut().logout().map_err(shop_err)?;
    say("Logged out");
    Ok(())
}

/// Show who is logged in.
///
/// # Errors
///
/// Returns error if the storage file cannot be read.
pub fn whoami(config: &ShopConfig) -> Result<(), CommandError> {
    let shop = Storefront::open(config).map_err(shop_err)?;
    match shop.auth().current_user() {
        Some(user) => say(format_args!(
            "{} <{}> ({})",
            user.fullname, user.email, user.role
        )),
        None => say("Not logged in"),
    }
    Ok(())
}
