//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Login, registration and logout against the remote API
//! - `checkout` - Cart gate and order hand-off
//! - `newsletter` - Newsletter signup

pub mod auth;
pub mod checkout;
pub mod newsletter;
