//! Kapee back-office library.
//!
//! Bearer-token client for the administrative endpoints of the shop API:
//! account management, order review and the admin profile.
//!
//! # Security
//!
//! User management calls refuse to run without a token and never send a
//! request in that case. Tokens and passwords are held as `SecretString`
//! and redacted from `Debug` output.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod error;
pub mod orders;
pub mod users;

pub use client::{AdminClient, FALLBACK_ADMIN_NAME};
pub use error::{AdminError, Result};
pub use users::{ManagedUser, UserDraft};
