//! Kapee storefront library.
//!
//! Shopper-facing state and services: configuration, durable session
//! storage, the remote API client, authentication, checkout and newsletter
//! signup. Front ends (the CLI, tests) build a [`state::Storefront`] and
//! drive it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod validation;

pub use error::{AppError, Result};
pub use state::Storefront;
