//! Core types for Kapee.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod api;
pub mod email;
pub mod id;
pub mod price;
pub mod role;
pub mod status;

pub use api::ApiErrorBody;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError, format_amount};
pub use role::UserRole;
pub use status::{OrderStatus, OrderStatusError};
