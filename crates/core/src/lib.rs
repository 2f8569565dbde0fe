//! Kapee Core - Shared types and in-memory shop state.
//!
//! This crate provides the types and state machines used across all Kapee
//! components:
//! - `storefront` - Session, authentication and checkout for shoppers
//! - `admin` - Back-office API client (users, orders)
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains types and pure in-memory state only - no I/O, no
//! storage, no HTTP clients. Every mutation is synchronous and takes
//! `&mut self`, so a single owner serializes all changes.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, roles and statuses
//! - [`models`] - Users, products and orders
//! - [`cart`] - The cart store (line items with quantity merging)
//! - [`catalog`] - The mutable product catalog
//! - [`inbox`] - Back-office customer messages

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod inbox;
pub mod models;
pub mod types;

pub use cart::{Cart, CartChange, CartItem, CartProduct};
pub use catalog::Catalog;
pub use inbox::{Inbox, InboxError, Message, MessageId, Reply};
pub use models::*;
pub use types::*;
