//! DevBurger Core - Shared types library.
//!
//! This crate provides the domain types used across all DevBurger components:
//! - `storefront` - Customer-facing menu, cart and checkout
//! - `admin` - Order and catalog management panel
//! - `api` - Typed client for the DevBurger REST API
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no network I/O, no
//! HTTP clients. The one exception is [`config`], which reads environment
//! variables for the binaries. Entities here are transient copies of what
//! the REST API owns and are replaced wholesale on every fetch.
//!
//! # Modules
//!
//! - [`types`] - IDs, prices in minor units, emails, catalog and order entities
//! - [`cart`] - Session-held shopping cart and its totals
//! - [`forms`] - Login/registration validation with per-field messages
//! - [`flash`] - One-shot notifications shown after a redirect
//! - [`config`] - Environment lookups and session-secret validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod flash;
pub mod forms;
pub mod types;

pub use cart::{Cart, CartLine, DELIVERY_FEE};
pub use flash::{Flash, FlashKind};
pub use forms::FieldErrors;
pub use types::*;
