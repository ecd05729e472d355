//! Core types for DevBurger.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! entity shapes returned by the REST API.

pub mod catalog;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod status;

pub use catalog::{Category, CategoryRef, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{Order, OrderLine, OrderLineRequest, OrderRequest, OrderUser};
pub use price::{Price, PriceError};
pub use status::{OrderStatus, StatusFilter, StatusOption};
