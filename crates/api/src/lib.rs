//! DevBurger REST API client.
//!
//! # Architecture
//!
//! - The REST API is the source of truth - NO local persistence, direct calls
//! - JSON bodies everywhere except product/category writes, which are
//!   multipart so they can carry an image file
//! - In-memory caching via `moka` for the catalog reads (`/categories`,
//!   `/products`) with a short TTL; writes through this client invalidate it
//!
//! # Example
//!
//! ```rust,ignore
//! use devburger_api::ApiClient;
//!
//! let client = ApiClient::new(&"http://localhost:3001".parse()?)?;
//!
//! let user = client.login("admin@devburger.com", "123456").await?;
//! let orders = client.list_orders(&user.token).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod cache;
mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{AuthToken, CategoryPayload, ImageUpload, NewUser, ProductPayload, SessionUser};
