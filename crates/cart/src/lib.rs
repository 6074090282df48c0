//! Go Marketplace Cart - client-side cart state container.
//!
//! Holds the in-memory list of cart items for the current session, keeps a
//! snapshot of it in a local key-value store, and exposes add / increment /
//! decrement to the rest of the application through a shared handle.
//!
//! # Architecture
//!
//! - [`cart::Cart`] - pure reducer over the item list
//! - [`snapshot`] - JSON encoding of the persisted cart
//! - [`storage`] - async key-value storage trait plus memory and file backends
//! - [`store::CartStore`] - the shared handle: owns the cart, loads it at
//!   startup and persists every mutation through a background writer
//! - [`provider::CartProvider`] - slot that makes one store reachable from
//!   many call sites
//! - [`config`] - environment-driven configuration
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use go_marketplace_cart::storage::MemoryStore;
//! use go_marketplace_cart::store::{CartStore, DEFAULT_CART_KEY};
//! use go_marketplace_core::{NewCartItem, ProductId};
//!
//! # async fn run() -> go_marketplace_cart::Result<()> {
//! let store = CartStore::open(Arc::new(MemoryStore::new()), DEFAULT_CART_KEY).await?;
//! store.add_to_cart(NewCartItem {
//!     id: ProductId::new("p1"),
//!     title: "Shirt".to_string(),
//!     image_url: "https://cdn.example.com/shirt.png".to_string(),
//!     price: "10".parse().expect("valid price"),
//! });
//! store.flush().await?;
//! assert_eq!(store.products().len(), 1);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod provider;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use cart::Cart;
pub use config::{CartConfig, ConfigError, StorageBackend};
pub use error::{CartError, Result};
pub use provider::CartProvider;
pub use snapshot::SnapshotError;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStatus, CartStore, DEFAULT_CART_KEY, PersistFailure};
