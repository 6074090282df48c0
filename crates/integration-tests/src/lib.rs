//! Integration tests for Go Marketplace.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p go-marketplace-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart sessions over real file storage
//! - `cart_provider` - Shared access to one store from many call sites
//!
//! This library holds the fixtures shared by the test files.

use std::path::Path;
use std::sync::Arc;

use go_marketplace_cart::{CartStore, DEFAULT_CART_KEY, FileStore, Result};
use go_marketplace_core::{NewCartItem, Price, ProductId};

/// A catalog product with a price given in cents.
///
/// # Panics
///
/// Panics if `cents` is negative.
#[must_use]
pub fn product(id: &str, title: &str, cents: i64) -> NewCartItem {
    NewCartItem {
        id: ProductId::new(id),
        title: title.to_string(),
        image_url: format!("https://cdn.example.com/products/{id}.png"),
        price: Price::from_cents(cents).unwrap_or_else(|e| panic!("bad fixture price: {e}")),
    }
}

/// Open a cart session backed by files in `dir`, as an app launch would.
///
/// # Errors
///
/// Returns an error if the stored snapshot cannot be loaded.
pub async fn open_session(dir: &Path) -> Result<CartStore> {
    CartStore::open(Arc::new(FileStore::new(dir)), DEFAULT_CART_KEY).await
}
