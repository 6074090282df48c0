//! Shared access to the session cart.
//!
//! Many parts of an application need the same cart. [`CartProvider`] holds
//! the one [`CartStore`] for the session; call sites ask it for the handle
//! with [`CartProvider::use_cart`] instead of threading the store through
//! every constructor. Asking before a store was provided is a programming
//! error and is reported as [`CartError::NoProvider`].

use std::sync::OnceLock;

use tracing::debug;

use crate::error::{CartError, Result};
use crate::store::CartStore;

/// Slot holding the session's cart store.
#[derive(Debug, Default)]
pub struct CartProvider {
    store: OnceLock<CartStore>,
}

impl CartProvider {
    /// Create an empty provider.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            store: OnceLock::new(),
        }
    }

    /// Install the session's store.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::AlreadyProvided`] if a store is already installed.
    pub fn provide(&self, store: CartStore) -> Result<()> {
        let key = store.key().to_owned();
        self.store
            .set(store)
            .map_err(|_| CartError::AlreadyProvided)?;
        debug!(key = %key, "Cart store provided");
        Ok(())
    }

    /// Get a handle to the provided store.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NoProvider`] if no store has been provided.
    pub fn use_cart(&self) -> Result<CartStore> {
        self.store.get().cloned().ok_or(CartError::NoProvider)
    }

    /// Whether a store has been provided.
    #[must_use]
    pub fn is_provided(&self) -> bool {
        self.store.get().is_some()
    }
}
