//! Cart reducer.
//!
//! [`Cart`] is the in-memory aggregate: an ordered list of [`CartItem`]s in
//! the order they were first added. Every method is a synchronous state
//! transition with no I/O; persistence is layered on top by
//! [`CartStore`](crate::store::CartStore).
//!
//! Invariants upheld by every transition:
//! - product IDs are unique within the cart
//! - every item present has `quantity >= 1`

use go_marketplace_core::{CartItem, NewCartItem, ProductId};

/// Ordered collection of cart items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously persisted items.
    ///
    /// Callers are expected to pass items that already satisfy the cart
    /// invariants (see [`snapshot::decode`](crate::snapshot::decode)).
    #[must_use]
    pub const fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct products.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by product ID.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Sum of quantities across all items.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Replace the whole cart.
    pub fn replace(&mut self, items: Vec<CartItem>) {
        self.items = items;
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart is appended with quantity 1. A product
    /// already present is incremented instead of duplicated.
    ///
    /// Returns `true` if a new line was inserted.
    pub fn add(&mut self, item: NewCartItem) -> bool {
        if self.get(&item.id).is_some() {
            self.increment(&item.id);
            return false;
        }

        self.items.push(item.with_quantity(1));
        true
    }

    /// Increase the quantity of `id` by one.
    ///
    /// Unknown IDs leave the cart unchanged. Returns `true` if an item matched.
    pub fn increment(&mut self, id: &ProductId) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Decrease the quantity of `id` by one, removing it when it hits zero.
    ///
    /// Unknown IDs leave the cart unchanged. Returns `true` if an item matched.
    pub fn decrement(&mut self, id: &ProductId) -> bool {
        let matched = match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_sub(1);
                true
            }
            None => false,
        };

        self.items.retain(|item| item.quantity > 0);
        matched
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}
