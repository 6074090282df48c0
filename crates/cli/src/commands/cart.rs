//! Cart commands.
//!
//! Each command works on a store that has already loaded the persisted
//! snapshot, applies one operation and waits for the write to land before
//! returning, since the process exits right after.

use go_marketplace_cart::CartStore;
use go_marketplace_core::{CartItem, NewCartItem, Price, ProductId};
use tracing::{info, warn};

/// Log the cart contents.
pub fn show(store: &CartStore) {
    let items = store.products();
    if items.is_empty() {
        info!("Cart is empty");
        return;
    }

    for line in render_lines(&items) {
        info!("{line}");
    }
    info!("Total quantity: {}", store.total_quantity());
}

/// Add one unit of a product.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written.
pub async fn add(
    store: &CartStore,
    id: String,
    title: String,
    image_url: String,
    price: Price,
) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::new(id);
    store.add_to_cart(NewCartItem {
        id: id.clone(),
        title,
        image_url,
        price,
    });
    store.flush().await?;

    report_quantity(store, &id);
    Ok(())
}

/// Increase an item's quantity by one.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written.
pub async fn increment(store: &CartStore, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::new(id);
    warn_if_missing(store, &id);
    store.increment(&id);
    store.flush().await?;

    report_quantity(store, &id);
    Ok(())
}

/// Decrease an item's quantity by one.
///
/// # Errors
///
/// Returns an error if the snapshot cannot be written.
pub async fn decrement(store: &CartStore, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = ProductId::new(id);
    warn_if_missing(store, &id);
    store.decrement(&id);
    store.flush().await?;

    report_quantity(store, &id);
    Ok(())
}

fn quantity_of(store: &CartStore, id: &ProductId) -> Option<u32> {
    store
        .products()
        .into_iter()
        .find(|item| &item.id == id)
        .map(|item| item.quantity)
}

fn warn_if_missing(store: &CartStore, id: &ProductId) {
    if quantity_of(store, id).is_none() {
        warn!(id = %id, "Product is not in the cart");
    }
}

fn report_quantity(store: &CartStore, id: &ProductId) {
    match quantity_of(store, id) {
        Some(quantity) => info!(id = %id, quantity, "Cart updated"),
        None => info!(id = %id, "Removed from cart"),
    }
}

/// Format cart items as aligned text lines.
fn render_lines(items: &[CartItem]) -> Vec<String> {
    let id_width = items.iter().map(|i| i.id.as_str().len()).max().unwrap_or(0);
    let title_width = items.iter().map(|i| i.title.len()).max().unwrap_or(0);

    items
        .iter()
        .map(|item| {
            format!(
                "{:<id_width$}  {:<title_width$}  {} x {}",
                item.id, item.title, item.quantity, item.price
            )
        })
        .collect()
}
