//! Persisted cart snapshot format.
//!
//! A snapshot is a JSON array of cart items:
//!
//! ```json
//! [{"id":"p1","title":"Shirt","image_url":"u","price":10.0,"quantity":1}]
//! ```
//!
//! Decoding checks the cart invariants so a hand-edited or corrupted value
//! never reaches the in-memory cart.

use std::collections::HashSet;

use go_marketplace_core::{CartItem, ProductId};
use thiserror::Error;

/// Errors produced while decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The value is not a JSON array of cart items.
    #[error("malformed cart snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// An item has a quantity of zero.
    #[error("cart snapshot item {id} has zero quantity")]
    ZeroQuantity { id: ProductId },

    /// The same product appears more than once.
    #[error("cart snapshot contains product {id} more than once")]
    DuplicateId { id: ProductId },
}

/// Serialize cart items into the snapshot format.
///
/// # Errors
///
/// Returns [`SnapshotError::Json`] if serialization fails.
pub fn encode(items: &[CartItem]) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(items)?)
}

/// Parse a snapshot back into cart items, preserving order.
///
/// # Errors
///
/// Returns an error if the value is not valid snapshot JSON, or if it
/// contains a zero quantity or a repeated product ID.
pub fn decode(value: &str) -> Result<Vec<CartItem>, SnapshotError> {
    let items: Vec<CartItem> = serde_json::from_str(value)?;

    let mut seen = HashSet::with_capacity(items.len());
    for item in &items {
        if item.quantity == 0 {
            return Err(SnapshotError::ZeroQuantity {
                id: item.id.clone(),
            });
        }
        if !seen.insert(&item.id) {
            return Err(SnapshotError::DuplicateId {
                id: item.id.clone(),
            });
        }
    }

    Ok(items)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use go_marketplace_core::Price;

    use super::*;

    fn item(id: &str, cents: i64, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: format!("Item {id}"),
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            price: Price::from_cents(cents).unwrap(),
            quantity,
        }
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let items = vec![item("z", 1999, 3), item("a", 5, 1), item("m", 100_000, 12)];
        let decoded = decode(&encode(&items).unwrap()).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_round_trip_high_precision_prices() {
        let mut items = Vec::new();
        for (n, amount) in ["1234567890.12345", "0.000001", "9007199254740991", "19.99"]
            .into_iter()
            .enumerate()
        {
            items.push(CartItem {
                price: amount.parse().unwrap(),
                ..item(&format!("p{n}"), 0, 1)
            });
        }

        let decoded = decode(&encode(&items).unwrap()).unwrap();
        assert_eq!(decoded, items);
    }

    #[test]
    fn test_lossy_prices_never_reach_a_snapshot() {
        // Amounts a JSON number would round are refused up front
        assert!("12345678901234567.89".parse::<Price>().is_err());
        assert!("0.12345678901234567891".parse::<Price>().is_err());
    }

    #[test]
    fn test_decode_names_out_of_range_price() {
        let raw = r#"[{"id":"p1","title":"t","image_url":"u","price":1e30,"quantity":1}]"#;
        let err = decode(raw).unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_empty_snapshot() {
        assert_eq!(encode(&[]).unwrap(), "[]");
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn test_decode_legacy_integer_price() {
        let decoded =
            decode(r#"[{"id":"p1","title":"Shirt","image_url":"u","price":10,"quantity":2}]"#)
                .unwrap();
        assert_eq!(decoded, vec![CartItem {
            id: ProductId::new("p1"),
            title: "Shirt".to_string(),
            image_url: "u".to_string(),
            price: Price::from_cents(1000).unwrap(),
            quantity: 2,
        }]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("not json"), Err(SnapshotError::Json(_))));
        assert!(matches!(decode("{}"), Err(SnapshotError::Json(_))));
        assert!(matches!(
            decode(r#"[{"id":"p1","title":"x"}]"#),
            Err(SnapshotError::Json(_))
        ));
    }

    #[test]
    fn test_decode_rejects_negative_quantity() {
        let raw = r#"[{"id":"p1","title":"t","image_url":"u","price":1,"quantity":-1}]"#;
        assert!(matches!(decode(raw), Err(SnapshotError::Json(_))));
    }

    #[test]
    fn test_decode_rejects_zero_quantity() {
        let raw = r#"[{"id":"p1","title":"t","image_url":"u","price":1,"quantity":0}]"#;
        let err = decode(raw).unwrap_err();
        assert!(matches!(err, SnapshotError::ZeroQuantity { ref id } if id.as_str() == "p1"));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let raw = encode(&[item("p1", 100, 1), item("p1", 100, 2)]).unwrap();
        assert!(matches!(
            decode(&raw),
            Err(SnapshotError::DuplicateId { .. })
        ));
    }
}
