//! Integration tests for cart persistence across sessions.
//!
//! Each "session" opens a fresh store over the same storage directory, the
//! way the app reloads its cart on every launch.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use go_marketplace_cart::{CartError, CartStatus, DEFAULT_CART_KEY, FileStore, KeyValueStore};
use go_marketplace_core::ProductId;
use go_marketplace_integration_tests::{open_session, product};

// =============================================================================
// Session Round Trips
// =============================================================================

#[tokio::test]
async fn test_fresh_install_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_session(dir.path()).await.unwrap();

    assert!(store.products().is_empty());
    assert_eq!(store.status(), CartStatus::Ready);
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let dir = tempfile::tempdir().unwrap();

    let first = open_session(dir.path()).await.unwrap();
    first.add_to_cart(product("p1", "Shirt", 1000));
    first.add_to_cart(product("p2", "Hat", 1550));
    first.add_to_cart(product("p1", "Shirt", 1000));
    first.flush().await.unwrap();
    let expected = first.products();
    drop(first);

    let second = open_session(dir.path()).await.unwrap();
    assert_eq!(second.products(), expected);
    assert_eq!(second.products()[0].quantity, 2);
    assert_eq!(second.products()[1].quantity, 1);
}

#[tokio::test]
async fn test_first_add_reaches_disk() {
    let dir = tempfile::tempdir().unwrap();

    let store = open_session(dir.path()).await.unwrap();
    store.add_to_cart(product("p1", "Shirt", 1000));
    store.flush().await.unwrap();

    let raw = FileStore::new(dir.path())
        .get(DEFAULT_CART_KEY)
        .await
        .unwrap()
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value[0]["id"], "p1");
    assert_eq!(value[0]["quantity"], 1);
}

#[tokio::test]
async fn test_shirt_scenario_across_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let id = ProductId::new("p1");
    let shirt = || product("p1", "Shirt", 1000);

    let steps: [(&str, u32); 4] = [("add", 1), ("add", 2), ("dec", 1), ("dec", 0)];
    for (op, expected) in steps {
        let store = open_session(dir.path()).await.unwrap();
        match op {
            "add" => store.add_to_cart(shirt()),
            _ => store.decrement(&id),
        }
        store.flush().await.unwrap();
        drop(store);

        let reopened = open_session(dir.path()).await.unwrap();
        let quantity = reopened
            .products()
            .iter()
            .find(|item| item.id == id)
            .map_or(0, |item| item.quantity);
        assert_eq!(quantity, expected, "after {op}");
    }
}

// =============================================================================
// Legacy And Corrupt Snapshots
// =============================================================================

#[tokio::test]
async fn test_loads_snapshot_written_by_mobile_app() {
    let dir = tempfile::tempdir().unwrap();
    let raw = r#"[{"id":"1","title":"Cadeira Rivatti","image_url":"https://img/1.png","price":1800,"quantity":3},{"id":"2","title":"Poltrona","image_url":"https://img/2.png","price":499.9,"quantity":1}]"#;
    FileStore::new(dir.path())
        .set(DEFAULT_CART_KEY, raw)
        .await
        .unwrap();

    let store = open_session(dir.path()).await.unwrap();
    let items = store.products();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].title, "Cadeira Rivatti");
    assert_eq!(items[0].quantity, 3);
    assert_eq!(items[1].price.to_string(), "499.90");
}

#[tokio::test]
async fn test_corrupt_snapshot_fails_to_open() {
    let dir = tempfile::tempdir().unwrap();
    FileStore::new(dir.path())
        .set(DEFAULT_CART_KEY, "[{\"id\":")
        .await
        .unwrap();

    let err = open_session(dir.path()).await.unwrap_err();
    assert!(matches!(err, CartError::Snapshot(_)));
}
