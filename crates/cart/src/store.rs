//! The cart store.
//!
//! [`CartStore`] owns the session's [`Cart`] and keeps a snapshot of it in a
//! [`KeyValueStore`]. It is a cheaply cloneable handle: every clone sees and
//! mutates the same cart.
//!
//! Mutations are fire-and-forget. `add_to_cart`, `increment` and `decrement`
//! apply the transition synchronously and hand the resulting item list to a
//! background writer task, then return. The writer is the only task that
//! touches storage after load, and snapshots are queued in the same critical
//! section that produced them, so the stored value always converges to the
//! latest in-memory cart. Queued snapshots that are superseded before the
//! writer gets to them are skipped.
//!
//! Write failures are logged and broadcast to [`CartStore::subscribe_failures`]
//! subscribers; [`CartStore::flush`] also reports them.

use std::fmt;
use std::sync::Arc;

use go_marketplace_core::{CartItem, NewCartItem, ProductId};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::cart::Cart;
use crate::error::{CartError, Result};
use crate::snapshot;
use crate::storage::KeyValueStore;

/// Storage key the cart snapshot is kept under.
pub const DEFAULT_CART_KEY: &str = "@GoMarketplace:cart";

const FAILURE_CHANNEL_CAPACITY: usize = 16;

/// Lifecycle of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartStatus {
    /// Created, snapshot not read yet (or the first load failed).
    Uninitialized,
    /// Reading the snapshot from storage.
    Loading,
    /// Snapshot loaded (or none stored).
    Ready,
}

/// A snapshot write that did not make it to storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to persist cart under {key}: {message}")]
pub struct PersistFailure {
    /// Storage key that was being written.
    pub key: String,
    /// Rendered cause.
    pub message: String,
}

enum Command {
    Persist(Vec<CartItem>),
    Flush(oneshot::Sender<std::result::Result<(), PersistFailure>>),
}

struct State {
    cart: Cart,
    status: CartStatus,
}

struct Inner {
    key: String,
    storage: Arc<dyn KeyValueStore>,
    state: RwLock<State>,
    writer: mpsc::UnboundedSender<Command>,
    failures: broadcast::Sender<PersistFailure>,
}

/// Shared handle to the session cart.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("CartStore")
            .field("key", &self.inner.key)
            .field("status", &state.status)
            .field("items", &state.cart.len())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create an empty, unloaded store and start its persistence writer.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let (writer, commands) = mpsc::unbounded_channel();
        let (failures, _) = broadcast::channel(FAILURE_CHANNEL_CAPACITY);

        tokio::spawn(run_writer(
            Arc::clone(&storage),
            key.clone(),
            commands,
            failures.clone(),
        ));

        Self {
            inner: Arc::new(Inner {
                key,
                storage,
                state: RwLock::new(State {
                    cart: Cart::new(),
                    status: CartStatus::Uninitialized,
                }),
                writer,
                failures,
            }),
        }
    }

    /// Create a store and load the persisted snapshot into it.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read or the snapshot is malformed.
    pub async fn open(storage: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self> {
        let store = Self::new(storage, key);
        store.load().await?;
        Ok(store)
    }

    /// Replace the in-memory cart with the persisted snapshot, if any.
    ///
    /// With no stored snapshot the cart is left as it is. Nothing is written
    /// back to storage.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the read fails and
    /// [`CartError::Snapshot`] if the stored value is malformed. The
    /// in-memory cart is untouched in both cases and the status goes back to
    /// what it was before the call.
    #[instrument(skip(self), fields(key = %self.inner.key))]
    pub async fn load(&self) -> Result<()> {
        let previous = {
            let mut state = self.inner.state.write();
            std::mem::replace(&mut state.status, CartStatus::Loading)
        };

        let loaded = self.read_snapshot().await;

        let mut state = self.inner.state.write();
        match loaded {
            Ok(Some(items)) => {
                info!(items = items.len(), "Loaded cart snapshot");
                state.cart.replace(items);
                state.status = CartStatus::Ready;
                Ok(())
            }
            Ok(None) => {
                debug!("No cart snapshot stored");
                state.status = CartStatus::Ready;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, status = ?previous, "Failed to load cart snapshot");
                state.status = previous;
                Err(e)
            }
        }
    }

    async fn read_snapshot(&self) -> Result<Option<Vec<CartItem>>> {
        let Some(raw) = self.inner.storage.get(&self.inner.key).await? else {
            return Ok(None);
        };
        Ok(Some(snapshot::decode(&raw)?))
    }

    /// Add one unit of a product, inserting it if it is not in the cart yet.
    pub fn add_to_cart(&self, item: NewCartItem) {
        let id = item.id.clone();
        self.mutate("add_to_cart", &id, |cart| cart.add(item));
    }

    /// Increase the quantity of `id` by one.
    ///
    /// An unknown ID leaves the cart unchanged but still persists it.
    pub fn increment(&self, id: &ProductId) {
        self.mutate("increment", id, |cart| cart.increment(id));
    }

    /// Decrease the quantity of `id` by one, removing it at zero.
    ///
    /// An unknown ID leaves the cart unchanged but still persists it.
    pub fn decrement(&self, id: &ProductId) {
        self.mutate("decrement", id, |cart| cart.decrement(id));
    }

    fn mutate(&self, op: &'static str, id: &ProductId, apply: impl FnOnce(&mut Cart) -> bool) {
        let mut state = self.inner.state.write();
        let changed = apply(&mut state.cart);
        let items = state.cart.items().to_vec();
        let count = items.len();

        // Queue while still holding the lock so queue order matches mutation order
        if self.inner.writer.send(Command::Persist(items)).is_err() {
            error!(key = %self.inner.key, op, "Cart persistence worker has stopped");
        }
        drop(state);

        debug!(op, id = %id, changed, items = count, "Cart updated");
    }

    /// Copy of the current cart items, in insertion order.
    #[must_use]
    pub fn products(&self) -> Vec<CartItem> {
        self.inner.state.read().cart.items().to_vec()
    }

    /// Sum of quantities across the cart.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.inner.state.read().cart.total_quantity()
    }

    #[must_use]
    pub fn status(&self) -> CartStatus {
        self.inner.state.read().status
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status() == CartStatus::Ready
    }

    /// Storage key of this cart's snapshot.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.inner.key
    }

    /// Receive every background write failure from now on.
    #[must_use]
    pub fn subscribe_failures(&self) -> broadcast::Receiver<PersistFailure> {
        self.inner.failures.subscribe()
    }

    /// Wait until every mutation made before this call has been written.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Persist`] if a write since the previous flush
    /// failed, or [`CartError::WorkerStopped`] if the writer is gone.
    pub async fn flush(&self) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.inner
            .writer
            .send(Command::Flush(ack))
            .map_err(|_| CartError::WorkerStopped)?;

        done.await.map_err(|_| CartError::WorkerStopped)??;
        Ok(())
    }
}

/// Background writer: drains commands and writes the newest queued snapshot.
async fn run_writer(
    storage: Arc<dyn KeyValueStore>,
    key: String,
    mut commands: mpsc::UnboundedReceiver<Command>,
    failures: broadcast::Sender<PersistFailure>,
) {
    let mut last_failure: Option<PersistFailure> = None;

    while let Some(first) = commands.recv().await {
        let mut pending: Option<Vec<CartItem>> = None;
        let mut next = Some(first);

        while let Some(command) = next.take() {
            match command {
                Command::Persist(items) => pending = Some(items),
                Command::Flush(ack) => {
                    if let Some(items) = pending.take() {
                        write_snapshot(storage.as_ref(), &key, &items, &failures, &mut last_failure)
                            .await;
                    }
                    let _ = ack.send(last_failure.take().map_or(Ok(()), Err));
                }
            }
            next = commands.try_recv().ok();
        }

        if let Some(items) = pending {
            write_snapshot(storage.as_ref(), &key, &items, &failures, &mut last_failure).await;
        }
    }

    debug!(key = %key, "Cart persistence worker stopped");
}

async fn write_snapshot(
    storage: &dyn KeyValueStore,
    key: &str,
    items: &[CartItem],
    failures: &broadcast::Sender<PersistFailure>,
    last_failure: &mut Option<PersistFailure>,
) {
    let result = match snapshot::encode(items) {
        Ok(value) => storage.set(key, &value).await.map_err(CartError::from),
        Err(e) => Err(CartError::from(e)),
    };

    match result {
        Ok(()) => debug!(key = %key, items = items.len(), "Persisted cart snapshot"),
        Err(e) => {
            error!(key = %key, error = %e, "Failed to persist cart snapshot");
            let failure = PersistFailure {
                key: key.to_owned(),
                message: e.to_string(),
            };
            // No subscribers is fine
            let _ = failures.send(failure.clone());
            *last_failure = Some(failure);
        }
    }
}
