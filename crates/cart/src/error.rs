//! Unified error handling for the cart crate.
//!
//! Provides a unified `CartError` type returned by every fallible cart
//! operation. Background persistence failures are not returned from the
//! mutators; see [`CartStore::subscribe_failures`](crate::store::CartStore::subscribe_failures).

use thiserror::Error;

use crate::snapshot::SnapshotError;
use crate::storage::StorageError;
use crate::store::PersistFailure;

/// Cart-level error type.
#[derive(Debug, Error)]
pub enum CartError {
    /// The key-value store rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The persisted snapshot could not be decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A background snapshot write failed.
    #[error("Persist error: {0}")]
    Persist(#[from] PersistFailure),

    /// The cart was used before a store was provided.
    #[error("use_cart must be used within a CartProvider")]
    NoProvider,

    /// A store was already provided.
    #[error("a cart store has already been provided")]
    AlreadyProvided,

    /// The background persistence task is no longer running.
    #[error("cart persistence worker has stopped")]
    WorkerStopped,
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
