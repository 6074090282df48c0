//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CART_STORAGE_BACKEND` - `file` or `memory` (default: file)
//! - `CART_STORAGE_DIR` - Directory for the file backend
//!   (default: `<platform data dir>/go-marketplace`)
//! - `CART_STORAGE_KEY` - Key the cart snapshot is stored under
//!   (default: `@GoMarketplace:cart`)

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::error::Result;
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::store::{CartStore, DEFAULT_CART_KEY};

const DATA_DIR_NAME: &str = "go-marketplace";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No platform data directory; set CART_STORAGE_DIR")]
    NoDataDir,
}

/// Where the cart snapshot is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One file per key in `storage_dir`.
    #[default]
    File,
    /// Process memory only.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected 'file' or 'memory', got '{other}'")),
        }
    }
}

/// Cart configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storage backend
    pub backend: StorageBackend,
    /// Directory used by the file backend
    pub storage_dir: PathBuf,
    /// Snapshot key
    pub storage_key: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or no storage directory
    /// can be determined.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(
        var: impl Fn(&str) -> Option<String>,
    ) -> std::result::Result<Self, ConfigError> {
        let backend = var("CART_STORAGE_BACKEND")
            .map(|value| {
                value.parse::<StorageBackend>().map_err(|e| {
                    ConfigError::InvalidEnvVar("CART_STORAGE_BACKEND".to_string(), e)
                })
            })
            .transpose()?
            .unwrap_or_default();

        let storage_dir = match var("CART_STORAGE_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            Some(_) => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_DIR".to_string(),
                    "cannot be empty".to_string(),
                ));
            }
            None => default_storage_dir()?,
        };

        let storage_key = var("CART_STORAGE_KEY").unwrap_or_else(|| DEFAULT_CART_KEY.to_string());
        if storage_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            backend,
            storage_dir,
            storage_key,
        })
    }

    /// Build the configured storage backend.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        match self.backend {
            StorageBackend::File => Arc::new(FileStore::new(&self.storage_dir)),
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        }
    }

    /// Open the cart store described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted snapshot cannot be loaded.
    pub async fn open_store(&self) -> Result<CartStore> {
        CartStore::open(self.storage(), self.storage_key.clone()).await
    }
}

fn default_storage_dir() -> std::result::Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> std::result::Result<CartConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CartConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("CART_STORAGE_DIR", "/tmp/cart")]).unwrap();
        assert_eq!(config.backend, StorageBackend::File);
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/cart"));
        assert_eq!(config.storage_key, "@GoMarketplace:cart");
    }

    #[test]
    fn test_memory_backend() {
        let config = config_from(&[
            ("CART_STORAGE_BACKEND", "Memory"),
            ("CART_STORAGE_DIR", "/tmp/cart"),
            ("CART_STORAGE_KEY", "@Test:cart"),
        ])
        .unwrap();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.storage_key, "@Test:cart");
    }

    #[test]
    fn test_invalid_backend() {
        let err = config_from(&[("CART_STORAGE_BACKEND", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref name, _) if name == "CART_STORAGE_BACKEND"));
    }

    #[test]
    fn test_empty_values_rejected() {
        assert!(config_from(&[("CART_STORAGE_DIR", "  ")]).is_err());
        assert!(config_from(&[("CART_STORAGE_DIR", "/tmp/cart"), ("CART_STORAGE_KEY", "")]).is_err());
    }

    #[tokio::test]
    async fn test_open_store_with_file_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = CartConfig {
            backend: StorageBackend::File,
            storage_dir: dir.path().to_path_buf(),
            storage_key: DEFAULT_CART_KEY.to_string(),
        };

        let store = config.open_store().await.unwrap();
        assert!(store.is_ready());
        assert_eq!(store.key(), DEFAULT_CART_KEY);
    }
}
