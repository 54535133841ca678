//! Named, insertion-ordered response stores.
//!
//! A backend holds any number of named stores. Each store maps a
//! [`RequestKey`] to a [`Response`] snapshot and remembers the order in which
//! keys were first written. Overwriting a key keeps its original position;
//! reads never reorder. Two backends are provided:
//!
//! - [`CacheDb`]: SQLite via tokio-rusqlite, persistent across restarts
//! - [`MemoryStorage`]: process-local, used for tests and ephemeral runs

pub mod connection;
pub mod entries;
pub mod hash;
pub mod memory;
pub mod migrations;
pub mod trim;

use std::sync::Arc;

use async_trait::async_trait;

pub use crate::Error;
use crate::config::{AppConfig, StorageKind};
use crate::model::{RequestKey, Response};

pub use connection::CacheDb;
pub use memory::MemoryStorage;
pub use trim::trim;

/// Backend holding every named store.
///
/// All operations are atomic per key. Writing to or reading from a store that
/// has not been opened (or was deleted) fails with [`Error::NotFound`].
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Create the store if absent. Opening an existing store is a no-op.
    async fn open_store(&self, name: &str) -> Result<(), Error>;

    /// Names of all existing stores, oldest first.
    async fn store_names(&self) -> Result<Vec<String>, Error>;

    /// Delete a whole store and its entries. Returns whether it existed.
    async fn delete_store(&self, name: &str) -> Result<bool, Error>;

    async fn get(&self, store: &str, key: &RequestKey) -> Result<Option<Response>, Error>;

    /// Insert or overwrite. New keys are appended to the insertion order.
    async fn put(&self, store: &str, key: &RequestKey, response: &Response) -> Result<(), Error>;

    /// Remove one key. Returns whether it existed.
    async fn delete(&self, store: &str, key: &RequestKey) -> Result<bool, Error>;

    /// Keys of a store in insertion order, oldest first.
    async fn keys(&self, store: &str) -> Result<Vec<RequestKey>, Error>;

    /// Delete every store whose name is not in `allowed`.
    ///
    /// Returns the names that were removed.
    async fn delete_stores_not_in(&self, allowed: &[String]) -> Result<Vec<String>, Error> {
        let mut removed = Vec::new();
        for name in self.store_names().await? {
            if allowed.contains(&name) {
                continue;
            }
            if self.delete_store(&name).await? {
                tracing::info!(store = %name, "removed outdated store");
                removed.push(name);
            }
        }
        Ok(removed)
    }

    /// Look the key up in every store, oldest store first.
    async fn match_any(&self, key: &RequestKey) -> Result<Option<Response>, Error> {
        for name in self.store_names().await? {
            if let Some(response) = self.get(&name, key).await? {
                return Ok(Some(response));
            }
        }
        Ok(None)
    }
}

/// Handle to one opened store.
#[derive(Clone)]
pub struct Store {
    name: String,
    backend: Arc<dyn CacheStorage>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("name", &self.name).finish()
    }
}

impl Store {
    /// Open (creating if absent) the named store.
    pub async fn open(backend: Arc<dyn CacheStorage>, name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        backend.open_store(&name).await?;
        Ok(Self { name, backend })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub async fn get(&self, key: &RequestKey) -> Result<Option<Response>, Error> {
        self.backend.get(&self.name, key).await
    }

    pub async fn put(&self, key: &RequestKey, response: &Response) -> Result<(), Error> {
        self.backend.put(&self.name, key, response).await
    }

    pub async fn delete(&self, key: &RequestKey) -> Result<bool, Error> {
        self.backend.delete(&self.name, key).await
    }

    pub async fn keys(&self) -> Result<Vec<RequestKey>, Error> {
        self.backend.keys(&self.name).await
    }

    pub async fn count(&self) -> Result<usize, Error> {
        Ok(self.keys().await?.len())
    }
}

/// Open the backend selected by configuration.
pub async fn open_storage(config: &AppConfig) -> Result<Arc<dyn CacheStorage>, Error> {
    match config.storage {
        StorageKind::Sqlite => {
            tracing::info!(path = %config.db_path.display(), "opening sqlite store backend");
            Ok(Arc::new(CacheDb::open(&config.db_path).await?))
        }
        StorageKind::Memory => {
            tracing::info!("using in-memory store backend");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}
