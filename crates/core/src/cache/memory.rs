//! In-process store backend.
//!
//! Same contract as the SQLite backend, kept in a tokio RwLock.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheStorage, Error};
use crate::model::{RequestKey, Response};

#[derive(Default)]
struct MemoryStore {
    next_seq: u64,
    entries: HashMap<RequestKey, (u64, Response)>,
}

/// Volatile store backend.
#[derive(Default)]
pub struct MemoryStorage {
    // Vec keeps store creation order for `store_names`.
    stores: RwLock<Vec<(String, MemoryStore)>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn missing(store: &str) -> Error {
    Error::NotFound(format!("store {store}"))
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open_store(&self, name: &str) -> Result<(), Error> {
        let mut stores = self.stores.write().await;
        if !stores.iter().any(|(n, _)| n == name) {
            stores.push((name.to_string(), MemoryStore::default()));
        }
        Ok(())
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.stores.read().await.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn delete_store(&self, name: &str) -> Result<bool, Error> {
        let mut stores = self.stores.write().await;
        let before = stores.len();
        stores.retain(|(n, _)| n != name);
        Ok(stores.len() != before)
    }

    async fn get(&self, store: &str, key: &RequestKey) -> Result<Option<Response>, Error> {
        let stores = self.stores.read().await;
        let (_, s) = stores.iter().find(|(n, _)| n == store).ok_or_else(|| missing(store))?;
        Ok(s.entries.get(key).map(|(_, r)| r.clone()))
    }

    async fn put(&self, store: &str, key: &RequestKey, response: &Response) -> Result<(), Error> {
        let mut stores = self.stores.write().await;
        let (_, s) = stores.iter_mut().find(|(n, _)| n == store).ok_or_else(|| missing(store))?;
        match s.entries.get_mut(key) {
            Some((_, existing)) => *existing = response.clone(),
            None => {
                let seq = s.next_seq;
                s.next_seq += 1;
                s.entries.insert(key.clone(), (seq, response.clone()));
            }
        }
        Ok(())
    }

    async fn delete(&self, store: &str, key: &RequestKey) -> Result<bool, Error> {
        let mut stores = self.stores.write().await;
        let (_, s) = stores.iter_mut().find(|(n, _)| n == store).ok_or_else(|| missing(store))?;
        Ok(s.entries.remove(key).is_some())
    }

    async fn keys(&self, store: &str) -> Result<Vec<RequestKey>, Error> {
        let stores = self.stores.read().await;
        let (_, s) = stores.iter().find(|(n, _)| n == store).ok_or_else(|| missing(store))?;
        let mut ordered: Vec<_> = s.entries.iter().map(|(k, (seq, _))| (*seq, k.clone())).collect();
        ordered.sort_by_key(|(seq, _)| *seq);
        Ok(ordered.into_iter().map(|(_, k)| k).collect())
    }
}
