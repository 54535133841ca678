//! Count-based eviction.

use super::{Error, Store};

/// Delete the oldest keys until `store` holds at most `max_items` entries.
///
/// Ordering is insertion order only; there is no notion of size, age or
/// access recency. Returns the number of deleted entries, so a second call
/// right after the first returns 0.
pub async fn trim(store: &Store, max_items: usize) -> Result<usize, Error> {
    let keys = store.keys().await?;
    if keys.len() <= max_items {
        return Ok(0);
    }

    let excess = keys.len() - max_items;
    let mut deleted = 0;
    for key in &keys[..excess] {
        if store.delete(key).await? {
            deleted += 1;
        }
    }

    tracing::debug!(store = store.name(), max_items, deleted, "trimmed store");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheDb, CacheStorage, MemoryStorage};
    use crate::model::{RequestKey, Response};
    use std::sync::Arc;

    fn key(i: usize) -> RequestKey {
        RequestKey::get(&format!("https://example.com/item/{i}"))
    }

    async fn filled(backend: Arc<dyn CacheStorage>, n: usize) -> Store {
        let store = Store::open(backend, "dynamic-v1").await.unwrap();
        for i in 0..n {
            store.put(&key(i), &Response::new(200, format!("{i}"))).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_trim_removes_oldest() {
        let store = filled(Arc::new(MemoryStorage::new()), 51).await;

        let deleted = trim(&store, 50).await.unwrap();

        assert_eq!(deleted, 1);
        let keys = store.keys().await.unwrap();
        assert_eq!(keys.len(), 50);
        assert_eq!(keys.first(), Some(&key(1)));
        assert!(store.get(&key(0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_trim_is_idempotent() {
        let store = filled(Arc::new(MemoryStorage::new()), 10).await;

        assert_eq!(trim(&store, 4).await.unwrap(), 6);
        let after_first = store.keys().await.unwrap();
        assert_eq!(trim(&store, 4).await.unwrap(), 0);
        assert_eq!(store.keys().await.unwrap(), after_first);
    }

    #[tokio::test]
    async fn test_trim_within_bound_is_noop() {
        let store = filled(Arc::new(MemoryStorage::new()), 3).await;
        assert_eq!(trim(&store, 3).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_trim_zero_empties_store() {
        let store = filled(Arc::new(MemoryStorage::new()), 3).await;
        assert_eq!(trim(&store, 0).await.unwrap(), 3);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_trim_on_sqlite_backend() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let store = filled(Arc::new(db), 5).await;

        assert_eq!(trim(&store, 2).await.unwrap(), 3);
        assert_eq!(store.keys().await.unwrap(), vec![key(3), key(4)]);
    }
}
