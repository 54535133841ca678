//! Store inspection and maintenance tools.
//!
//! Store arguments accept the aliases `static` and `dynamic` (the current
//! version's stores) or any existing store's full name.

pub mod get;
pub mod keys;
pub mod trim;

pub use get::{CacheGetParams, get_impl};
pub use keys::{CacheKeysParams, CacheStoresParams, keys_impl, stores_impl};
pub use trim::{CacheTrimParams, trim_impl};

use swcache_core::{Error, Interceptor, Store};

/// Resolve a store argument without creating anything.
pub(crate) async fn resolve_store(interceptor: &Interceptor, name: &str) -> Result<Store, Error> {
    let not_ready = || Error::InvalidState("stores are not provisioned yet".into());
    match name {
        "static" => interceptor.static_store().cloned().ok_or_else(not_ready),
        "dynamic" => interceptor.dynamic_store().cloned().ok_or_else(not_ready),
        other => {
            let backend = interceptor.backend();
            if !backend.store_names().await?.iter().any(|n| n == other) {
                return Err(Error::NotFound(format!("store {other}")));
            }
            Store::open(backend.clone(), other).await
        }
    }
}
