//! Store provisioning and activation.
//!
//! `Uninitialized → Provisioning → Provisioned → Active`. Provisioning
//! preloads the manifest into the static store (best effort, per item) and
//! creates the dynamic store. Activation deletes stores left by other
//! versions and trims the dynamic store.

use serde::{Deserialize, Serialize};

use crate::Error;
use crate::cache::{CacheStorage, Store, trim};
use crate::fetch::Fetcher;
use crate::manifest::Manifest;
use crate::model::Request;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    Uninitialized,
    Provisioning,
    Provisioned,
    Active,
}

/// A manifest item that could not be preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAsset {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionReport {
    pub cached: usize,
    pub failed: Vec<FailedAsset>,
}

impl ProvisionReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationReport {
    pub removed_stores: Vec<String>,
    pub trimmed: usize,
}

/// Open both stores and preload every manifest asset into the static store.
///
/// A failing item is logged and recorded; the rest still load.
///
/// # Errors
///
/// Fails only when a store itself cannot be opened.
pub(crate) async fn provision(
    backend: &std::sync::Arc<dyn CacheStorage>, fetcher: &dyn Fetcher, manifest: &Manifest, static_name: &str,
    dynamic_name: &str,
) -> Result<(Store, Store, ProvisionReport), Error> {
    let static_store = Store::open(backend.clone(), static_name).await?;
    let mut report = ProvisionReport::default();

    for entry in manifest.entries() {
        let request = Request::get(&entry.url);
        let outcome = match fetcher.fetch(&request).await {
            Ok(response) if response.is_ok() => static_store.put(&entry.key(), &response).await,
            Ok(response) => Err(Error::NetworkFailure(format!("status {}", response.status))),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => report.cached += 1,
            Err(e) => {
                tracing::warn!(path = %entry.path, url = %entry.url, error = %e, "failed to preload asset");
                report.failed.push(FailedAsset { path: entry.path.clone(), reason: e.to_string() });
            }
        }
    }

    let dynamic_store = Store::open(backend.clone(), dynamic_name).await?;
    tracing::info!(
        static_store = static_name,
        dynamic_store = dynamic_name,
        cached = report.cached,
        failed = report.failed.len(),
        "stores provisioned"
    );

    Ok((static_store, dynamic_store, report))
}

/// Remove every store outside `expected`, then trim the dynamic store.
pub(crate) async fn activate(
    backend: &dyn CacheStorage, expected: &[String], dynamic_store: &Store, max_dynamic_entries: usize,
) -> Result<ActivationReport, Error> {
    let removed_stores = backend.delete_stores_not_in(expected).await?;
    let trimmed = trim(dynamic_store, max_dynamic_entries).await?;
    tracing::info!(removed = removed_stores.len(), trimmed, "stores activated");
    Ok(ActivationReport { removed_stores, trimmed })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cache::MemoryStorage;
    use crate::model::{RequestKey, Response};
    use crate::strategy::testing::ScriptedFetcher;

    fn manifest(paths: &[&str]) -> Manifest {
        let origin = url::Url::parse("https://shop.example/").unwrap();
        let paths: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        Manifest::resolve(&origin, &paths).unwrap()
    }

    #[tokio::test]
    async fn test_provision_preloads_exactly_manifest() {
        let backend: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
        let fetcher = ScriptedFetcher::new();
        for path in ["index.html", "style.css", "script.js"] {
            fetcher.route(&format!("https://shop.example/{path}"), Response::new(200, path));
        }
        let manifest = manifest(&["/index.html", "/style.css", "/script.js"]);

        let (static_store, dynamic_store, report) =
            provision(&backend, &fetcher, &manifest, "s-v1", "d-v1").await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.cached, 3);
        let keys = static_store.keys().await.unwrap();
        let expected: Vec<RequestKey> = manifest.entries().iter().map(|e| e.key()).collect();
        assert_eq!(keys, expected);
        assert_eq!(dynamic_store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_provision_is_best_effort() {
        let backend: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
        let fetcher = ScriptedFetcher::new();
        fetcher.route("https://shop.example/index.html", Response::new(200, "<app>"));
        let manifest = manifest(&["/index.html", "/missing.png"]);

        let (static_store, _, report) = provision(&backend, &fetcher, &manifest, "s-v1", "d-v1").await.unwrap();

        assert_eq!(report.cached, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "/missing.png");
        assert_eq!(static_store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_provision_offline_still_creates_stores() {
        let backend: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
        let fetcher = ScriptedFetcher::new();
        fetcher.set_offline(true);

        let (_, _, report) = provision(&backend, &fetcher, &manifest(&["/index.html"]), "s-v1", "d-v1")
            .await
            .unwrap();

        assert_eq!(report.cached, 0);
        assert_eq!(backend.store_names().await.unwrap(), vec!["s-v1", "d-v1"]);
    }

    #[tokio::test]
    async fn test_activate_removes_other_versions_and_trims() {
        let backend: Arc<dyn CacheStorage> = Arc::new(MemoryStorage::new());
        backend.open_store("s-v0").await.unwrap();
        backend.open_store("d-v0").await.unwrap();
        let static_store = Store::open(backend.clone(), "s-v1").await.unwrap();
        static_store.put(&RequestKey::get("https://shop.example/"), &Response::new(200, "/")).await.unwrap();
        let dynamic_store = Store::open(backend.clone(), "d-v1").await.unwrap();
        for i in 0..5 {
            let key = RequestKey::get(&format!("https://shop.example/p/{i}"));
            dynamic_store.put(&key, &Response::new(200, "p")).await.unwrap();
        }

        let expected = vec!["s-v1".to_string(), "d-v1".to_string()];
        let report = activate(backend.as_ref(), &expected, &dynamic_store, 3).await.unwrap();

        assert_eq!(report.removed_stores, vec!["s-v0", "d-v0"]);
        assert_eq!(report.trimmed, 2);
        assert_eq!(backend.store_names().await.unwrap(), expected);
        assert_eq!(static_store.count().await.unwrap(), 1);
        assert_eq!(dynamic_store.count().await.unwrap(), 3);
    }
}
