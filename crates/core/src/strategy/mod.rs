//! Serving strategies.
//!
//! Each strategy is a self-contained protocol over the stores and the fetch
//! capability. Network failures never escape: they turn into a cached copy,
//! the fallback document, or a synthesized 503. Store failures while serving
//! are logged and treated like a miss.

mod cache_first;
mod fallback;
mod network_first;
mod revalidate;

use std::sync::Arc;

use crate::cache::{CacheStorage, Store, trim};
use crate::fetch::Fetcher;
use crate::model::{Request, RequestKey, Response, Served};
use crate::routing::Strategy;

pub use revalidate::Revalidations;

const OFFLINE_BODY: &str = "Offline";
const UNAVAILABLE_BODY: &str = "Content not available offline";

/// Everything a strategy needs to serve one request.
pub struct StrategyContext {
    pub(crate) fetcher: Arc<dyn Fetcher>,
    pub(crate) backend: Arc<dyn CacheStorage>,
    pub(crate) static_store: Store,
    pub(crate) dynamic_store: Store,
    pub(crate) max_dynamic_entries: usize,
    /// Key of the root document served to offline navigations.
    pub(crate) fallback_key: Option<RequestKey>,
    pub(crate) revalidations: Revalidations,
}

impl StrategyContext {
    /// Execute `strategy` for `request`.
    pub async fn run(&self, strategy: Strategy, request: &Request) -> Served {
        tracing::debug!(?strategy, method = %request.method, url = %request.url, "serving request");
        match strategy {
            Strategy::CacheFirst => cache_first::serve(self, request).await,
            Strategy::NetworkFirst => network_first::serve(self, request).await,
            Strategy::StaleWhileRevalidate => revalidate::serve(self, request).await,
            Strategy::CacheFirstWithFallback => fallback::serve(self, request).await,
        }
    }

    async fn lookup_static(&self, key: &RequestKey) -> Option<Response> {
        absent_on_failure(self.static_store.get(key).await, key)
    }

    async fn lookup_any(&self, key: &RequestKey) -> Option<Response> {
        absent_on_failure(self.backend.match_any(key).await, key)
    }

    async fn store_static(&self, key: &RequestKey, response: &Response) {
        if let Err(e) = self.static_store.put(key, response).await {
            tracing::warn!(%key, error = %e, "failed to write static store");
        }
    }

    async fn store_dynamic(&self, key: &RequestKey, response: &Response) {
        write_dynamic(&self.dynamic_store, self.max_dynamic_entries, key, response).await;
    }
}

/// Write into the dynamic store, then police its size.
pub(crate) async fn write_dynamic(store: &Store, max_entries: usize, key: &RequestKey, response: &Response) {
    if let Err(e) = store.put(key, response).await {
        tracing::warn!(%key, error = %e, "failed to write dynamic store");
        return;
    }
    if let Err(e) = trim(store, max_entries).await {
        tracing::warn!(store = store.name(), error = %e, "failed to trim dynamic store");
    }
}

fn absent_on_failure(result: Result<Option<Response>, crate::Error>, key: &RequestKey) -> Option<Response> {
    match result {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(%key, error = %e, "store read failed; treating as miss");
            None
        }
    }
}

/// Bare 503 used by cache-first and network-first.
pub fn offline_response() -> Response {
    Response::new(503, OFFLINE_BODY)
}

/// Plain-text 503 used when nothing at all can be served.
pub fn unavailable_response() -> Response {
    Response::new(503, UNAVAILABLE_BODY).with_header("Content-Type", "text/plain; charset=utf-8")
}
