//! Default strategy: cache-first over every store, opportunistic dynamic
//! caching of successful GETs, and an offline fallback.

use super::{StrategyContext, unavailable_response};
use crate::model::{Request, Served};

/// Only plain 200 responses to GETs are mirrored.
const CACHEABLE_STATUS: u16 = 200;

pub(super) async fn serve(ctx: &StrategyContext, request: &Request) -> Served {
    let key = request.key();

    if let Some(cached) = ctx.lookup_any(&key).await {
        return Served::cache(cached);
    }

    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            if request.is_get() && response.status == CACHEABLE_STATUS {
                ctx.store_dynamic(&key, &response).await;
            }
            Served::network(response)
        }
        Err(e) => {
            tracing::debug!(%key, error = %e, navigation = request.is_navigation(), "fetch failed");
            if request.is_navigation()
                && let Some(fallback_key) = &ctx.fallback_key
                && let Some(document) = ctx.lookup_any(fallback_key).await
            {
                return Served::fallback(document);
            }
            Served::offline(unavailable_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{RequestKey, Response, ResponseSource};
    use crate::strategy::testing::{ScriptedFetcher, context};

    const URL: &str = "https://shop.example/products";
    const INDEX: &str = "https://shop.example/index.html";

    #[tokio::test]
    async fn test_hit_in_any_store() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let ctx = context(fetcher.clone(), 50).await;
        ctx.dynamic_store.put(&RequestKey::get(URL), &Response::new(200, "cached")).await.unwrap();

        let served = serve(&ctx, &Request::get(URL)).await;

        assert_eq!(served.source, ResponseSource::Cache);
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_successful_get_is_cached() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.route(URL, Response::new(200, "list"));
        let ctx = context(fetcher, 50).await;

        let served = serve(&ctx, &Request::get(URL)).await;

        assert_eq!(served.source, ResponseSource::Network);
        assert!(ctx.dynamic_store.get(&RequestKey::get(URL)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_non_get_not_cached() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.route(URL, Response::new(200, "created"));
        let ctx = context(fetcher, 50).await;

        serve(&ctx, &Request::new("POST", URL)).await;

        assert!(ctx.dynamic_store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_200_not_cached() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let ctx = context(fetcher, 50).await;

        let served = serve(&ctx, &Request::get(URL)).await;

        assert_eq!(served.response.status, 404);
        assert!(ctx.dynamic_store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_triggers_trim() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let ctx = context(fetcher.clone(), 50).await;
        for i in 0..50 {
            let key = RequestKey::get(&format!("https://shop.example/old/{i}"));
            ctx.dynamic_store.put(&key, &Response::new(200, "old")).await.unwrap();
        }
        fetcher.route(URL, Response::new(200, "new"));

        serve(&ctx, &Request::get(URL)).await;

        let keys = ctx.dynamic_store.keys().await.unwrap();
        assert_eq!(keys.len(), 50);
        assert_eq!(keys[0].url, "https://shop.example/old/1");
        assert_eq!(keys[49].url, URL);
    }

    #[tokio::test]
    async fn test_offline_navigation_gets_root_document() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.set_offline(true);
        let ctx = context(fetcher, 50).await;
        ctx.static_store.put(&RequestKey::get(INDEX), &Response::new(200, "<app>")).await.unwrap();

        let served = serve(&ctx, &Request::navigate(URL)).await;

        assert_eq!(served.source, ResponseSource::Fallback);
        assert_eq!(served.response.body_text(), "<app>");
    }

    #[tokio::test]
    async fn test_offline_subresource_gets_plain_503() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.set_offline(true);
        let ctx = context(fetcher, 50).await;
        ctx.static_store.put(&RequestKey::get(INDEX), &Response::new(200, "<app>")).await.unwrap();

        let served = serve(&ctx, &Request::get(URL)).await;

        assert_eq!(served.source, ResponseSource::Offline);
        assert_eq!(served.response.status, 503);
        assert_eq!(served.response.header("Content-Type"), Some("text/plain; charset=utf-8"));
    }

    #[tokio::test]
    async fn test_offline_navigation_without_root_document() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        fetcher.set_offline(true);
        let ctx = context(fetcher, 50).await;

        let served = serve(&ctx, &Request::navigate(URL)).await;

        assert_eq!(served.source, ResponseSource::Offline);
    }
}
