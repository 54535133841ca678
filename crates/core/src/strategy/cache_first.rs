//! Cache-first: serve the static copy, fetch and keep it on a miss.

use super::{StrategyContext, offline_response};
use crate::model::{Request, Served};

pub(super) async fn serve(ctx: &StrategyContext, request: &Request) -> Served {
    let key = request.key();

    if let Some(cached) = ctx.lookup_static(&key).await {
        tracing::debug!(%key, "static hit");
        return Served::cache(cached);
    }

    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            if request.is_get() {
                ctx.store_static(&key, &response).await;
            }
            Served::network(response)
        }
        Err(e) => {
            tracing::debug!(%key, error = %e, "cache-first miss while offline");
            Served::offline(offline_response())
        }
    }
}
