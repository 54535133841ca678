//! Network-first: always try the network, mirror GET responses into the
//! dynamic store, fall back to any stored copy when offline.

use super::{StrategyContext, offline_response};
use crate::model::{Request, Served};

pub(super) async fn serve(ctx: &StrategyContext, request: &Request) -> Served {
    let key = request.key();

    match ctx.fetcher.fetch(request).await {
        Ok(response) => {
            if request.is_get() {
                ctx.store_dynamic(&key, &response).await;
            }
            Served::network(response)
        }
        Err(e) => {
            tracing::debug!(%key, error = %e, "network-first fetch failed; trying stores");
            match ctx.lookup_any(&key).await {
                Some(cached) => Served::cache(cached),
                None => Served::offline(offline_response()),
            }
        }
    }
}
