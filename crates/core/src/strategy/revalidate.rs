//! Stale-while-revalidate: answer from the store immediately and refresh the
//! dynamic copy in a background task.
//!
//! The background write is not ordered against anything the caller does
//! next, so a read issued right after may still see the older entry.
//! [`Revalidations::settle`] waits for every outstanding refresh.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{StrategyContext, offline_response, write_dynamic};
use crate::model::{Request, Served};

/// Tracks spawned background refreshes.
#[derive(Default)]
pub struct Revalidations {
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl Revalidations {
    async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut pending = self.pending.lock().await;
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    /// Await every refresh spawned so far, including ones spawned while
    /// waiting. Returns how many tasks were awaited.
    pub async fn settle(&self) -> usize {
        let mut settled = 0;
        loop {
            let batch = std::mem::take(&mut *self.pending.lock().await);
            if batch.is_empty() {
                return settled;
            }
            for handle in batch {
                if let Err(e) = handle.await {
                    tracing::warn!(error = %e, "revalidation task did not complete");
                }
                settled += 1;
            }
        }
    }
}

pub(super) async fn serve(ctx: &StrategyContext, request: &Request) -> Served {
    let key = request.key();

    let Some(stale) = ctx.lookup_any(&key).await else {
        return match ctx.fetcher.fetch(request).await {
            Ok(response) => {
                if request.is_get() {
                    ctx.store_dynamic(&key, &response).await;
                }
                Served::network(response)
            }
            Err(e) => {
                tracing::debug!(%key, error = %e, "nothing stale and network failed");
                Served::offline(offline_response())
            }
        };
    };

    let fetcher = ctx.fetcher.clone();
    let store = ctx.dynamic_store.clone();
    let max_entries = ctx.max_dynamic_entries;
    let request = request.clone();
    ctx.revalidations
        .spawn(async move {
            let key = request.key();
            match fetcher.fetch(&request).await {
                Ok(fresh) if request.is_get() => {
                    write_dynamic(&store, max_entries, &key, &fresh).await;
                    tracing::debug!(%key, "revalidated");
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(%key, error = %e, "revalidation fetch failed; keeping stale copy"),
            }
        })
        .await;

    Served::cache(stale)
}
