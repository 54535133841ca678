//! cache_trim tool implementation.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Error, Interceptor, cache::trim};

use super::resolve_store;

/// Parameters for the cache_trim tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheTrimParams {
    /// Store to trim: "dynamic" (default) or a full store name. The current
    /// static store is never trimmed.
    #[serde(default)]
    pub store: Option<String>,

    /// Maximum entries to keep. Defaults to the configured dynamic bound.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

/// Output from the cache_trim tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheTrimOutput {
    pub store: String,
    pub deleted: usize,
    pub remaining: usize,
}

/// Implementation of the cache_trim tool.
///
/// Deletes the oldest entries until the store holds at most `max_entries`.
pub async fn trim_impl(interceptor: &Interceptor, params: CacheTrimParams) -> Result<CallToolResult, McpError> {
    let name = params.store.as_deref().unwrap_or("dynamic");
    let static_name = interceptor.static_store().map(|s| s.name());
    if name == "static" || static_name == Some(name) {
        return Err(Error::InvalidInput("the static store is not subject to count eviction".into()).into());
    }
    let store = resolve_store(interceptor, name).await?;
    let max_entries = params.max_entries.unwrap_or(interceptor.max_dynamic_entries());

    let deleted = trim(&store, max_entries).await?;
    let remaining = store.count().await?;
    tracing::info!(store = store.name(), deleted, remaining, "cache_trim completed");

    let output = CacheTrimOutput { store: store.name().to_string(), deleted, remaining };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
