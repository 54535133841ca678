//! cache_keys and cache_stores tool implementations.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Error, Interceptor, RequestKey};

use super::resolve_store;

/// Parameters for the cache_keys tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysParams {
    /// Store to list: "static", "dynamic" (default) or a full store name.
    #[serde(default)]
    pub store: Option<String>,
}

/// Output from the cache_keys tool. Keys are listed oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheKeysOutput {
    pub store: String,
    pub count: usize,
    pub keys: Vec<RequestKey>,
}

/// Parameters for the cache_stores tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CacheStoresParams {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StoreSummary {
    pub name: String,
    pub entries: usize,
}

/// Output from the cache_stores tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheStoresOutput {
    pub static_store: Option<String>,
    pub dynamic_store: Option<String>,
    pub stores: Vec<StoreSummary>,
}

fn to_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

/// Implementation of the cache_keys tool.
pub async fn keys_impl(interceptor: &Interceptor, params: CacheKeysParams) -> Result<CallToolResult, McpError> {
    let store = resolve_store(interceptor, params.store.as_deref().unwrap_or("dynamic")).await?;
    let keys = store.keys().await?;

    to_result(&CacheKeysOutput { store: store.name().to_string(), count: keys.len(), keys })
}

/// Implementation of the cache_stores tool.
pub async fn stores_impl(interceptor: &Interceptor, _params: CacheStoresParams) -> Result<CallToolResult, McpError> {
    let mut stores = Vec::new();
    for name in interceptor.backend().store_names().await? {
        let store = resolve_store(interceptor, &name).await?;
        stores.push(StoreSummary { entries: store.count().await?, name });
    }

    to_result(&CacheStoresOutput {
        static_store: interceptor.static_store().map(|s| s.name().to_string()),
        dynamic_store: interceptor.dynamic_store().map(|s| s.name().to_string()),
        stores,
    })
}
