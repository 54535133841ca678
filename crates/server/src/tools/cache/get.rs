//! cache_get tool implementation.
//!
//! Reads one stored response, from a named store or from any store.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Error, Interceptor, RequestKey};

use super::resolve_store;
use crate::tools::web_fetch::HeaderEntry;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// Absolute URL of the cached request.
    pub url: String,

    /// HTTP method of the cached request (default: GET).
    #[serde(default)]
    pub method: Option<String>,

    /// Store to read: "static", "dynamic" or a full store name.
    /// Searches every store when omitted.
    #[serde(default)]
    pub store: Option<String>,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub key: RequestKey,
    pub status: u16,
    pub headers: Vec<HeaderEntry>,
    pub body: String,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(interceptor: &Interceptor, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let key = RequestKey::new(params.method.as_deref().unwrap_or("GET"), &params.url);

    let found = match params.store.as_deref() {
        Some(name) => resolve_store(interceptor, name).await?.get(&key).await?,
        None => interceptor.backend().match_any(&key).await?,
    };
    let response = found.ok_or_else(|| Error::NotFound(key.to_string()))?;

    let output = CacheGetOutput {
        key,
        status: response.status,
        body: response.body_text(),
        headers: response
            .headers
            .into_iter()
            .map(|(name, value)| HeaderEntry { name, value })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize entry: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
