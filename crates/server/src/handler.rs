//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::cache::{
    CacheGetParams, CacheKeysParams, CacheStoresParams, CacheTrimParams, get_impl, keys_impl, stores_impl, trim_impl,
};
use crate::tools::web_fetch::{WebFetchParams, fetch_impl};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};
use swcache_core::Interceptor;

/// The main MCP server handler for swcache.
#[derive(Clone)]
pub struct SwCacheServer {
    interceptor: Arc<Interceptor>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl SwCacheServer {
    /// Create a new server handler around an activated interceptor.
    pub fn new(interceptor: Arc<Interceptor>) -> Self {
        Self { interceptor, tool_router: Self::tool_router() }
    }

    /// Serve a request through the caching strategies.
    #[tool(
        description = "Fetch a URL through the offline cache. Picks a caching strategy for the URL, serves from cache or network, and reports where the response came from."
    )]
    async fn web_fetch(&self, params: Parameters<WebFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(&self.interceptor, params.0).await
    }

    #[tool(description = "Read a cached response by URL and method, from one store or from any store.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.interceptor, params.0).await
    }

    #[tool(description = "List the request keys held by a store, oldest first.")]
    async fn cache_keys(&self, params: Parameters<CacheKeysParams>) -> Result<CallToolResult, McpError> {
        keys_impl(&self.interceptor, params.0).await
    }

    #[tool(description = "Delete the oldest entries of a store until it holds at most max_entries.")]
    async fn cache_trim(&self, params: Parameters<CacheTrimParams>) -> Result<CallToolResult, McpError> {
        trim_impl(&self.interceptor, params.0).await
    }

    #[tool(description = "List every store with its entry count, and name the current static and dynamic stores.")]
    async fn cache_stores(&self, params: Parameters<CacheStoresParams>) -> Result<CallToolResult, McpError> {
        stores_impl(&self.interceptor, params.0).await
    }
}

impl ServerHandler for SwCacheServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "swcache".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
