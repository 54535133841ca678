//! web_fetch tool implementation.
//!
//! Runs one request through the interceptor, exactly as an intercepted
//! outgoing request would be served.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use swcache_core::{Destination, Error, Intercept, Interceptor, Request, ResponseSource, Strategy};

/// Input parameters for web_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchParams {
    /// Absolute URL to request.
    pub url: String,

    /// HTTP method (default: GET).
    #[serde(default = "default_method")]
    pub method: String,

    /// Request destination: "document" for top-level navigations, or
    /// "style", "script", "image", "video", "other" (default).
    #[serde(default)]
    pub destination: Option<String>,
}

fn default_method() -> String {
    "GET".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

/// Output structure for web_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebFetchOutput {
    /// False when the request was passed through untouched.
    pub intercepted: bool,
    /// Strategy selected by the routing rules.
    pub strategy: Option<Strategy>,
    /// Where the response came from.
    pub source: Option<ResponseSource>,
    pub status: Option<u16>,
    pub headers: Vec<HeaderEntry>,
    /// Body decoded as UTF-8 (lossy).
    pub body: Option<String>,
}

/// Implementation of the web_fetch tool.
pub async fn fetch_impl(interceptor: &Interceptor, params: WebFetchParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }
    if params.method.is_empty() || !params.method.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidInput(format!("invalid method: {}", params.method)).into());
    }
    let destination: Destination = params.destination.as_deref().unwrap_or("").parse()?;

    let request = Request::new(params.method, params.url.trim()).with_destination(destination);
    let strategy = interceptor.strategy_for(&request);

    let output = match interceptor.handle_request(&request).await {
        Intercept::Respond(served) => WebFetchOutput {
            intercepted: true,
            strategy: Some(strategy),
            source: Some(served.source),
            status: Some(served.response.status),
            body: Some(served.response.body_text()),
            headers: served
                .response
                .headers
                .into_iter()
                .map(|(name, value)| HeaderEntry { name, value })
                .collect(),
        },
        Intercept::Declined => WebFetchOutput {
            intercepted: false,
            strategy: None,
            source: None,
            status: None,
            headers: Vec::new(),
            body: None,
        },
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
