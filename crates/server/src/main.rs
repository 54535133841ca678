//! swcache server entry point.
//!
//! Boots the interceptor (provision, then activate) and serves it as an MCP
//! server on stdio transport. Logging goes to stderr to avoid interfering with
//! the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use swcache_client::{FetchClient, FetchConfig};
use swcache_core::{AppConfig, Interceptor, cache::open_storage};
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(
        version = %config.version,
        storage = ?config.storage,
        manifest = config.manifest.len(),
        "Starting swcache server on stdio transport"
    );

    let backend = open_storage(&config).await?;
    let fetcher = Arc::new(FetchClient::new(FetchConfig::from(&config))?);
    let interceptor = Arc::new(Interceptor::new(&config, backend, fetcher)?);

    let report = interceptor.provision().await?;
    if !report.is_complete() {
        for failed in &report.failed {
            tracing::warn!(path = %failed.path, reason = %failed.reason, "asset not provisioned");
        }
    }
    let activation = interceptor.activate().await?;
    tracing::info!(
        cached = report.cached,
        removed = activation.removed_stores.len(),
        trimmed = activation.trimmed,
        "interceptor active"
    );

    let handler = handler::SwCacheServer::new(interceptor);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
