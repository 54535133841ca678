//! MCP tool implementations.
//!
//! This module contains all tools exposed by the swcache server.

pub mod cache;
pub mod web_fetch;

pub use cache::{CacheGetParams, CacheKeysParams, CacheStoresParams, CacheTrimParams};
pub use web_fetch::{WebFetchOutput, WebFetchParams};
