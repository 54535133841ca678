//! Core of swcache: an offline-first request interception engine.
//!
//! This crate provides:
//! - Named, insertion-ordered response stores (SQLite and in-memory backends)
//! - Count-based eviction of the dynamic store
//! - Rule-based strategy dispatch and the four serving strategies
//! - Provisioning and activation of versioned stores
//! - Unified error types and layered configuration

pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod interceptor;
pub mod lifecycle;
pub mod manifest;
pub mod model;
pub mod routing;
pub mod strategy;

pub use cache::{CacheDb, CacheStorage, MemoryStorage, Store};
pub use config::{AppConfig, ConfigError, StorageKind};
pub use error::Error;
pub use fetch::Fetcher;
pub use interceptor::Interceptor;
pub use lifecycle::{ActivationReport, LifecycleState, ProvisionReport};
pub use model::{Destination, Intercept, Request, RequestKey, Response, ResponseSource, Served};
pub use routing::Strategy;
