//! Network side of swcache.
//!
//! This crate provides the reqwest-backed fetch capability the strategies
//! consume, plus URL canonicalization for outgoing requests.

pub mod fetch;

pub use fetch::{FetchClient, FetchConfig, UrlError, canonicalize};
