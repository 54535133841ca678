//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_dynamic_entries` is 0
    /// - `version` or `cache_prefix` is empty
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` is empty
    /// - `origin` is not an http(s) URL
    ///
    /// Returns `ConfigError::Missing` if a manifest is given without an origin.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_dynamic_entries == 0 {
            return Err(ConfigError::Invalid {
                field: "max_dynamic_entries".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if self.version.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "version".into(), reason: "must not be empty".into() });
        }
        if self.cache_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "cache_prefix".into(), reason: "must not be empty".into() });
        }

        if self.max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.origin.is_some() {
            let origin = self.require_origin()?;
            if !matches!(origin.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid {
                    field: "origin".into(),
                    reason: format!("unsupported scheme: {}", origin.scheme()),
                });
            }
        } else if !self.manifest.is_empty() {
            return Err(ConfigError::Missing {
                field: "origin".into(),
                hint: "manifest paths need SWCACHE_ORIGIN to resolve against".into(),
            });
        }

        if !self.manifest.is_empty() && !self.manifest.contains(&self.fallback_document) {
            tracing::warn!(
                fallback_document = %self.fallback_document,
                manifest_len = self.manifest.len(),
                "fallback_document is not part of the manifest; \
                 offline navigations will only be served if it was cached dynamically"
            );
        }

        Ok(())
    }
}
