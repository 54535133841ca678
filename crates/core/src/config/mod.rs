//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (SWCACHE_*)
//! 2. TOML config file (if SWCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Which store backend to open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Sqlite,
    Memory,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (SWCACHE_*)
/// 2. TOML config file (if SWCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Store backend.
    ///
    /// Set via SWCACHE_STORAGE (`sqlite` or `memory`).
    #[serde(default)]
    pub storage: StorageKind,

    /// Path to the SQLite store database.
    ///
    /// Set via SWCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Prefix shared by every store name.
    #[serde(default = "default_cache_prefix")]
    pub cache_prefix: String,

    /// Version tag. Stores named for any other version are deleted on activation.
    ///
    /// Set via SWCACHE_VERSION environment variable.
    #[serde(default = "default_version")]
    pub version: String,

    /// Base URL that manifest paths are resolved against.
    #[serde(default)]
    pub origin: Option<String>,

    /// Asset paths preloaded into the static store during provisioning.
    #[serde(default)]
    pub manifest: Vec<String>,

    /// URL substrings always served network-first.
    #[serde(default = "default_network_first_patterns")]
    pub network_first_patterns: Vec<String>,

    /// URL substrings (usually extensions) served stale-while-revalidate.
    #[serde(default = "default_revalidate_extensions")]
    pub revalidate_extensions: Vec<String>,

    /// Manifest path served when a document navigation cannot reach the network.
    #[serde(default = "default_fallback_document")]
    pub fallback_document: String,

    /// Upper bound on the dynamic store's entry count.
    #[serde(default = "default_max_dynamic_entries")]
    pub max_dynamic_entries: usize,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to fetch per request.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./swcache.sqlite")
}

fn default_cache_prefix() -> String {
    "swcache".into()
}

fn default_version() -> String {
    "v1".into()
}

fn default_network_first_patterns() -> Vec<String> {
    vec!["/api/".into(), "/payment/".into()]
}

fn default_revalidate_extensions() -> Vec<String> {
    [".css", ".js", ".png", ".jpg", ".jpeg", ".svg", ".gif", ".mp4", ".webp"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_fallback_document() -> String {
    "/index.html".into()
}

fn default_max_dynamic_entries() -> usize {
    50
}

fn default_user_agent() -> String {
    "swcache/0.1".into()
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageKind::default(),
            db_path: default_db_path(),
            cache_prefix: default_cache_prefix(),
            version: default_version(),
            origin: None,
            manifest: Vec::new(),
            network_first_patterns: default_network_first_patterns(),
            revalidate_extensions: default_revalidate_extensions(),
            fallback_document: default_fallback_document(),
            max_dynamic_entries: default_max_dynamic_entries(),
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Name of the current version's static store.
    pub fn static_store_name(&self) -> String {
        format!("{}-static-{}", self.cache_prefix, self.version)
    }

    /// Name of the current version's dynamic store.
    pub fn dynamic_store_name(&self) -> String {
        format!("{}-dynamic-{}", self.cache_prefix, self.version)
    }

    /// Store names that survive activation.
    pub fn expected_store_names(&self) -> Vec<String> {
        vec![self.static_store_name(), self.dynamic_store_name()]
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `SWCACHE_`
    /// 2. TOML file from `SWCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("SWCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("SWCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Origin parsed as a URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if no origin is configured.
    pub fn require_origin(&self) -> Result<url::Url, ConfigError> {
        let origin = self.origin.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "origin".into(),
            hint: "Set SWCACHE_ORIGIN to the site the manifest belongs to".into(),
        })?;
        url::Url::parse(origin).map_err(|e| ConfigError::Invalid { field: "origin".into(), reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.storage, StorageKind::Sqlite);
        assert_eq!(config.db_path, PathBuf::from("./swcache.sqlite"));
        assert_eq!(config.version, "v1");
        assert_eq!(config.max_dynamic_entries, 50);
        assert_eq!(config.fallback_document, "/index.html");
        assert_eq!(config.network_first_patterns, vec!["/api/", "/payment/"]);
        assert!(config.revalidate_extensions.contains(&".css".to_string()));
        assert!(config.manifest.is_empty());
        assert!(config.origin.is_none());
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_store_names_follow_version() {
        let config = AppConfig { version: "v3".into(), ..Default::default() };
        assert_eq!(config.static_store_name(), "swcache-static-v3");
        assert_eq!(config.dynamic_store_name(), "swcache-dynamic-v3");
        assert_eq!(config.expected_store_names().len(), 2);
    }

    #[test]
    fn test_require_origin_missing() {
        let config = AppConfig::default();
        assert!(matches!(config.require_origin(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_origin_present() {
        let config = AppConfig { origin: Some("https://shop.example".into()), ..Default::default() };
        assert_eq!(config.require_origin().unwrap().host_str(), Some("shop.example"));
    }

    #[test]
    fn test_load_from_toml_and_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "swcache.toml",
                r#"
                    version = "v7"
                    origin = "https://shop.example"
                    manifest = ["/", "/index.html"]
                    max_dynamic_entries = 10
                "#,
            )?;
            jail.set_env("SWCACHE_CONFIG_FILE", "swcache.toml");
            jail.set_env("SWCACHE_STORAGE", "memory");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.version, "v7");
            assert_eq!(config.storage, StorageKind::Memory);
            assert_eq!(config.manifest, vec!["/", "/index.html"]);
            assert_eq!(config.max_dynamic_entries, 10);
            Ok(())
        });
    }
}
