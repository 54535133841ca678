//! Rule-based strategy selection.
//!
//! Rules are evaluated in a fixed priority order and the first match wins:
//!
//! 1. URL contains a network-first pattern → [`Strategy::NetworkFirst`]
//! 2. URL contains a revalidate marker → [`Strategy::StaleWhileRevalidate`]
//! 3. URL matches a manifest entry → [`Strategy::CacheFirst`]
//! 4. anything else → [`Strategy::CacheFirstWithFallback`]

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::manifest::Manifest;
use crate::model::Request;

/// The four serving protocols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    CacheFirst,
    NetworkFirst,
    StaleWhileRevalidate,
    CacheFirstWithFallback,
}

/// Condition half of a routing rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// URL contains any of the substrings.
    UrlContainsAny(Vec<String>),
    /// URL matches an entry of the static manifest.
    InManifest,
    Always,
}

impl Matcher {
    fn matches(&self, url: &str, manifest: &Manifest) -> bool {
        match self {
            Matcher::UrlContainsAny(patterns) => patterns.iter().any(|p| url.contains(p.as_str())),
            Matcher::InManifest => manifest.matches(url),
            Matcher::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    pub matcher: Matcher,
    pub strategy: Strategy,
}

/// Ordered rule table.
#[derive(Debug, Clone)]
pub struct Router {
    rules: Vec<RoutingRule>,
    manifest: Manifest,
}

impl Router {
    pub fn new(config: &AppConfig, manifest: Manifest) -> Self {
        let rules = vec![
            RoutingRule {
                matcher: Matcher::UrlContainsAny(config.network_first_patterns.clone()),
                strategy: Strategy::NetworkFirst,
            },
            RoutingRule {
                matcher: Matcher::UrlContainsAny(config.revalidate_extensions.clone()),
                strategy: Strategy::StaleWhileRevalidate,
            },
            RoutingRule { matcher: Matcher::InManifest, strategy: Strategy::CacheFirst },
            RoutingRule { matcher: Matcher::Always, strategy: Strategy::CacheFirstWithFallback },
        ];
        Self { rules, manifest }
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    /// Pick the strategy for `request`.
    pub fn select(&self, request: &Request) -> Strategy {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(&request.url, &self.manifest))
            .map(|rule| rule.strategy)
            .unwrap_or(Strategy::CacheFirstWithFallback)
    }
}

/// Whether the transport can address `url` at all (http or https).
pub fn is_addressable(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        let config = AppConfig::default();
        let origin = url::Url::parse("https://shop.example/").unwrap();
        let manifest = Manifest::resolve(&origin, &["/".into(), "/index.html".into(), "/manifest.json".into()]).unwrap();
        Router::new(&config, manifest)
    }

    fn select(url: &str) -> Strategy {
        router().select(&Request::get(url))
    }

    #[test]
    fn test_network_first_patterns() {
        assert_eq!(select("https://shop.example/api/data"), Strategy::NetworkFirst);
        assert_eq!(select("https://shop.example/payment/checkout"), Strategy::NetworkFirst);
    }

    #[test]
    fn test_network_first_beats_extension() {
        assert_eq!(select("https://shop.example/api/bundle.js"), Strategy::NetworkFirst);
    }

    #[test]
    fn test_extensions_revalidate() {
        assert_eq!(select("https://shop.example/style.css"), Strategy::StaleWhileRevalidate);
        assert_eq!(select("https://shop.example/img/logo.png"), Strategy::StaleWhileRevalidate);
        assert_eq!(select("https://shop.example/intro.mp4"), Strategy::StaleWhileRevalidate);
    }

    #[test]
    fn test_manifest_entries_cache_first() {
        assert_eq!(select("https://shop.example/index.html"), Strategy::CacheFirst);
        assert_eq!(select("https://shop.example/"), Strategy::CacheFirst);
    }

    #[test]
    fn test_manifest_suffix_is_not_a_match() {
        assert_eq!(select("https://shop.example/orders/"), Strategy::CacheFirstWithFallback);
        assert_eq!(select("https://other.example/x/index.html"), Strategy::CacheFirstWithFallback);
    }

    #[test]
    fn test_default_rule() {
        assert_eq!(select("https://shop.example/about"), Strategy::CacheFirstWithFallback);
    }

    #[test]
    fn test_rule_order() {
        let strategies: Vec<_> = router().rules().iter().map(|r| r.strategy).collect();
        assert_eq!(
            strategies,
            vec![
                Strategy::NetworkFirst,
                Strategy::StaleWhileRevalidate,
                Strategy::CacheFirst,
                Strategy::CacheFirstWithFallback
            ]
        );
    }

    #[test]
    fn test_is_addressable() {
        assert!(is_addressable("https://shop.example/"));
        assert!(is_addressable("http://localhost:8080/x"));
        assert!(!is_addressable("chrome-extension://abc/script.js"));
        assert!(!is_addressable("data:text/plain,hello"));
        assert!(!is_addressable("/relative/path"));
    }
}
