//! The externally supplied list of assets preloaded into the static store.

use url::Url;

use crate::Error;
use crate::model::RequestKey;

/// One manifest asset: the configured path and its absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub path: String,
    pub url: String,
}

impl ManifestEntry {
    pub fn key(&self) -> RequestKey {
        RequestKey::get(&self.url)
    }
}

/// Ordered, de-duplicated manifest resolved against an origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Resolve every path against `origin`. Paths like `./index.html` and
    /// `/index.html` resolve to the same URL and are kept once.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` if a path cannot be joined onto the origin.
    pub fn resolve(origin: &Url, paths: &[String]) -> Result<Self, Error> {
        let mut entries: Vec<ManifestEntry> = Vec::with_capacity(paths.len());
        for path in paths {
            let url = origin
                .join(path)
                .map_err(|e| Error::InvalidUrl(format!("{path}: {e}")))?
                .to_string();
            if entries.iter().any(|e| e.url == url) {
                continue;
            }
            entries.push(ManifestEntry { path: path.clone(), url });
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `url`, ignoring its query, is exactly one of the resolved
    /// manifest URLs.
    pub fn matches(&self, url: &str) -> bool {
        let url = strip_query(url);
        self.entries.iter().any(|e| e.url == url)
    }

    /// The entry configured under `path`, or resolving to the same URL.
    pub fn find(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.path == path).or_else(|| {
            let suffix = suffix_of(path)?;
            self.entries.iter().find(|e| e.url.ends_with(suffix))
        })
    }
}

// "./index.html" and "/index.html" both match URLs ending in "/index.html".
fn suffix_of(path: &str) -> Option<&str> {
    let trimmed = path.strip_prefix('.').unwrap_or(path);
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

fn strip_query(url: &str) -> &str {
    url.split(['?', '#']).next().unwrap_or(url)
}
